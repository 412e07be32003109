use crate::assessments::registry::AssessmentKind;
use crate::assessments::transform::AssessmentPayload;
use crate::assessments::view::PredictionResponse;
use crate::config::PredictorConfig;
use std::fmt;

#[derive(Debug)]
pub enum PredictorError {
    Client(reqwest::Error),
    Transport(reqwest::Error),
    Status { status: reqwest::StatusCode },
    Decode(reqwest::Error),
}

impl fmt::Display for PredictorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictorError::Client(err) => {
                write!(f, "failed to build prediction client: {err}")
            }
            PredictorError::Transport(err) => {
                write!(f, "prediction service unreachable: {err}")
            }
            PredictorError::Status { status } => {
                write!(f, "prediction service answered with status {status}")
            }
            PredictorError::Decode(err) => {
                write!(f, "prediction response could not be decoded: {err}")
            }
        }
    }
}

impl std::error::Error for PredictorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PredictorError::Client(err)
            | PredictorError::Transport(err)
            | PredictorError::Decode(err) => Some(err),
            PredictorError::Status { .. } => None,
        }
    }
}

/// Thin collaborator posting transformed payloads to the prediction
/// service. One request per submission; the timeout lives here, not in
/// the pipeline.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    http: reqwest::Client,
    base_url: String,
}

impl PredictionClient {
    pub fn new(config: &PredictorConfig) -> Result<Self, PredictorError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(PredictorError::Client)?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    fn endpoint(&self, kind: AssessmentKind) -> String {
        let path = match kind {
            AssessmentKind::Diabetes => "/api/predict-diabetes",
            AssessmentKind::Heart => "/api/predict-heart",
        };
        format!("{}{}", self.base_url, path)
    }

    pub async fn predict(
        &self,
        kind: AssessmentKind,
        payload: &AssessmentPayload,
    ) -> Result<PredictionResponse, PredictorError> {
        let response = self
            .http
            .post(self.endpoint(kind))
            .json(payload)
            .send()
            .await
            .map_err(PredictorError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PredictorError::Status { status });
        }

        response
            .json::<PredictionResponse>()
            .await
            .map_err(PredictorError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client() -> PredictionClient {
        PredictionClient::new(&PredictorConfig {
            base_url: "http://predictor.internal:8000".to_string(),
            timeout: Duration::from_secs(5),
        })
        .expect("client builds")
    }

    #[test]
    fn endpoints_follow_the_service_contract() {
        let client = client();
        assert_eq!(
            client.endpoint(AssessmentKind::Diabetes),
            "http://predictor.internal:8000/api/predict-diabetes"
        );
        assert_eq!(
            client.endpoint(AssessmentKind::Heart),
            "http://predictor.internal:8000/api/predict-heart"
        );
    }
}
