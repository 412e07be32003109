use crate::assessments::explanation::{parse_explanation, ExplanationDocument};
use serde::{Deserialize, Serialize};

/// Direction a feature pushed the prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Increased,
    Reduced,
}

impl Impact {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Increased => "Increased",
            Self::Reduced => "Reduced",
        }
    }
}

/// A named feature with its directional impact and SHAP attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    pub feature: String,
    pub value: f64,
    pub impact: Impact,
    pub shap: f64,
}

/// Raw response from the prediction service. Every field beyond the
/// verdict is optional; older service builds omit them.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionResponse {
    pub prediction: i64,
    #[serde(default)]
    pub probability: Option<f64>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub top_contributors: Vec<Contributor>,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl PredictionResponse {
    /// Build the render-ready view. Absent optional fields degrade to
    /// empty values, never to an error.
    pub fn to_view(&self) -> ResultViewModel {
        ResultViewModel {
            verdict_positive: self.prediction == 1,
            probability: self.probability,
            label: self.label.clone(),
            contributors: self
                .top_contributors
                .iter()
                .map(Contributor::to_view)
                .collect(),
            explanation: self
                .explanation
                .as_deref()
                .map(parse_explanation),
        }
    }
}

impl Contributor {
    pub fn to_view(&self) -> ContributorView {
        ContributorView {
            feature: self.feature.clone(),
            value: self.value,
            impact: self.impact,
            impact_label: self.impact.label().to_string(),
            shap: self.shap,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributorView {
    pub feature: String,
    pub value: f64,
    pub impact: Impact,
    pub impact_label: String,
    pub shap: f64,
}

/// Immutable, render-ready combination of verdict, probability,
/// contributors, and parsed explanation. Built once per response.
#[derive(Debug, Clone, Serialize)]
pub struct ResultViewModel {
    pub verdict_positive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub contributors: Vec<ContributorView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<ExplanationDocument>,
}
