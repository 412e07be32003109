use crate::assessments::record::RawRecord;
use crate::assessments::registry::{
    AssessmentKind, AssessmentSpec, FieldKind, FieldSpec, RegistryError,
};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Backend-shaped record for the diabetes prediction endpoint. Key
/// names and casing are pinned by the service contract; this module is
/// the single source of truth for that mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiabetesPayload {
    pub systolic_bp: i64,
    pub diastolic_bp: i64,
    pub cholesterol_mg_dl: i64,
    pub bmi: f64,
    pub smoker: bool,
    pub phys_activity: bool,
    pub hvy_alcohol_consump: bool,
    pub heart_disease_or_attack: bool,
    pub diff_walk: bool,
    pub stroke: bool,
    pub chol_check: bool,
    pub sex: String,
    pub age_years: i64,
    pub annual_income: i64,
    pub gen_health: i64,
}

/// Backend-shaped record for the heart prediction endpoint. The
/// upstream schema uses PascalCase keys, hence the renames.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeartPayload {
    #[serde(rename = "Age")]
    pub age: i64,
    #[serde(rename = "Sex")]
    pub sex: String,
    #[serde(rename = "ChestPainType")]
    pub chest_pain_type: String,
    #[serde(rename = "RestingBP")]
    pub resting_bp: i64,
    #[serde(rename = "Cholesterol")]
    pub cholesterol: i64,
    #[serde(rename = "FastingBS")]
    pub fasting_bs: i64,
    #[serde(rename = "MaxHR")]
    pub max_hr: i64,
    #[serde(rename = "ExerciseAngina")]
    pub exercise_angina: String,
    #[serde(rename = "Oldpeak")]
    pub oldpeak: f64,
    #[serde(rename = "ST_Slope")]
    pub st_slope: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AssessmentPayload {
    Diabetes(DiabetesPayload),
    Heart(HeartPayload),
}

/// A value that passed validation but failed coercion, or a registry
/// gap. Either way the validation and transformation rules have
/// drifted apart; these are defects, never user feedback.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformError {
    Registry(RegistryError),
    Numeric { field: &'static str, value: String },
    Boolean { field: &'static str, value: String },
    Vocabulary { field: &'static str, value: String },
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::Registry(err) => write!(f, "{err}"),
            TransformError::Numeric { field, value } => {
                write!(f, "field '{field}' passed validation but '{value}' is not numeric")
            }
            TransformError::Boolean { field, value } => {
                write!(f, "field '{field}' holds unknown boolean token '{value}'")
            }
            TransformError::Vocabulary { field, value } => {
                write!(f, "field '{field}' holds '{value}', outside its declared vocabulary")
            }
        }
    }
}

impl std::error::Error for TransformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransformError::Registry(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RegistryError> for TransformError {
    fn from(err: RegistryError) -> Self {
        Self::Registry(err)
    }
}

/// Map a validated raw record into the backend payload for its
/// assessment type. Callers must validate first; coercion failures
/// here signal rule drift, not bad user input.
pub fn transform(raw: &RawRecord, spec: &AssessmentSpec) -> Result<AssessmentPayload, TransformError> {
    match spec.kind {
        AssessmentKind::Diabetes => diabetes_payload(raw, spec).map(AssessmentPayload::Diabetes),
        AssessmentKind::Heart => heart_payload(raw, spec).map(AssessmentPayload::Heart),
    }
}

fn diabetes_payload(raw: &RawRecord, spec: &AssessmentSpec) -> Result<DiabetesPayload, TransformError> {
    let sex = match choice_value(raw, spec, "sex")? {
        "male" => "Male".to_string(),
        "female" => "Female".to_string(),
        other => {
            return Err(RegistryError::UnmappedOption {
                field: "sex",
                option: other.to_string(),
            }
            .into())
        }
    };

    Ok(DiabetesPayload {
        systolic_bp: int_value(raw, spec, "systolicBP")?,
        diastolic_bp: int_value(raw, spec, "diastolicBP")?,
        cholesterol_mg_dl: int_value(raw, spec, "cholesterolLevel")?,
        bmi: float_value(raw, spec, "bmi")?,
        smoker: bool_value(raw, spec, "smokingStatus")?,
        phys_activity: bool_value(raw, spec, "physicalActivity")?,
        hvy_alcohol_consump: bool_value(raw, spec, "heavyAlcoholUse")?,
        heart_disease_or_attack: bool_value(raw, spec, "heartDisease")?,
        diff_walk: bool_value(raw, spec, "difficultyWalking")?,
        stroke: bool_value(raw, spec, "stroke")?,
        chol_check: bool_value(raw, spec, "cholesterolCheck")?,
        sex,
        age_years: int_value(raw, spec, "age")?,
        annual_income: income_value(raw, spec, "annualIncome")?,
        gen_health: int_value(raw, spec, "generalHealth")?,
    })
}

fn heart_payload(raw: &RawRecord, spec: &AssessmentSpec) -> Result<HeartPayload, TransformError> {
    // restingECG is captured by the form but not part of the upstream
    // contract; it still resolves against the registry so a stray form
    // field cannot slip through silently.
    spec.expect_field("restingECG")?;

    Ok(HeartPayload {
        age: int_value(raw, spec, "age")?,
        sex: choice_value(raw, spec, "sex")?.to_string(),
        chest_pain_type: choice_value(raw, spec, "chestPainType")?.to_string(),
        resting_bp: int_value(raw, spec, "restingBP")?,
        cholesterol: int_value(raw, spec, "cholesterol")?,
        fasting_bs: binary_value(raw, spec, "fastingBS")?,
        max_hr: int_value(raw, spec, "maxHR")?,
        exercise_angina: choice_letter(raw, spec, "exerciseAngina")?,
        oldpeak: float_value(raw, spec, "oldpeak")?,
        st_slope: choice_value(raw, spec, "ST_Slope")?.to_string(),
    })
}

fn raw_value<'a>(
    raw: &'a RawRecord,
    spec: &AssessmentSpec,
    name: &'static str,
) -> Result<(&'static FieldSpec, &'a str), TransformError> {
    let field = spec.expect_field(name)?;
    Ok((field, raw.get(name).map(str::trim).unwrap_or("")))
}

fn int_value(raw: &RawRecord, spec: &AssessmentSpec, name: &'static str) -> Result<i64, TransformError> {
    let (_, value) = raw_value(raw, spec, name)?;
    value.parse().map_err(|_| TransformError::Numeric {
        field: name,
        value: value.to_string(),
    })
}

fn float_value(raw: &RawRecord, spec: &AssessmentSpec, name: &'static str) -> Result<f64, TransformError> {
    let (_, value) = raw_value(raw, spec, name)?;
    value.parse().map_err(|_| TransformError::Numeric {
        field: name,
        value: value.to_string(),
    })
}

fn bool_value(raw: &RawRecord, spec: &AssessmentSpec, name: &'static str) -> Result<bool, TransformError> {
    let (field, value) = raw_value(raw, spec, name)?;
    let token = match field.kind {
        FieldKind::YesNo => match value {
            "yes" => Some(true),
            "no" => Some(false),
            _ => None,
        },
        FieldKind::YesNoLetter => match value {
            "Y" => Some(true),
            "N" => Some(false),
            _ => None,
        },
        FieldKind::Binary => match value {
            "1" => Some(true),
            "0" => Some(false),
            _ => None,
        },
        _ => None,
    };

    token.ok_or_else(|| TransformError::Boolean {
        field: name,
        value: value.to_string(),
    })
}

/// The heart contract wants fasting blood sugar as a 0/1 integer, not
/// a JSON boolean.
fn binary_value(raw: &RawRecord, spec: &AssessmentSpec, name: &'static str) -> Result<i64, TransformError> {
    bool_value(raw, spec, name).map(i64::from)
}

fn choice_value<'a>(
    raw: &'a RawRecord,
    spec: &AssessmentSpec,
    name: &'static str,
) -> Result<&'a str, TransformError> {
    let (field, value) = raw_value(raw, spec, name)?;
    match field.kind {
        FieldKind::Choice(options) if options.contains(&value) => Ok(value),
        _ => Err(TransformError::Vocabulary {
            field: name,
            value: value.to_string(),
        }),
    }
}

/// "Y"/"N" controls forward their letter verbatim.
fn choice_letter(raw: &RawRecord, spec: &AssessmentSpec, name: &'static str) -> Result<String, TransformError> {
    let (_, value) = raw_value(raw, spec, name)?;
    match value {
        "Y" | "N" => Ok(value.to_string()),
        _ => Err(TransformError::Boolean {
            field: name,
            value: value.to_string(),
        }),
    }
}

fn income_value(raw: &RawRecord, spec: &AssessmentSpec, name: &'static str) -> Result<i64, TransformError> {
    let (_, value) = raw_value(raw, spec, name)?;
    Ok(income_bracket_midpoint(value))
}

static INCOME_MIDPOINTS: OnceLock<HashMap<String, i64>> = OnceLock::new();

/// Fixed bracket-to-midpoint table. Canonical labels use the en-dash
/// the intake UI renders; lookups normalize dashes so the ASCII
/// spelling resolves too.
const INCOME_BRACKETS: &[(&str, i64)] = &[
    ("<10k", 5_000),
    ("10k\u{2013}20k", 15_000),
    ("20k\u{2013}30k", 25_000),
    ("30k\u{2013}40k", 35_000),
    ("40k\u{2013}50k", 45_000),
    ("50k\u{2013}60k", 55_000),
    ("60k\u{2013}70k", 65_000),
    (">70k", 75_000),
];

/// Midpoint for a selected income bracket. Brackets outside the table
/// resolve to 0 so unseen labels keep older clients working instead of
/// failing the whole submission.
pub fn income_bracket_midpoint(value: &str) -> i64 {
    income_midpoint_map()
        .get(&normalize_bracket(value))
        .copied()
        .unwrap_or(0)
}

fn income_midpoint_map() -> &'static HashMap<String, i64> {
    INCOME_MIDPOINTS.get_or_init(|| {
        let mut map = HashMap::with_capacity(INCOME_BRACKETS.len());
        for (label, midpoint) in INCOME_BRACKETS {
            map.insert(normalize_bracket(label), *midpoint);
        }
        map
    })
}

fn normalize_bracket(value: &str) -> String {
    let unified = value.replace(['\u{2013}', '\u{2014}'], "-");
    let collapsed = unified.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessments::registry::{DIABETES_SPEC, HEART_SPEC};

    fn heart_record() -> RawRecord {
        RawRecord::from([
            ("age", "54"),
            ("sex", "M"),
            ("chestPainType", "ASY"),
            ("restingBP", "130"),
            ("cholesterol", "220"),
            ("fastingBS", "1"),
            ("restingECG", "Normal"),
            ("maxHR", "150"),
            ("exerciseAngina", "Y"),
            ("oldpeak", "1.2"),
            ("ST_Slope", "Up"),
        ])
    }

    fn diabetes_record() -> RawRecord {
        RawRecord::from([
            ("systolicBP", "120"),
            ("diastolicBP", "80"),
            ("cholesterolLevel", "200"),
            ("bmi", "25.4"),
            ("smokingStatus", "no"),
            ("physicalActivity", "yes"),
            ("heavyAlcoholUse", "no"),
            ("heartDisease", "no"),
            ("difficultyWalking", "no"),
            ("stroke", "no"),
            ("cholesterolCheck", "yes"),
            ("sex", "male"),
            ("age", "52"),
            ("annualIncome", "30k\u{2013}40k"),
            ("generalHealth", "3"),
        ])
    }

    #[test]
    fn heart_payload_types_every_field() {
        let payload = transform(&heart_record(), &HEART_SPEC).expect("clean record transforms");
        let AssessmentPayload::Heart(heart) = payload else {
            panic!("heart spec must yield a heart payload");
        };

        assert_eq!(heart.age, 54);
        assert_eq!(heart.sex, "M");
        assert_eq!(heart.fasting_bs, 1);
        assert_eq!(heart.exercise_angina, "Y");
        assert_eq!(heart.st_slope, "Up");
        assert!((heart.oldpeak - 1.2).abs() < f64::EPSILON);
    }

    #[test]
    fn heart_payload_serializes_with_contract_casing() {
        let payload = transform(&heart_record(), &HEART_SPEC).expect("transforms");
        let json = serde_json::to_value(&payload).expect("serializes");

        assert_eq!(json["Age"], 54);
        assert_eq!(json["ChestPainType"], "ASY");
        assert_eq!(json["FastingBS"], 1);
        assert_eq!(json["ST_Slope"], "Up");
        assert!(json.get("age").is_none());
        assert!(json.get("restingECG").is_none());
    }

    #[test]
    fn diabetes_payload_coerces_booleans_and_sex() {
        let payload = transform(&diabetes_record(), &DIABETES_SPEC).expect("transforms");
        let AssessmentPayload::Diabetes(diabetes) = payload else {
            panic!("diabetes spec must yield a diabetes payload");
        };

        assert!(!diabetes.smoker);
        assert!(diabetes.phys_activity);
        assert!(diabetes.chol_check);
        assert_eq!(diabetes.sex, "Male");
        assert_eq!(diabetes.annual_income, 35_000);
        assert_eq!(diabetes.gen_health, 3);
    }

    #[test]
    fn every_declared_bracket_maps_to_its_midpoint() {
        for (label, midpoint) in INCOME_BRACKETS {
            assert_eq!(income_bracket_midpoint(label), *midpoint, "bracket {label}");
        }
    }

    #[test]
    fn ascii_hyphen_spelling_resolves_like_the_en_dash() {
        assert_eq!(income_bracket_midpoint("10k-20k"), 15_000);
        assert_eq!(income_bracket_midpoint("60k-70k"), 65_000);
    }

    #[test]
    fn unknown_bracket_falls_back_to_zero() {
        assert_eq!(income_bracket_midpoint("70k\u{2013}80k"), 0);
        assert_eq!(income_bracket_midpoint(""), 0);
    }

    #[test]
    fn unknown_boolean_token_is_a_defect() {
        let record = diabetes_record().with("smokingStatus", "maybe");
        let err = transform(&record, &DIABETES_SPEC).expect_err("token outside vocabulary");
        assert_eq!(
            err,
            TransformError::Boolean {
                field: "smokingStatus",
                value: "maybe".to_string(),
            }
        );
    }

    #[test]
    fn vocabulary_violation_is_a_defect() {
        let record = heart_record().with("ST_Slope", "Sideways");
        let err = transform(&record, &HEART_SPEC).expect_err("slope outside vocabulary");
        assert_eq!(
            err,
            TransformError::Vocabulary {
                field: "ST_Slope",
                value: "Sideways".to_string(),
            }
        );
    }

    #[test]
    fn numeric_drift_is_a_defect() {
        let record = heart_record().with("maxHR", "fast");
        let err = transform(&record, &HEART_SPEC).expect_err("non-numeric after validation");
        assert_eq!(
            err,
            TransformError::Numeric {
                field: "maxHR",
                value: "fast".to_string(),
            }
        );
    }
}
