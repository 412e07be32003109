use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentKind {
    Diabetes,
    Heart,
}

impl AssessmentKind {
    pub const fn ordered() -> [Self; 2] {
        [Self::Diabetes, Self::Heart]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Diabetes => "Diabetes Risk Assessment",
            Self::Heart => "Heart Disease Risk Assessment",
        }
    }

    pub fn spec(self) -> &'static AssessmentSpec {
        match self {
            Self::Diabetes => &DIABETES_SPEC,
            Self::Heart => &HEART_SPEC,
        }
    }
}

/// Coercion rule for a single form field. The vocabulary of boolean
/// fields varies per control: the diabetes form uses "yes"/"no" radios,
/// the heart form uses "Y"/"N" and "1"/"0" pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Whole number captured as text by a numeric input.
    Int,
    /// Decimal number captured as text by a numeric input.
    Float,
    /// "yes"/"no" radio pair.
    YesNo,
    /// "Y"/"N" radio pair.
    YesNoLetter,
    /// "1"/"0" radio pair. "0" is an explicit answer, never absence.
    Binary,
    /// Fixed vocabulary forwarded to the backend verbatim or remapped.
    Choice(&'static [&'static str]),
    /// Income bracket remapped to its interval midpoint.
    IncomeBracket,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub kind: FieldKind,
}

/// Declarative per-assessment field table. Every field a form can
/// produce must resolve here; a lookup miss during transformation is a
/// programming defect, not user input.
#[derive(Debug)]
pub struct AssessmentSpec {
    pub kind: AssessmentKind,
    fields: &'static [FieldSpec],
}

impl AssessmentSpec {
    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub(crate) fn expect_field(&self, name: &'static str) -> Result<&'static FieldSpec, RegistryError> {
        self.field(name).ok_or(RegistryError::UnknownField {
            assessment: self.kind,
            field: name,
        })
    }
}

pub static DIABETES_SPEC: AssessmentSpec = AssessmentSpec {
    kind: AssessmentKind::Diabetes,
    fields: &[
        FieldSpec {
            name: "systolicBP",
            label: "Systolic blood pressure",
            required: true,
            kind: FieldKind::Int,
        },
        FieldSpec {
            name: "diastolicBP",
            label: "Diastolic blood pressure",
            required: true,
            kind: FieldKind::Int,
        },
        FieldSpec {
            name: "cholesterolLevel",
            label: "Cholesterol level",
            required: true,
            kind: FieldKind::Int,
        },
        FieldSpec {
            name: "bmi",
            label: "BMI",
            required: true,
            kind: FieldKind::Float,
        },
        FieldSpec {
            name: "smokingStatus",
            label: "Smoking status",
            required: true,
            kind: FieldKind::YesNo,
        },
        FieldSpec {
            name: "physicalActivity",
            label: "Physical activity",
            required: true,
            kind: FieldKind::YesNo,
        },
        FieldSpec {
            name: "heavyAlcoholUse",
            label: "Heavy alcohol use",
            required: true,
            kind: FieldKind::YesNo,
        },
        FieldSpec {
            name: "heartDisease",
            label: "Heart disease history",
            required: true,
            kind: FieldKind::YesNo,
        },
        FieldSpec {
            name: "difficultyWalking",
            label: "Difficulty walking",
            required: true,
            kind: FieldKind::YesNo,
        },
        FieldSpec {
            name: "stroke",
            label: "Stroke history",
            required: true,
            kind: FieldKind::YesNo,
        },
        FieldSpec {
            name: "cholesterolCheck",
            label: "Cholesterol check",
            required: true,
            kind: FieldKind::YesNo,
        },
        FieldSpec {
            name: "sex",
            label: "Sex",
            required: true,
            kind: FieldKind::Choice(&["male", "female"]),
        },
        FieldSpec {
            name: "age",
            label: "Age",
            required: true,
            kind: FieldKind::Int,
        },
        FieldSpec {
            name: "annualIncome",
            label: "Annual income",
            required: true,
            kind: FieldKind::IncomeBracket,
        },
        FieldSpec {
            name: "generalHealth",
            label: "General health",
            required: true,
            kind: FieldKind::Int,
        },
    ],
};

pub static HEART_SPEC: AssessmentSpec = AssessmentSpec {
    kind: AssessmentKind::Heart,
    fields: &[
        FieldSpec {
            name: "age",
            label: "Age",
            required: true,
            kind: FieldKind::Int,
        },
        FieldSpec {
            name: "sex",
            label: "Sex",
            required: true,
            kind: FieldKind::Choice(&["M", "F"]),
        },
        FieldSpec {
            name: "chestPainType",
            label: "Chest pain type",
            required: true,
            kind: FieldKind::Choice(&["None", "TA", "ATA", "NAP", "ASY"]),
        },
        FieldSpec {
            name: "restingBP",
            label: "Resting BP",
            required: true,
            kind: FieldKind::Int,
        },
        FieldSpec {
            name: "cholesterol",
            label: "Cholesterol",
            required: true,
            kind: FieldKind::Int,
        },
        FieldSpec {
            name: "fastingBS",
            label: "Fasting blood sugar",
            required: true,
            kind: FieldKind::Binary,
        },
        // Captured by the form but never forwarded upstream.
        FieldSpec {
            name: "restingECG",
            label: "Resting ECG",
            required: false,
            kind: FieldKind::Choice(&["Normal", "ST", "LVH"]),
        },
        FieldSpec {
            name: "maxHR",
            label: "Max heart rate",
            required: true,
            kind: FieldKind::Int,
        },
        FieldSpec {
            name: "exerciseAngina",
            label: "Exercise angina",
            required: true,
            kind: FieldKind::YesNoLetter,
        },
        FieldSpec {
            name: "oldpeak",
            label: "ST depression (oldpeak)",
            required: true,
            kind: FieldKind::Float,
        },
        FieldSpec {
            name: "ST_Slope",
            label: "ST segment slope",
            required: true,
            kind: FieldKind::Choice(&["Up", "Flat", "Down"]),
        },
    ],
};

/// Registry/mapping gaps. These indicate the field tables and the
/// transformer have drifted apart and are never surfaced to end users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    UnknownField {
        assessment: AssessmentKind,
        field: &'static str,
    },
    UnmappedOption {
        field: &'static str,
        option: String,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::UnknownField { assessment, field } => write!(
                f,
                "field '{}' has no FieldSpec in the {} registry",
                field,
                assessment.label()
            ),
            RegistryError::UnmappedOption { field, option } => write!(
                f,
                "declared option '{}' for field '{}' has no mapping entry",
                option, field
            ),
        }
    }
}

impl std::error::Error for RegistryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_form_field_resolves_to_a_spec() {
        for kind in AssessmentKind::ordered() {
            let spec = kind.spec();
            assert!(!spec.fields().is_empty());
            for field in spec.fields() {
                assert_eq!(spec.field(field.name).map(|f| f.name), Some(field.name));
            }
        }
    }

    #[test]
    fn diabetes_registry_is_fully_required() {
        assert!(DIABETES_SPEC.fields().iter().all(|field| field.required));
        assert_eq!(DIABETES_SPEC.fields().len(), 15);
    }

    #[test]
    fn heart_registry_marks_only_resting_ecg_optional() {
        let optional: Vec<_> = HEART_SPEC
            .fields()
            .iter()
            .filter(|field| !field.required)
            .map(|field| field.name)
            .collect();
        assert_eq!(optional, vec!["restingECG"]);
    }

    #[test]
    fn unknown_field_lookup_is_a_registry_error() {
        let err = HEART_SPEC.expect_field("bloodType").expect_err("no such field");
        assert_eq!(
            err,
            RegistryError::UnknownField {
                assessment: AssessmentKind::Heart,
                field: "bloodType",
            }
        );
    }
}
