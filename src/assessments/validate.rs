use crate::assessments::record::RawRecord;
use crate::assessments::registry::{AssessmentSpec, FieldKind};
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of a validation pass. Either the record is clean or every
/// violated field carries a message suitable for inline display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    errors: BTreeMap<&'static str, String>,
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &BTreeMap<&'static str, String> {
        &self.errors
    }

    pub fn into_errors(self) -> BTreeMap<&'static str, String> {
        self.errors
    }
}

/// Check every required field in one pass so a form client can
/// highlight all offending controls at once. Empty and missing values
/// are absent; for numeric fields, unparseable content is treated the
/// same way. A boolean "0" is an explicit negative answer and counts
/// as present.
pub fn validate(raw: &RawRecord, spec: &AssessmentSpec) -> ValidationResult {
    let mut errors = BTreeMap::new();

    for field in spec.fields() {
        if !field.required {
            continue;
        }

        let value = raw.get(field.name).map(str::trim).unwrap_or("");
        if value.is_empty() {
            errors.insert(field.name, format!("{} is required.", field.label));
            continue;
        }

        let numeric_ok = match field.kind {
            FieldKind::Int => value.parse::<i64>().is_ok(),
            FieldKind::Float => value.parse::<f64>().is_ok(),
            _ => true,
        };
        if !numeric_ok {
            errors.insert(field.name, format!("{} must be a number.", field.label));
        }
    }

    ValidationResult { errors }
}
