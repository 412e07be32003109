pub mod explanation;
pub mod record;
pub mod registry;
pub mod transform;
pub mod validate;
pub mod view;

pub use explanation::{parse_explanation, ExplanationDocument, Item, Section};
pub use record::RawRecord;
pub use registry::{AssessmentKind, AssessmentSpec, FieldKind, FieldSpec, RegistryError};
pub use transform::{
    income_bracket_midpoint, transform, AssessmentPayload, DiabetesPayload, HeartPayload,
    TransformError,
};
pub use validate::{validate, ValidationResult};
pub use view::{Contributor, ContributorView, Impact, PredictionResponse, ResultViewModel};
