//! Declarative scenarios
//!
//! The model, its validator and the step editor. Everything downstream of
//! this module works only with validated values.

pub mod edit;
pub mod model;
pub mod validate;

pub use edit::{apply_type_change, StepDraft};
pub use model::{
    ApiRequestSpec, ApiSuite, Headers, HttpMethod, Mode, ScenarioSet, StepType, UiScenario, UiStep,
};
pub use validate::{
    normalize_base_url, normalize_endpoints, normalize_path, normalize_requests, parse_headers,
    step_from_draft, validate_base_url, validate_session_id, validate_ui_spec,
};
