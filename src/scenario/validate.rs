//! Scenario validation
//!
//! Turns raw JSON input into the typed model. Every malformed entry is
//! reported; nothing is dropped silently. UI errors name the scenario, the
//! 1-based step index and the step type so the user can find the step.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::common::{Error, Result};

use super::edit::StepDraft;
use super::model::{ApiRequestSpec, Headers, HttpMethod, StepType, UiScenario, UiStep};

/// Force a leading `/` on a non-empty path.
///
/// `normalize_path("api/users") == "/api/users"`, `normalize_path("") == ""`.
pub fn normalize_path(path: &str) -> String {
    let path = path.trim();
    if path.is_empty() || path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Trim whitespace and trailing slashes from a base URL
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Normalize a base URL and reject an empty one
pub fn validate_base_url(url: &str) -> Result<String> {
    let normalized = normalize_base_url(url);
    if normalized.is_empty() {
        return Err(Error::validation("baseUrl is required"));
    }
    Ok(normalized)
}

/// Session ids become directory names, so only a safe charset is allowed
pub fn validate_session_id(id: &str) -> Result<&str> {
    let valid = !id.is_empty()
        && id != "."
        && id != ".."
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(id)
    } else {
        Err(Error::InvalidSession(id.to_string()))
    }
}

/// Validate a `requests` array of `{method, path, body?}` objects
pub fn normalize_requests(raw: &Value) -> Result<Vec<ApiRequestSpec>> {
    let items = match raw.as_array() {
        Some(items) if !items.is_empty() => items,
        _ => return Err(Error::validation("requests must be a non-empty array")),
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| normalize_request(i + 1, item))
        .collect()
}

fn normalize_request(index: usize, item: &Value) -> Result<ApiRequestSpec> {
    let obj = item.as_object().ok_or_else(|| {
        Error::validation(format!("Request {}: each request item must be an object", index))
    })?;

    let path = match obj.get("path") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    };

    let method_raw = match obj.get("method") {
        None | Some(Value::Null) => "GET".to_string(),
        Some(Value::String(s)) => s.trim().to_uppercase(),
        Some(other) => other.to_string().to_uppercase(),
    };
    let method: HttpMethod = method_raw.parse().map_err(|_| {
        Error::validation(format!(
            "Request {}: invalid method '{}' for path '{}'",
            index, method_raw, path
        ))
    })?;

    if path.is_empty() {
        return Err(Error::validation(format!(
            "Request {}: each request must have a non-empty 'path'",
            index
        )));
    }

    Ok(ApiRequestSpec {
        method,
        path: normalize_path(&path),
        body: obj.get("body").cloned().filter(|b| !b.is_null()),
    })
}

/// Turn a comma-separated endpoint list into GET requests
pub fn normalize_endpoints(list: &str) -> Result<Vec<ApiRequestSpec>> {
    let requests: Vec<ApiRequestSpec> = list
        .split(',')
        .map(str::trim)
        .filter(|ep| !ep.is_empty())
        .map(|ep| ApiRequestSpec {
            method: HttpMethod::Get,
            path: normalize_path(ep),
            body: None,
        })
        .collect();

    if requests.is_empty() {
        return Err(Error::validation("No valid endpoints provided"));
    }
    Ok(requests)
}

/// Validate a headers object; values must be strings
pub fn parse_headers(raw: &Value) -> Result<Headers> {
    let obj = match raw {
        Value::Null => return Ok(Headers::new()),
        Value::Object(obj) => obj,
        _ => return Err(Error::validation("headers must be an object (key/value)")),
    };

    obj.iter()
        .map(|(name, value)| match value {
            Value::String(s) => Ok((name.clone(), s.clone())),
            Value::Number(_) | Value::Bool(_) => Ok((name.clone(), value.to_string())),
            _ => Err(Error::validation(format!(
                "header '{}' must be a string value",
                name
            ))),
        })
        .collect()
}

/// Fields a raw step may carry; which ones matter depends on `type`
#[derive(Deserialize)]
struct RawStepFields {
    selector: Option<String>,
    value: Option<String>,
    key: Option<String>,
    path: Option<String>,
    ms: Option<u64>,
}

/// Validate a `uiSpec` array of scenarios
pub fn validate_ui_spec(raw: &Value) -> Result<Vec<UiScenario>> {
    let items = match raw.as_array() {
        Some(items) if !items.is_empty() => items,
        _ => return Err(Error::validation("uiSpec must be a non-empty array")),
    };

    let scenarios = items
        .iter()
        .enumerate()
        .map(|(i, item)| validate_scenario(i + 1, item))
        .collect::<Result<Vec<_>>>()?;

    debug!(count = scenarios.len(), "validated UI scenarios");
    Ok(scenarios)
}

fn validate_scenario(index: usize, item: &Value) -> Result<UiScenario> {
    let obj = item
        .as_object()
        .ok_or_else(|| Error::validation(format!("Scenario {}: must be an object", index)))?;

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or("");
    if name.is_empty() {
        return Err(Error::validation(format!(
            "Scenario {}: 'name' must be a non-empty string",
            index
        )));
    }

    let start_path = match obj.get("startPath") {
        None | Some(Value::Null) => "/".to_string(),
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(_) => {
            return Err(Error::validation(format!(
                "Scenario '{}': 'startPath' must be a non-empty string",
                name
            )))
        }
    };

    let raw_steps = match obj.get("steps") {
        None | Some(Value::Null) => &[][..],
        Some(Value::Array(steps)) => steps.as_slice(),
        Some(_) => {
            return Err(Error::validation(format!(
                "Scenario '{}': 'steps' must be an array",
                name
            )))
        }
    };

    let steps = raw_steps
        .iter()
        .enumerate()
        .map(|(i, step)| parse_step(step).map_err(|e| step_error(name, i + 1, step, &e)))
        .collect::<Result<Vec<_>>>()?;

    Ok(UiScenario {
        name: name.to_string(),
        start_path,
        steps,
    })
}

fn step_error(scenario: &str, step_num: usize, raw: &Value, reason: &str) -> Error {
    match raw.get("type").and_then(Value::as_str) {
        Some(t) => Error::validation(format!(
            "Scenario '{}' step {} ({}): {}",
            scenario, step_num, t, reason
        )),
        None => Error::validation(format!(
            "Scenario '{}' step {}: {}",
            scenario, step_num, reason
        )),
    }
}

fn parse_step(raw: &Value) -> std::result::Result<UiStep, String> {
    if !raw.is_object() {
        return Err("step must be an object".to_string());
    }
    let type_name = raw
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| "missing 'type'".to_string())?;
    let step_type: StepType = type_name
        .parse()
        .map_err(|_| format!("unsupported step type '{}'", type_name))?;

    let fields: RawStepFields =
        serde_json::from_value(raw.clone()).map_err(|e| format!("invalid field: {}", e))?;

    step_from_draft(&StepDraft {
        step_type,
        selector: fields.selector,
        value: fields.value,
        key: fields.key,
        path: fields.path,
        ms: fields.ms,
    })
}

fn require_text(field: &Option<String>, name: &str) -> std::result::Result<String, String> {
    match field {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(format!("missing required field '{}'", name)),
    }
}

fn require_defined(field: &Option<String>, name: &str) -> std::result::Result<String, String> {
    field
        .clone()
        .ok_or_else(|| format!("missing required field '{}'", name))
}

/// Check a draft against its type's required fields and build the step
pub fn step_from_draft(draft: &StepDraft) -> std::result::Result<UiStep, String> {
    let step = match draft.step_type {
        StepType::Goto => UiStep::Goto {
            path: require_text(&draft.path, "path")?,
        },
        StepType::Click => UiStep::Click {
            selector: require_text(&draft.selector, "selector")?,
        },
        StepType::ExpectVisible => UiStep::ExpectVisible {
            selector: require_text(&draft.selector, "selector")?,
        },
        StepType::ExpectHidden => UiStep::ExpectHidden {
            selector: require_text(&draft.selector, "selector")?,
        },
        StepType::Fill => UiStep::Fill {
            selector: require_text(&draft.selector, "selector")?,
            value: require_defined(&draft.value, "value")?,
        },
        StepType::Press => UiStep::Press {
            selector: require_text(&draft.selector, "selector")?,
            key: require_text(&draft.key, "key")?,
        },
        StepType::WaitFor => {
            let selector = draft
                .selector
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            if selector.is_none() && draft.ms.is_none() {
                return Err("requires 'selector' or 'ms'".to_string());
            }
            UiStep::WaitFor {
                selector,
                ms: draft.ms,
            }
        }
        StepType::ExpectTextContains => UiStep::ExpectTextContains {
            selector: require_text(&draft.selector, "selector")?,
            value: require_defined(&draft.value, "value")?,
        },
        StepType::ExpectUrlContains => UiStep::ExpectUrlContains {
            value: require_defined(&draft.value, "value")?,
        },
        StepType::ExpectTitleContains => UiStep::ExpectTitleContains {
            value: require_defined(&draft.value, "value")?,
        },
    };
    Ok(step)
}
