//! Building scenario sets and raw output from CLI arguments

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::commands::ScenarioArgs;
use crate::common::{Error, Result};
use crate::normalize::RawOutput;
use crate::scenario::{
    normalize_endpoints, normalize_requests, parse_headers, validate_base_url, validate_ui_spec,
    ApiSuite, Headers, Mode, ScenarioSet,
};

/// Parse a JSON-valued argument, reporting bad input as a validation error
fn parse_json_arg(name: &str, text: &str) -> Result<Value> {
    serde_json::from_str(text)
        .map_err(|e| Error::validation(format!("{} is not valid JSON: {}", name, e)))
}

/// Read a UI scenario file. YAML is chosen by extension, anything else is
/// parsed as JSON. A `{tests: [...]}` wrapper is accepted.
pub fn read_ui_spec_file(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );

    let value: Value = if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| {
            Error::validation(format!("{} is not valid YAML: {}", path.display(), e))
        })?
    } else {
        parse_json_arg(&path.display().to_string(), &content)?
    };

    Ok(match value {
        Value::Object(mut obj) if obj.get("tests").is_some_and(Value::is_array) => {
            obj.remove("tests").unwrap_or_default()
        }
        other => other,
    })
}

/// Validate the scenario arguments into a scenario set and base URL
pub fn load_scenarios(args: &ScenarioArgs) -> Result<(ScenarioSet, String)> {
    let base_url = validate_base_url(&args.base_url)?;

    let set = match args.mode {
        Mode::Api => {
            let requests = match (&args.requests, &args.endpoints) {
                (Some(json), _) => normalize_requests(&parse_json_arg("requests", json)?)?,
                (None, Some(list)) => normalize_endpoints(list)?,
                (None, None) => {
                    return Err(Error::validation(
                        "API mode needs --requests or --endpoints",
                    ))
                }
            };
            let headers = match &args.headers {
                Some(json) => parse_headers(&parse_json_arg("headers", json)?)?,
                None => Headers::new(),
            };
            ScenarioSet::Api(ApiSuite { requests, headers })
        }
        Mode::Ui => {
            let raw = match (&args.ui_spec, &args.ui_spec_file) {
                (Some(json), _) => parse_json_arg("uiSpec", json)?,
                (None, Some(path)) => read_ui_spec_file(path)?,
                (None, None) => {
                    return Err(Error::validation(
                        "UI mode needs --ui-spec or --ui-spec-file",
                    ))
                }
            };
            ScenarioSet::Ui(validate_ui_spec(&raw)?)
        }
    };

    debug!(mode = %set.mode(), base_url = %base_url, "loaded scenario set");
    Ok((set, base_url))
}

fn read_optional(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e)),
        None => Ok(String::new()),
    }
}

/// Assemble raw output from captured files
pub fn load_raw_output(
    stdout: Option<&Path>,
    stderr: Option<&Path>,
    structured: Option<&Path>,
    exit_code: Option<i32>,
) -> Result<RawOutput> {
    let structured = match structured {
        Some(path) => {
            let content =
                std::fs::read_to_string(path).map_err(|e| Error::report_unreadable(path, e))?;
            Some(serde_json::from_str(&content).map_err(|e| Error::report_unreadable(path, e))?)
        }
        None => None,
    };

    Ok(RawOutput {
        structured,
        stdout: read_optional(stdout)?,
        stderr: read_optional(stderr)?,
        exit_code,
    })
}
