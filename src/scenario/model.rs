//! Scenario data model
//!
//! Typed forms of the two declarative inputs: a list of API requests and a
//! list of UI scenarios. Values of these types have already passed
//! validation; raw user input is parsed in [`super::validate`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Which kind of check a run performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// HTTP API checks
    Api,
    /// Browser UI scenarios
    Ui,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Api => write!(f, "api"),
            Mode::Ui => write!(f, "ui"),
        }
    }
}

/// HTTP verbs accepted in API checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether a request body is sent for this method
    pub fn carries_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl FromStr for HttpMethod {
    type Err = ();

    /// Parses an already uppercased verb
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(()),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One API request to check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequestSpec {
    pub method: HttpMethod,
    /// Always starts with `/`
    pub path: String,
    #[serde(default)]
    pub body: Option<Value>,
}

/// Headers sent with every API request, ordered for stable output
pub type Headers = BTreeMap<String, String>;

/// A validated set of API checks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiSuite {
    pub requests: Vec<ApiRequestSpec>,
    pub headers: Headers,
}

/// The step type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepType {
    Goto,
    Click,
    Fill,
    Press,
    WaitFor,
    ExpectVisible,
    ExpectHidden,
    ExpectTextContains,
    ExpectUrlContains,
    ExpectTitleContains,
}

impl StepType {
    pub const ALL: [StepType; 10] = [
        StepType::Goto,
        StepType::Click,
        StepType::Fill,
        StepType::Press,
        StepType::WaitFor,
        StepType::ExpectVisible,
        StepType::ExpectHidden,
        StepType::ExpectTextContains,
        StepType::ExpectUrlContains,
        StepType::ExpectTitleContains,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepType::Goto => "goto",
            StepType::Click => "click",
            StepType::Fill => "fill",
            StepType::Press => "press",
            StepType::WaitFor => "waitFor",
            StepType::ExpectVisible => "expectVisible",
            StepType::ExpectHidden => "expectHidden",
            StepType::ExpectTextContains => "expectTextContains",
            StepType::ExpectUrlContains => "expectUrlContains",
            StepType::ExpectTitleContains => "expectTitleContains",
        }
    }
}

impl FromStr for StepType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single browser step; each variant carries exactly the fields it needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UiStep {
    Goto {
        path: String,
    },
    Click {
        selector: String,
    },
    Fill {
        selector: String,
        value: String,
    },
    Press {
        selector: String,
        key: String,
    },
    /// Waits `ms` when given, otherwise for `selector` to become visible
    WaitFor {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        selector: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ms: Option<u64>,
    },
    ExpectVisible {
        selector: String,
    },
    ExpectHidden {
        selector: String,
    },
    ExpectTextContains {
        selector: String,
        value: String,
    },
    ExpectUrlContains {
        value: String,
    },
    ExpectTitleContains {
        value: String,
    },
}

impl UiStep {
    pub fn step_type(&self) -> StepType {
        match self {
            UiStep::Goto { .. } => StepType::Goto,
            UiStep::Click { .. } => StepType::Click,
            UiStep::Fill { .. } => StepType::Fill,
            UiStep::Press { .. } => StepType::Press,
            UiStep::WaitFor { .. } => StepType::WaitFor,
            UiStep::ExpectVisible { .. } => StepType::ExpectVisible,
            UiStep::ExpectHidden { .. } => StepType::ExpectHidden,
            UiStep::ExpectTextContains { .. } => StepType::ExpectTextContains,
            UiStep::ExpectUrlContains { .. } => StepType::ExpectUrlContains,
            UiStep::ExpectTitleContains { .. } => StepType::ExpectTitleContains,
        }
    }
}

/// A named, ordered browser scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiScenario {
    pub name: String,
    pub start_path: String,
    pub steps: Vec<UiStep>,
}

/// Validated input for one run
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioSet {
    Api(ApiSuite),
    Ui(Vec<UiScenario>),
}

impl ScenarioSet {
    pub fn mode(&self) -> Mode {
        match self {
            ScenarioSet::Api(_) => Mode::Api,
            ScenarioSet::Ui(_) => Mode::Ui,
        }
    }

    /// JSON form used by the `validate` command
    pub fn to_json(&self) -> Value {
        match self {
            ScenarioSet::Api(suite) => serde_json::json!(suite),
            ScenarioSet::Ui(scenarios) => serde_json::json!(scenarios),
        }
    }
}
