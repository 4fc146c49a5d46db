//! Scenario compilation
//!
//! Renders a validated [`ScenarioSet`] into a Playwright test file. Every
//! API request and every UI scenario becomes exactly one `test()` unit, and
//! the unit titles are returned alongside the source so callers can match
//! report entries back to their inputs.

mod api;
pub mod js;
mod ui;

pub use api::{ACCEPTED_STATUSES, ERROR_BODY_LIMIT, REACHABILITY_TITLE, REACHABLE_STATUSES};

use tracing::debug;

use crate::common::{Error, Result};
use crate::scenario::{normalize_path, ScenarioSet};

use js::SourceWriter;

/// File name of the compiled test program inside a session directory
pub const TEST_FILE: &str = "scenarios.spec.mjs";

/// File name of the runner config inside a session directory
pub const CONFIG_FILE: &str = "playwright.config.mjs";

/// File name the json reporter writes inside a session directory
pub const REPORT_FILE: &str = "report.json";

/// Options that change the emitted program
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Per-unit timeout in milliseconds
    pub timeout_ms: Option<u64>,
}

impl CompileOptions {
    fn emit_timeout(&self, w: &mut SourceWriter) {
        if let Some(ms) = self.timeout_ms {
            w.line(&format!("test.setTimeout({});", ms));
        }
    }
}

/// A compiled test program
#[derive(Debug, Clone)]
pub struct CompiledProgram {
    pub source: String,
    /// Titles of the emitted units, in order
    pub units: Vec<String>,
}

/// Resolve a navigation target against the base URL.
///
/// Absolute `http(s)://` targets pass through unchanged.
pub fn resolve_target(base_url: &str, path: &str) -> String {
    let path = path.trim();
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!("{}{}", base_url, normalize_path(path))
}

/// Playwright rejects duplicate titles in one file, so repeats get a suffix
fn unique_titles(titles: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(titles.len());
    for title in titles {
        let mut candidate = title.clone();
        let mut n = 2;
        while seen.contains(&candidate) {
            candidate = format!("{} (#{})", title, n);
            n += 1;
        }
        seen.push(candidate);
    }
    seen
}

/// Compile a validated scenario set into Playwright test source
pub fn compile(
    set: &ScenarioSet,
    base_url: &str,
    options: &CompileOptions,
) -> Result<CompiledProgram> {
    let mut w = SourceWriter::new();
    w.line("// Generated by qa-harness. Do not edit.");
    w.line("import { test, expect } from \"@playwright/test\";");
    w.blank();

    let units = match set {
        ScenarioSet::Api(suite) => {
            if suite.requests.is_empty() {
                return Err(Error::Compile("no API requests to compile".to_string()));
            }
            api::emit(&mut w, suite, base_url, options)
        }
        ScenarioSet::Ui(scenarios) => {
            if scenarios.is_empty() {
                return Err(Error::Compile("no UI scenarios to compile".to_string()));
            }
            ui::emit(&mut w, scenarios, base_url, options)
        }
    };

    debug!(mode = %set.mode(), units = units.len(), "compiled test program");
    Ok(CompiledProgram {
        source: w.finish(),
        units,
    })
}

/// The fixed runner config written next to the test file
pub fn render_config() -> String {
    let mut w = SourceWriter::new();
    w.line("// Generated by qa-harness. Do not edit.");
    w.open("export default {");
    w.line("testDir: \".\",");
    w.line(&format!("testMatch: {},", js::str_lit(TEST_FILE)));
    w.line("outputDir: \"test-results\",");
    w.line("fullyParallel: true,");
    w.line("retries: 0,");
    w.line(&format!(
        "reporter: [[\"json\", {{ outputFile: {} }}]],",
        js::str_lit(REPORT_FILE)
    ));
    w.line("use: { headless: true },");
    w.close("};");
    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{
        normalize_requests, validate_ui_spec, ApiSuite, Headers, UiScenario, UiStep,
    };
    use serde_json::json;

    fn position(haystack: &str, needle: &str) -> usize {
        haystack
            .find(needle)
            .unwrap_or_else(|| panic!("'{}' not found in:\n{}", needle, haystack))
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("http://x", "login"), "http://x/login");
        assert_eq!(resolve_target("http://x", "/login"), "http://x/login");
        assert_eq!(
            resolve_target("http://x", "https://other/a"),
            "https://other/a"
        );
    }

    #[test]
    fn test_login_scenario_compiles_in_order() {
        let scenarios = validate_ui_spec(&json!([{
            "name": "Login",
            "startPath": "/login",
            "steps": [
                {"type": "fill", "selector": "#email", "value": "a@b.c"},
                {"type": "click", "selector": "button[type=submit]"},
                {"type": "expectUrlContains", "value": "/dashboard"}
            ]
        }]))
        .unwrap();

        let program =
            compile(&ScenarioSet::Ui(scenarios), "http://app", &CompileOptions::default()).unwrap();
        assert_eq!(program.units, vec!["Login"]);
        assert_eq!(program.source.matches("test(\"").count(), 1);

        let src = &program.source;
        let nav = position(src, "await page.goto(\"http://app/login\");");
        let fill = position(src, "page.locator(\"#email\").fill(\"a@b.c\")");
        let click = position(src, "page.locator(\"button[type=submit]\").click()");
        let assert_url = position(src, "toContain(\"/dashboard\")");
        assert!(nav < fill && fill < click && click < assert_url);
    }

    #[test]
    fn test_every_step_type_emits_a_statement() {
        let scenario = UiScenario {
            name: "All".into(),
            start_path: "https://elsewhere/start".into(),
            steps: vec![
                UiStep::Goto { path: "next".into() },
                UiStep::Press {
                    selector: "#q".into(),
                    key: "Enter".into(),
                },
                UiStep::WaitFor {
                    selector: None,
                    ms: Some(800),
                },
                UiStep::WaitFor {
                    selector: Some(".ready".into()),
                    ms: None,
                },
                UiStep::ExpectVisible {
                    selector: "h1".into(),
                },
                UiStep::ExpectHidden {
                    selector: ".spinner".into(),
                },
                UiStep::ExpectTextContains {
                    selector: "h1".into(),
                    value: "Welcome".into(),
                },
                UiStep::ExpectTitleContains {
                    value: "Home".into(),
                },
            ],
        };
        let program = compile(
            &ScenarioSet::Ui(vec![scenario]),
            "http://app",
            &CompileOptions { timeout_ms: Some(5000) },
        )
        .unwrap();
        let src = &program.source;
        assert!(src.contains("await page.goto(\"https://elsewhere/start\");"));
        assert!(src.contains("await page.goto(\"http://app/next\");"));
        assert!(src.contains(".press(\"Enter\")"));
        assert!(src.contains("await page.waitForTimeout(800);"));
        assert!(src.contains("page.locator(\".ready\").waitFor({ state: \"visible\" })"));
        assert!(src.contains("toBeVisible()"));
        assert!(src.contains("toBeHidden()"));
        assert!(src.contains("toContainText(\"Welcome\")"));
        assert!(src.contains("page.title()).toContain(\"Home\")"));
        assert!(src.contains("test.setTimeout(5000);"));
        assert_eq!(src.matches("// step ").count(), 8);
    }

    #[test]
    fn test_api_units_map_one_to_one() {
        let requests = normalize_requests(&json!([
            {"path": "/health"},
            {"method": "POST", "path": "/items", "body": {"name": "x"}},
            {"method": "GET", "path": "/search", "body": {"ignored": true}}
        ]))
        .unwrap();
        let mut headers = Headers::new();
        headers.insert("Authorization".into(), "Bearer t".into());
        let suite = ScenarioSet::Api(ApiSuite { requests, headers });

        let program = compile(&suite, "http://api", &CompileOptions::default()).unwrap();
        assert_eq!(
            program.units,
            vec![REACHABILITY_TITLE, "GET /health", "POST /items", "GET /search"]
        );
        let src = &program.source;
        assert_eq!(src.matches("test(\"").count(), 4);
        assert!(position(src, REACHABILITY_TITLE) < position(src, "GET /health"));
        assert!(src.contains("const HEADERS = {\"Authorization\":\"Bearer t\"};"));
        assert!(src.contains("data: {\"name\":\"x\"}"));
        assert!(!src.contains("ignored"));
        assert!(src.contains("status === 404"));
        assert!(src.contains(".slice(0, 300)"));
        assert!(src.contains(
            "const ACCEPTED_STATUSES = [200, 201, 202, 204, 301, 302, 303, 307, 308, 400, 401, 403, 405, 409, 422];"
        ));
    }

    #[test]
    fn test_duplicate_titles_get_suffixes() {
        let requests = normalize_requests(&json!([{"path": "/a"}, {"path": "/a"}])).unwrap();
        let suite = ScenarioSet::Api(ApiSuite {
            requests,
            headers: Headers::new(),
        });
        let program = compile(&suite, "http://api", &CompileOptions::default()).unwrap();
        assert_eq!(program.units[1], "GET /a");
        assert_eq!(program.units[2], "GET /a (#2)");
    }

    #[test]
    fn test_injection_safe_selectors() {
        let scenario = UiScenario {
            name: "quote\"); process.exit(1); (\"".into(),
            start_path: "/".into(),
            steps: vec![UiStep::Click {
                selector: "a[title=\"x\"]".into(),
            }],
        };
        let program = compile(
            &ScenarioSet::Ui(vec![scenario]),
            "http://app",
            &CompileOptions::default(),
        )
        .unwrap();
        assert!(program
            .source
            .contains(r#"test("quote\"); process.exit(1); (\"", async"#));
        assert!(program.source.contains(r#"page.locator("a[title=\"x\"]")"#));
    }

    #[test]
    fn test_empty_set_is_compile_error() {
        let err = compile(&ScenarioSet::Ui(vec![]), "http://x", &CompileOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Compile(_)));
    }

    #[test]
    fn test_config_points_at_session_files() {
        let config = render_config();
        assert!(config.contains("testMatch: \"scenarios.spec.mjs\""));
        assert!(config.contains("outputFile: \"report.json\""));
    }
}
