//! UI scenario compilation
//!
//! Each scenario becomes one `test()` whose body is the scenario's steps in
//! order, one statement block per step.

use crate::scenario::{UiScenario, UiStep};

use super::js::{self, SourceWriter};
use super::{resolve_target, unique_titles, CompileOptions};

pub(super) fn emit(
    w: &mut SourceWriter,
    scenarios: &[UiScenario],
    base_url: &str,
    options: &CompileOptions,
) -> Vec<String> {
    let titles = unique_titles(scenarios.iter().map(|s| s.name.clone()).collect());

    for (i, (scenario, title)) in scenarios.iter().zip(&titles).enumerate() {
        if i > 0 {
            w.blank();
        }
        w.open(&format!(
            "test({}, async ({{ page }}) => {{",
            js::str_lit(title)
        ));
        options.emit_timeout(w);
        w.line(&format!(
            "await page.goto({});",
            js::str_lit(&resolve_target(base_url, &scenario.start_path))
        ));
        for (n, step) in scenario.steps.iter().enumerate() {
            w.line(&format!("// step {}: {}", n + 1, step.step_type()));
            emit_step(w, step, base_url);
        }
        w.close("});");
    }

    titles
}

fn locator(selector: &str) -> String {
    format!("page.locator({})", js::str_lit(selector))
}

fn emit_step(w: &mut SourceWriter, step: &UiStep, base_url: &str) {
    let stmt = match step {
        UiStep::Goto { path } => format!(
            "await page.goto({});",
            js::str_lit(&resolve_target(base_url, path))
        ),
        UiStep::Click { selector } => format!("await {}.click();", locator(selector)),
        UiStep::Fill { selector, value } => format!(
            "await {}.fill({});",
            locator(selector),
            js::str_lit(value)
        ),
        UiStep::Press { selector, key } => format!(
            "await {}.press({});",
            locator(selector),
            js::str_lit(key)
        ),
        UiStep::WaitFor { ms: Some(ms), .. } => format!("await page.waitForTimeout({});", ms),
        UiStep::WaitFor {
            selector: Some(selector),
            ms: None,
        } => format!(
            "await {}.waitFor({{ state: \"visible\" }});",
            locator(selector)
        ),
        UiStep::WaitFor {
            selector: None,
            ms: None,
        } => "throw new Error(\"waitFor step needs a selector or ms\");".to_string(),
        UiStep::ExpectVisible { selector } => {
            format!("await expect({}).toBeVisible();", locator(selector))
        }
        UiStep::ExpectHidden { selector } => {
            format!("await expect({}).toBeHidden();", locator(selector))
        }
        UiStep::ExpectTextContains { selector, value } => format!(
            "await expect({}.first()).toContainText({});",
            locator(selector),
            js::str_lit(value)
        ),
        UiStep::ExpectUrlContains { value } => format!(
            "await expect.poll(() => page.url()).toContain({});",
            js::str_lit(value)
        ),
        UiStep::ExpectTitleContains { value } => format!(
            "await expect.poll(() => page.title()).toContain({});",
            js::str_lit(value)
        ),
    };
    w.line(&stmt);
}
