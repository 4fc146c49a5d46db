//! API check compilation
//!
//! One `test()` per request, preceded by a reachability check on the base
//! URL. Redirects are not followed so 3xx statuses stay observable.

use crate::scenario::{ApiRequestSpec, ApiSuite};

use super::js::{self, SourceWriter};
use super::{unique_titles, CompileOptions};

/// Statuses that prove the base URL answers at all
pub const REACHABLE_STATUSES: [u16; 12] = [200, 201, 202, 204, 301, 302, 303, 307, 308, 400, 401, 403];

/// Statuses a checked endpoint may return without failing
pub const ACCEPTED_STATUSES: [u16; 15] = [
    200, 201, 202, 204, 301, 302, 303, 307, 308, 400, 401, 403, 405, 409, 422,
];

/// Characters of a 5xx response body kept in the failure message
pub const ERROR_BODY_LIMIT: usize = 300;

/// Title of the implicit first unit
pub const REACHABILITY_TITLE: &str = "base URL reachable";

pub(super) fn emit(
    w: &mut SourceWriter,
    suite: &ApiSuite,
    base_url: &str,
    options: &CompileOptions,
) -> Vec<String> {
    let headers = serde_json::to_value(&suite.headers).unwrap_or_default();

    w.line(&format!("const BASE_URL = {};", js::str_lit(base_url)));
    w.line(&format!("const HEADERS = {};", js::value_lit(&headers)));
    w.line(&format!(
        "const REACHABLE_STATUSES = {};",
        js::status_list(&REACHABLE_STATUSES)
    ));
    w.line(&format!(
        "const ACCEPTED_STATUSES = {};",
        js::status_list(&ACCEPTED_STATUSES)
    ));
    w.blank();

    let labels: Vec<String> = suite.requests.iter().map(label).collect();
    let mut titles = vec![REACHABILITY_TITLE.to_string()];
    titles.extend(labels.iter().cloned());
    let titles = unique_titles(titles);

    w.open(&format!(
        "test({}, async ({{ request }}) => {{",
        js::str_lit(&titles[0])
    ));
    options.emit_timeout(w);
    w.line("const res = await request.get(BASE_URL + \"/\", { headers: HEADERS, maxRedirects: 0 });");
    w.line("expect(REACHABLE_STATUSES).toContain(res.status());");
    w.close("});");

    for ((request, label), title) in suite.requests.iter().zip(&labels).zip(&titles[1..]) {
        w.blank();
        emit_request(w, request, label, title, options);
    }

    titles
}

fn label(request: &ApiRequestSpec) -> String {
    format!("{} {}", request.method, request.path)
}

fn emit_request(
    w: &mut SourceWriter,
    request: &ApiRequestSpec,
    label: &str,
    title: &str,
    options: &CompileOptions,
) {
    let mut fetch_opts = format!(
        "{{ method: {}, headers: HEADERS, maxRedirects: 0",
        js::str_lit(request.method.as_str())
    );
    if let Some(body) = request.body.as_ref().filter(|_| request.method.carries_body()) {
        fetch_opts.push_str(&format!(", data: {}", js::value_lit(body)));
    }
    fetch_opts.push_str(" }");

    let label_lit = js::str_lit(label);

    w.open(&format!(
        "test({}, async ({{ request }}) => {{",
        js::str_lit(title)
    ));
    options.emit_timeout(w);
    w.line(&format!(
        "const res = await request.fetch(BASE_URL + {}, {});",
        js::str_lit(&request.path),
        fetch_opts
    ));
    w.line("const status = res.status();");
    w.open("if (status === 404) {");
    w.line(&format!(
        "throw new Error(\"Endpoint not found (404): \" + {});",
        label_lit
    ));
    w.close("}");
    w.open("if (status >= 500) {");
    w.line(&format!(
        "const body = (await res.text()).slice(0, {});",
        ERROR_BODY_LIMIT
    ));
    w.line(&format!(
        "throw new Error(\"Server error \" + status + \" for \" + {} + \": \" + body);",
        label_lit
    ));
    w.close("}");
    w.line("expect(ACCEPTED_STATUSES).toContain(status);");
    w.close("});");
}
