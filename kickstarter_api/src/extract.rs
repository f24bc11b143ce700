//! Extraction of the project blob embedded in a description page.
//!
//! Kickstarter renders the project as an assignment inside an inline script:
//!
//! ```text
//! window.current_project = "{&quot;id&quot;:42,&quot;name&quot;:...}";
//! ```
//!
//! The JSON object is HTML-escaped and wrapped in a string literal, so the
//! captured text has to go through entity decoding before `serde_json` sees it.

use regex::Regex;
use scraper::{Html, Selector};

use crate::types::ProjectData;
use crate::Error;

/// Matches `window.current_project = "<escaped json object>"`.
pub const PROJECT_DATA_PATTERN: &str = r#"window\.current_project\s*=\s*"(\{.*\})""#;

/// Parses a description page and decodes the embedded project data.
pub fn html_to_project(html: &str) -> Result<ProjectData, Error> {
    let raw = find_project_json(html)?;
    let project: ProjectData = serde_json::from_str(&raw)?;
    Ok(project)
}

/// Returns the decoded JSON text of the first script that assigns the
/// project data.
pub fn find_project_json(html: &str) -> Result<String, Error> {
    if html.trim().is_empty() {
        return Err(Error::Parse("empty document".into()));
    }

    let re = Regex::new(PROJECT_DATA_PATTERN)
        .map_err(|e| Error::Parse(format!("regex compile error: {}", e)))?;
    let script_sel = Selector::parse("script")
        .map_err(|e| Error::Parse(format!("selector error: {}", e)))?;

    let doc = Html::parse_document(html);
    for script in doc.select(&script_sel) {
        let text: String = script.text().collect();
        if let Some(cap) = re.captures(&text) {
            let escaped = &cap[1];
            tracing::debug!(len = escaped.len(), "found embedded project data");
            return Ok(html_escape::decode_html_entities(escaped).into_owned());
        }
    }

    Err(Error::MissingPayload)
}
