use crate::{
    error::{PlotError, Result},
    visualization::escape_text,
};

const TITLE_PLACEHOLDER: &str = "{{title}}";

const JSON_SCRIPT_OPEN: &str = r#"<script type="application/json">"#;
const JSON_SCRIPT_CLOSE: &str = "</script>";

pub const DEFAULT_PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{title}}</title>
<style>
body { font-family: "Segoe UI", Helvetica, Arial, sans-serif; margin: 24px; color: #2a3f5f; }
h1 { font-size: 20px; font-weight: 600; }
svg { max-width: 100%; height: auto; }
</style>
</head>
<body>
<!-- SECTION:heading start -->
<!-- SECTION:heading end -->
<!-- SECTION:chart start -->
<!-- SECTION:chart end -->
<p>
<!-- SECTION:download start -->
<!-- SECTION:download end -->
</p>
<!-- SECTION:data start -->
<!-- SECTION:data end -->
</body>
</html>
"#;

#[derive(Clone, Debug)]
pub struct PageSection {
    id: String,
    content: String,
}

impl PageSection {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }

}

/// Byte range of the content of section `id`, between its start and end markers.
fn section_bounds(content: &str, id: &str) -> Result<(usize, usize)> {
    let start_marker = format!("<!-- SECTION:{} start -->", id);
    let end_marker = format!("<!-- SECTION:{} end -->", id);

    let start_idx = content
        .find(&start_marker)
        .ok_or_else(|| PlotError::invalid_chart(format!("missing start marker: {}", start_marker)))?
        + start_marker.len();
    let end_idx = content[start_idx..]
        .find(&end_marker)
        .ok_or_else(|| PlotError::invalid_chart(format!("missing end marker: {}", end_marker)))?
        + start_idx;
    Ok((start_idx, end_idx))
}

/// Fill [`DEFAULT_PAGE_TEMPLATE`] with a page title and section contents.
pub fn compose(title: &str, sections: &[PageSection]) -> Result<String> {
    let mut content = DEFAULT_PAGE_TEMPLATE.replacen(TITLE_PLACEHOLDER, &escape_text(title), 1);
    for section in sections {
        content = replace_section(&content, section)?;
    }
    Ok(content)
}

fn replace_section(content: &str, section: &PageSection) -> Result<String> {
    let (start, end) = section_bounds(content, &section.id)?;
    let body = section.content.trim_matches('\n');

    let mut updated = String::with_capacity(content.len() + body.len() + 2);
    updated.push_str(&content[..start]);
    updated.push('\n');
    if !body.is_empty() {
        updated.push_str(body);
        updated.push('\n');
    }
    updated.push_str(&content[end..]);
    Ok(updated)
}

/// Content between the markers of section `id`, without surrounding newlines.
pub fn section<'a>(content: &'a str, id: &str) -> Result<&'a str> {
    let (start, end) = section_bounds(content, id)?;
    Ok(content[start..end].trim_matches('\n'))
}

/// Wrap a JSON document in a data-only script element.
///
/// `<` only occurs inside JSON strings, where `\u003c` is an equivalent escape, so the payload
/// can never close the script element or forge a section marker.
pub fn embed_json(json: &str) -> String {
    format!(
        "{JSON_SCRIPT_OPEN}{}{JSON_SCRIPT_CLOSE}",
        json.replace('<', "\\u003c")
    )
}

/// The JSON document embedded by [`embed_json`] in section `id`.
pub fn embedded_json<'a>(content: &'a str, id: &str) -> Result<&'a str> {
    section(content, id)?
        .strip_prefix(JSON_SCRIPT_OPEN)
        .and_then(|rest| rest.strip_suffix(JSON_SCRIPT_CLOSE))
        .ok_or_else(|| PlotError::invalid_chart(format!("section `{id}` holds no JSON payload")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_fills_sections_and_title() {
        let page = compose(
            "Scores <1>",
            &[
                PageSection::new("heading", "<h1>Scores</h1>"),
                PageSection::new("chart", "\n<svg></svg>\n"),
            ],
        )
        .unwrap();

        assert!(page.contains("<title>Scores &lt;1&gt;</title>"));
        assert_eq!(section(&page, "heading").unwrap(), "<h1>Scores</h1>");
        assert_eq!(section(&page, "chart").unwrap(), "<svg></svg>");
        assert_eq!(section(&page, "download").unwrap(), "");
    }

    #[test]
    fn refilling_a_section_replaces_its_content() {
        let page = compose("t", &[PageSection::new("chart", "<svg>old</svg>")]).unwrap();
        let page = replace_section(&page, &PageSection::new("chart", "<svg>new</svg>")).unwrap();
        assert_eq!(section(&page, "chart").unwrap(), "<svg>new</svg>");
        assert!(!page.contains("old"));
    }

    #[test]
    fn unknown_section_is_rejected() {
        let err = compose("t", &[PageSection::new("sidebar", "x")]).unwrap_err();
        assert!(matches!(err, PlotError::InvalidChart { .. }));
        assert!(section(DEFAULT_PAGE_TEMPLATE, "sidebar").is_err());
    }

    #[test]
    fn embedded_json_cannot_escape_its_section() {
        let json = r#"{"name":"</script><!-- SECTION:data end -->"}"#;
        let page = compose("t", &[PageSection::new("data", embed_json(json))]).unwrap();

        let recovered = embedded_json(&page, "data").unwrap();
        let value: serde_json::Value = serde_json::from_str(recovered).unwrap();
        assert_eq!(value["name"], "</script><!-- SECTION:data end -->");
    }
}
