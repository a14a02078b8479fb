//! Page shell shared by every HTML route.

use chrono::Datelike;
use uuid::Uuid;

const HEADER_HTML: &str = include_str!("../templates/header.html");
const FOOTER_HTML: &str = include_str!("../templates/footer.html");

/// Escape text for HTML bodies and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Header with its links pinned to the visitor's session, when there is one.
pub fn header_html(session: Option<Uuid>) -> String {
    let query = session.map(|id| format!("?session={}", id)).unwrap_or_default();
    HEADER_HTML.replace("{{session_query}}", &query)
}

pub fn footer_html() -> String {
    FOOTER_HTML.replace("{{year}}", &chrono::Utc::now().year().to_string())
}

/// Wrap page content in the document, header and footer.
pub fn page(title: &str, session: Option<Uuid>, main: &str) -> String {
    format!(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{} | ChatLomhat</title>
    <link rel="stylesheet" href="/static/css/main.css">
</head>
<body>
{}
<main class="container main-content">
{}
</main>
{}
<script src="/static/js/connectivity.js" defer></script>
</body>
</html>"#, escape(title), header_html(session), main, footer_html())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"x" & 'y'</b>"#),
            "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;"
        );
        assert_eq!(escape("2x + 5 = 13"), "2x + 5 = 13");
    }

    #[test]
    fn test_header_links_keep_session() {
        let id = Uuid::new_v4();
        let html = header_html(Some(id));
        assert!(html.contains(&format!(r#"href="/?session={}""#, id)));
        assert!(html.contains(&format!(r#"href="/about?session={}""#, id)));
        assert!(!html.contains("{{session_query}}"));

        let html = header_html(None);
        assert!(html.contains(r#"href="/""#));
        assert!(html.contains(r#"href="/about""#));
    }

    #[test]
    fn test_footer_has_current_year() {
        let year = chrono::Utc::now().year().to_string();
        assert!(footer_html().contains(&year));
        assert!(!footer_html().contains("{{year}}"));
    }
}
