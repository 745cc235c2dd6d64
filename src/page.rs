//! The live viewer page.
//!
//! A single constant HTML document served at `/`. Its script reassigns the
//! image source to [`CAPTURE_PATH`] with a `t=<epoch-millis>` cache buster every
//! [`REFRESH_INTERVAL_MS`] milliseconds. The document is never templated or
//! modified at runtime, so it is shared across all requests without locking.

use axum::{
    http::header,
    response::{Html, IntoResponse},
};

/// Path the page polls for frames.
pub const CAPTURE_PATH: &str = "/capture";

/// Delay between image reloads in the page script.
pub const REFRESH_INTERVAL_MS: u64 = 1000;

/// The viewer document.
pub const INDEX_HTML: &str = r#"<!DOCTYPE html><html><head><meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1"><title>ESP32 Camera</title><style>body{margin:0;padding:0;background:#000;display:flex;justify-content:center;align-items:center;min-height:100vh}#photo{max-width:100%;max-height:100vh;display:block}</style></head><body><img id="photo" src="/capture"><script>setInterval(function(){document.getElementById('photo').src='/capture?t='+Date.now()},1000);</script></body></html>"#;

/// Viewer page handler.
pub async fn index() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        Html(INDEX_HTML),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOID_ELEMENTS: &[&str] = &["meta", "img", "link", "br", "hr", "input"];
    const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

    /// Walk the document's tags and check that every non-void element is closed
    /// in order. Returns the element names in opening order.
    fn check_balanced(html: &str) -> Result<Vec<String>, String> {
        let mut stack: Vec<String> = Vec::new();
        let mut opened = Vec::new();
        let mut rest = html;

        while let Some(start) = rest.find('<') {
            rest = &rest[start + 1..];
            let end = rest.find('>').ok_or("unterminated tag")?;
            let tag = &rest[..end];
            rest = &rest[end + 1..];

            if tag.starts_with('!') {
                continue;
            }
            if let Some(name) = tag.strip_prefix('/') {
                let expected = stack.pop().ok_or(format!("stray </{}>", name))?;
                if expected != name {
                    return Err(format!("expected </{}>, found </{}>", expected, name));
                }
                continue;
            }

            let name = tag
                .split(|c: char| c.is_whitespace() || c == '/')
                .next()
                .unwrap_or_default()
                .to_ascii_lowercase();
            opened.push(name.clone());
            if VOID_ELEMENTS.contains(&name.as_str()) {
                continue;
            }
            if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                let close = format!("</{}>", name);
                let pos = rest.find(&close).ok_or(format!("unclosed <{}>", name))?;
                rest = &rest[pos + close.len()..];
                continue;
            }
            stack.push(name);
        }

        if stack.is_empty() {
            Ok(opened)
        } else {
            Err(format!("unclosed elements: {:?}", stack))
        }
    }

    fn script_body(html: &str) -> &str {
        let start = html.find("<script>").unwrap() + "<script>".len();
        let end = html.find("</script>").unwrap();
        &html[start..end]
    }

    #[test]
    fn test_starts_with_html5_doctype() {
        assert!(INDEX_HTML.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_document_is_well_formed() {
        let opened = check_balanced(INDEX_HTML).unwrap();
        assert_eq!(opened.first().map(String::as_str), Some("html"));
        assert!(opened.iter().any(|t| t == "head"));
        assert!(opened.iter().any(|t| t == "body"));
        assert_eq!(opened.iter().filter(|t| *t == "title").count(), 1);
    }

    #[test]
    fn test_checker_rejects_mismatched_tags() {
        assert!(check_balanced("<html><body></html>").is_err());
        assert!(check_balanced("<html><script>x").is_err());
    }

    #[test]
    fn test_declares_utf8_and_viewport() {
        assert!(INDEX_HTML.contains(r#"<meta charset="utf-8">"#));
        assert!(INDEX_HTML.contains(r#"name="viewport""#));
    }

    #[test]
    fn test_image_starts_at_capture_path() {
        assert!(INDEX_HTML.contains(&format!(r#"<img id="photo" src="{}">"#, CAPTURE_PATH)));
    }

    #[test]
    fn test_script_reloads_once_per_interval() {
        let script = script_body(INDEX_HTML);
        assert_eq!(script.matches("setInterval(").count(), 1);
        assert!(!script.contains("setTimeout"));
        assert!(script.ends_with(&format!(",{});", REFRESH_INTERVAL_MS)));
    }

    #[test]
    fn test_script_appends_timestamp_cache_buster() {
        let script = script_body(INDEX_HTML);
        assert!(script.contains(&format!("'{}?t='+Date.now()", CAPTURE_PATH)));
        assert_eq!(script.matches(".src=").count(), 1);
        assert!(script.contains("getElementById('photo')"));
    }

    #[tokio::test]
    async fn test_index_serves_page_unchanged() {
        use axum::body::to_bytes;

        for _ in 0..3 {
            let response = index().await.into_response();
            assert_eq!(
                response.headers()[header::CONTENT_TYPE],
                "text/html; charset=utf-8"
            );
            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert_eq!(&body[..], INDEX_HTML.as_bytes());
        }
    }
}
