//! Content snippets inserted by the editor dialogs
//!
//! Document contents are HTML-bearing. The editor offers two helpers that build a
//! snippet from dialog input: a hyperlink and a copyable folder/file path.

use super::ValidationError;

/// Build an anchor that opens `url` in a new tab.
///
/// Both inputs are trimmed. A URL that does not start with `http` (any case) gets an
/// `https://` prefix.
///
/// # Errors
///
/// Returns `ValidationError::EmptyLink` when either input is blank.
pub fn hyperlink(text: &str, url: &str) -> Result<String, ValidationError> {
    let text = text.trim();
    let url = url.trim();
    if text.is_empty() || url.is_empty() {
        return Err(ValidationError::EmptyLink);
    }

    let url = if url.to_lowercase().starts_with("http") {
        url.to_string()
    } else {
        format!("https://{url}")
    };

    Ok(format!(
        r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
        escape_html(&url),
        escape_html(text)
    ))
}

/// Build a path container with a copy button carrying the path.
///
/// # Errors
///
/// Returns `ValidationError::EmptyPath` when the trimmed path is blank.
pub fn file_path(path: &str) -> Result<String, ValidationError> {
    let path = path.trim();
    if path.is_empty() {
        return Err(ValidationError::EmptyPath);
    }

    let escaped = escape_html(path);
    Ok(format!(
        r#"<div class="file-path-container"><span class="path-text">{escaped}</span><button type="button" class="copy-path-btn" data-path="{escaped}">Copy</button></div>"#
    ))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyperlink_adds_scheme() {
        let html = hyperlink("Portal", "intranet.example.com").unwrap();
        assert!(html.contains(r#"href="https://intranet.example.com""#));
        assert!(html.contains(">Portal</a>"));
    }

    #[test]
    fn test_hyperlink_keeps_existing_scheme_case_insensitive() {
        let html = hyperlink("Docs", "HTTP://example.com").unwrap();
        assert!(html.contains(r#"href="HTTP://example.com""#));
    }

    #[test]
    fn test_hyperlink_requires_both_fields() {
        assert_eq!(hyperlink(" ", "x.com"), Err(ValidationError::EmptyLink));
        assert_eq!(hyperlink("text", ""), Err(ValidationError::EmptyLink));
    }

    #[test]
    fn test_file_path_escapes_and_validates() {
        let html = file_path(r#"\\share\"team""#).unwrap();
        assert!(html.contains("&quot;team&quot;"));
        assert_eq!(file_path("   "), Err(ValidationError::EmptyPath));
    }
}
