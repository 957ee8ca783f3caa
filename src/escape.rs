use once_cell::sync::Lazy;
use regex::Regex;

/// Fallback used when a title sanitizes down to nothing.
pub const DEFAULT_FILENAME: &str = "report";

static RESERVED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1f\x7f]+"#).expect("valid reserved-char pattern"));

/// Escapes the five markup-significant characters. `None` renders as an empty string.
pub fn escape_markup(value: Option<&str>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
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

/// Replaces path separators and filesystem-reserved characters with `_`.
pub fn sanitize_filename(name: Option<&str>) -> String {
    let raw = name.unwrap_or_default();
    let replaced = RESERVED_RE.replace_all(raw, "_");
    let trimmed = replaced.trim();
    if trimmed.is_empty() {
        return DEFAULT_FILENAME.to_string();
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_markup_characters() {
        let escaped = escape_markup(Some("<a>&'\""));
        assert_eq!(escaped, "&lt;a&gt;&amp;&#39;&quot;");
        for raw in ['<', '>', '"', '\''] {
            assert!(!escaped.contains(raw));
        }
        assert!(!escaped.replace("&amp;", "").replace("&lt;", "").replace("&gt;", "").replace("&#39;", "").replace("&quot;", "").contains('&'));
    }

    #[test]
    fn escape_of_missing_value_is_empty() {
        assert_eq!(escape_markup(None), "");
    }

    #[test]
    fn escape_leaves_other_text_alone() {
        assert_eq!(escape_markup(Some("第1章 – café")), "第1章 – café");
    }

    #[test]
    fn sanitizes_reserved_characters() {
        assert_eq!(sanitize_filename(Some("a:b?c.txt")), "a_b_c.txt");
        assert_eq!(sanitize_filename(Some("dir/sub\\name")), "dir_sub_name");
        assert_eq!(sanitize_filename(Some("  spaced  ")), "spaced");
    }

    #[test]
    fn sanitize_falls_back_to_default() {
        assert_eq!(sanitize_filename(None), DEFAULT_FILENAME);
        assert_eq!(sanitize_filename(Some("   ")), DEFAULT_FILENAME);
    }
}
