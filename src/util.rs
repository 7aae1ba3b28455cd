/// Character-wise HTML escape, so emitted entities are never re-escaped.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn short_path(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_html_special_characters() {
        assert_eq!(escape_html("<script>&\"'"), "&lt;script&gt;&amp;&quot;&#039;");
    }

    #[test]
    fn does_not_double_escape_ampersands() {
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }

    #[test]
    fn leaves_plain_text_untouched() {
        assert_eq!(escape_html("fn main() {}"), "fn main() {}");
    }

    #[test]
    fn short_path_takes_last_component() {
        assert_eq!(short_path("src/app/mod.rs"), "mod.rs");
        assert_eq!(short_path("main.rs"), "main.rs");
    }
}
