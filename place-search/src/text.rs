//! Markup stripping for provider text fields.
//!
//! Provider APIs highlight matched terms with inline tags (`<b>국밥</b>`) and
//! escape a handful of characters as HTML entities. Every text field is
//! passed through [`clean_markup`] before it lands in a record.

/// Entities decoded after tag removal. `&amp;` goes last so that
/// `&amp;quot;` decodes to the literal text `&quot;`.
const ENTITIES: &[(&str, &str)] = &[
    ("&quot;", "\""),
    ("&#34;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&nbsp;", " "),
    ("&amp;", "&"),
];

/// Delete every `<...>` span, decode common entities and trim.
///
/// A `<` with no closing `>` after it is kept as literal text.
pub fn clean_markup(raw: &str) -> String {
    let mut stripped = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        stripped.push_str(&rest[..open]);
        rest = &rest[open + close + 1..];
    }
    stripped.push_str(rest);

    let mut text = stripped;
    for (entity, replacement) in ENTITIES {
        if text.contains(entity) {
            text = text.replace(entity, replacement);
        }
    }
    text.trim().to_string()
}

/// Extract the first integer in `raw`, ignoring thousands separators.
///
/// `"리뷰 1,234"` yields `Some(1234)`; text without digits yields `None`.
pub fn parse_count(raw: &str) -> Option<u32> {
    let digits: String = raw
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit() || *c == ',')
        .filter(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Extract the first decimal number in `raw`, e.g. `"별점 4.52"` yields `4.52`.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let number: String = raw
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    number.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_highlight_tags() {
        assert_eq!(clean_markup("유성<b>맛집</b> 국밥"), "유성맛집 국밥");
    }

    #[test]
    fn decodes_quote_and_amp() {
        assert_eq!(clean_markup("&quot;Tom &amp; Jerry&quot;"), "\"Tom & Jerry\"");
    }

    #[test]
    fn double_escaped_entity_decodes_once() {
        assert_eq!(clean_markup("&amp;quot;"), "&quot;");
    }

    #[test]
    fn strips_tags_with_attributes() {
        assert_eq!(clean_markup(r#"<span class="hl">칼국수</span>"#), "칼국수");
    }

    #[test]
    fn plain_text_unchanged_apart_from_trim() {
        assert_eq!(clean_markup("  대전 유성구  "), "대전 유성구");
    }

    #[test]
    fn unterminated_tag_left_in_place() {
        assert_eq!(clean_markup("a < b"), "a < b");
    }

    #[test]
    fn parse_count_handles_separators() {
        assert_eq!(parse_count("리뷰 1,234"), Some(1234));
        assert_eq!(parse_count("(87)"), Some(87));
        assert_eq!(parse_count("리뷰 없음"), None);
    }

    #[test]
    fn parse_decimal_reads_first_number() {
        assert_eq!(parse_decimal("별점 4.52"), Some(4.52));
        assert_eq!(parse_decimal("4"), Some(4.0));
        assert_eq!(parse_decimal("-"), None);
    }
}
