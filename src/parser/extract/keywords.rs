use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static PRIMARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\*\*Primary Keywords?:?\*\*\s*([^\n*]+)").unwrap());
static SECONDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\*\*Secondary Keywords?:?\*\*\s*([^\n*]+)").unwrap());
static LONG_TAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\*\*Long[- ]?tail Keywords?:?\*\*\s*([^\n*]+)").unwrap());

/// Keyword tiers as written in the SEO field, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeywordSet {
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
    pub long_tail: Vec<String>,
}

impl KeywordSet {
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty() && self.long_tail.is_empty()
    }
}

pub fn extract_keyword_tiers(text: &str) -> KeywordSet {
    KeywordSet {
        primary: tier(&PRIMARY_RE, text),
        secondary: tier(&SECONDARY_RE, text),
        long_tail: tier(&LONG_TAIL_RE, text),
    }
}

fn tier(re: &Regex, text: &str) -> Vec<String> {
    re.captures(text)
        .map(|caps| split_keywords(&caps[1]))
        .unwrap_or_default()
}

fn split_keywords(span: &str) -> Vec<String> {
    span.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn primary_only() {
        let set = extract_keyword_tiers("**Primary Keywords:** a, b, c");
        assert_eq!(set.primary, vec!["a", "b", "c"]);
        assert!(set.secondary.is_empty());
        assert!(set.long_tail.is_empty());
    }

    #[test]
    fn all_tiers() {
        let text = "**Primary Keywords:** productivity app, FlowState\n\n\
                    **Secondary Keywords:** focus apps, time tracking apps\n\n\
                    **Long-tail Keywords:** best productivity app for remote workers";
        let set = extract_keyword_tiers(text);
        assert_eq!(set.primary, vec!["productivity app", "FlowState"]);
        assert_eq!(set.secondary, vec!["focus apps", "time tracking apps"]);
        assert_eq!(set.long_tail, vec!["best productivity app for remote workers"]);
    }

    #[test]
    fn label_variants() {
        let set = extract_keyword_tiers(
            "**primary keyword** solo\n**Long tail Keywords:** x\n**SECONDARY KEYWORDS** y",
        );
        assert_eq!(set.primary, vec!["solo"]);
        assert_eq!(set.long_tail, vec!["x"]);
        assert_eq!(set.secondary, vec!["y"]);

        let set = extract_keyword_tiers("**Longtail Keywords:** joined");
        assert_eq!(set.long_tail, vec!["joined"]);
    }

    #[test]
    fn capture_stops_at_emphasis_and_line_break() {
        let set = extract_keyword_tiers("**Primary Keywords:** a, b **Note:** c\nd, e");
        assert_eq!(set.primary, vec!["a", "b"]);
    }

    #[test]
    fn empty_pieces_dropped_and_duplicates_kept() {
        let set = extract_keyword_tiers("**Primary Keywords:** a,, b , ,a");
        assert_eq!(set.primary, vec!["a", "b", "a"]);
    }

    #[test]
    fn no_anchors() {
        let set = extract_keyword_tiers("Keywords: a, b, c");
        assert!(set.is_empty());
        assert!(extract_keyword_tiers("").is_empty());
    }
}
