use std::sync::LazyLock;

use regex::Regex;

// Block runs until the next blank-line-prefixed bold label, or end of text.
static CHECKLIST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\*\*Optimization Checklist:?\*\*\s*(.*?)(?:\n\n\*\*|\n\n$|$)").unwrap()
});
static META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\*\*Meta Descriptions?:?\*\*\s*(.*?)(?:\n\n\*\*|\n\n$|$)").unwrap()
});
static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*]\s*").unwrap());

pub fn extract_checklist(text: &str) -> Vec<String> {
    labeled_block_items(&CHECKLIST_RE, text)
}

pub fn extract_meta_descriptions(text: &str) -> Vec<String> {
    labeled_block_items(&META_RE, text)
}

fn labeled_block_items(re: &Regex, text: &str) -> Vec<String> {
    let Some(caps) = re.captures(text) else {
        return Vec::new();
    };
    caps[1]
        .split('\n')
        .map(|line| BULLET_RE.replace(line, "").trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
