use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

// `1. **Blog Cover** - wide hero image`
static TITLED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+\*\*(.+?)\*\*\s*[-:]?\s*(.*)").unwrap());
// `1. Blog Cover: wide hero image`
static NUMBERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s+(.+)").unwrap());

/// Leading phrases of the summary lines agents put around the asset list.
///
/// This is a heuristic tuned to observed agent output; other phrasings of a
/// closing line end up in the last entry's specifications.
pub const DEFAULT_CLOSING_PREFIXES: &[&str] = &["All assets", "Four custom"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VisualAssetEntry {
    pub name: String,
    pub intended_use: String,
    pub specifications: String,
}

/// Single-pass scanner over a numbered visual asset list.
#[derive(Debug, Clone)]
pub struct VisualAssetScanner {
    closing_prefixes: Vec<String>,
}

impl Default for VisualAssetScanner {
    fn default() -> Self {
        Self {
            closing_prefixes: DEFAULT_CLOSING_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl VisualAssetScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add closing-summary prefixes on top of the defaults.
    pub fn with_closing_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for prefix in prefixes {
            let prefix = prefix.into();
            if !prefix.trim().is_empty() && !self.closing_prefixes.contains(&prefix) {
                self.closing_prefixes.push(prefix);
            }
        }
        self
    }

    pub fn closing_prefixes(&self) -> &[String] {
        &self.closing_prefixes
    }

    pub fn scan(&self, text: &str) -> Vec<VisualAssetEntry> {
        let mut entries = Vec::new();
        let mut current: Option<VisualAssetEntry> = None;

        for line in text.lines() {
            let line = line.trim();

            if let Some(caps) = TITLED_RE.captures(line) {
                entries.extend(current.take());
                current = Some(VisualAssetEntry {
                    name: caps[1].trim().to_string(),
                    intended_use: caps[2].trim().to_string(),
                    specifications: String::new(),
                });
            } else if let Some(caps) = NUMBERED_RE.captures(line) {
                entries.extend(current.take());
                let (name, intended_use) = split_title(&caps[1]);
                current = Some(VisualAssetEntry {
                    name,
                    intended_use,
                    specifications: String::new(),
                });
            } else if let Some(entry) = current.as_mut() {
                if line.is_empty() || self.is_closing_line(line) {
                    continue;
                }
                if !entry.specifications.is_empty() {
                    entry.specifications.push(' ');
                }
                entry.specifications.push_str(line);
            }
        }

        entries.extend(current);
        entries
    }

    fn is_closing_line(&self, line: &str) -> bool {
        self.closing_prefixes.iter().any(|p| line.starts_with(p.as_str()))
    }
}

/// Scan with the stock closing prefixes only.
#[cfg(test)]
pub fn extract_visual_asset_entries(text: &str) -> Vec<VisualAssetEntry> {
    VisualAssetScanner::default().scan(text)
}

/// Split on the first hyphen or colon into (name, intended use).
fn split_title(rest: &str) -> (String, String) {
    match rest.split_once(['-', ':']) {
        Some((name, tail)) => (name.trim().to_string(), tail.trim().to_string()),
        None => (rest.trim().to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "Four custom visuals were generated:\n\n\
1. **Blog Cover Image** - Vibrant workspace, FlowState branding. Wide-format for web headers.\n\n\
2. **Instagram/Facebook Social Graphic** - Young professional at desk, CTA to download.\n\n\
3. **App Features Social Graphic** - App UI overlays, feature highlights.\n\n\
4. **Collaboration CTA Social Graphic** - Remote professionals collaborating, bold CTA.\n\n\
All assets feature a bold palette, modern typography, and clear branding.";

    #[test]
    fn four_titled_entries_and_closing_line() {
        let entries = extract_visual_asset_entries(SAMPLE);
        assert_eq!(entries.len(), 4);
        assert!(entries.iter().all(|e| !e.name.is_empty()));
        assert!(entries.iter().all(|e| !e.specifications.contains("All assets")));
        assert_eq!(entries[0].name, "Blog Cover Image");
        assert_eq!(
            entries[0].intended_use,
            "Vibrant workspace, FlowState branding. Wide-format for web headers."
        );
        assert_eq!(entries[3].name, "Collaboration CTA Social Graphic");
    }

    #[test]
    fn trailing_lines_become_specifications() {
        let text = "1. **Hero Banner**: homepage header\nSize: 1920x600\n  Warm palette  \n\n2. **Story Frame**";
        let entries = extract_visual_asset_entries(text);
        assert_eq!(
            entries,
            vec![
                VisualAssetEntry {
                    name: "Hero Banner".into(),
                    intended_use: "homepage header".into(),
                    specifications: "Size: 1920x600 Warm palette".into(),
                },
                VisualAssetEntry {
                    name: "Story Frame".into(),
                    intended_use: String::new(),
                    specifications: String::new(),
                },
            ]
        );
    }

    #[test]
    fn plain_numbered_lines() {
        let entries = extract_visual_asset_entries(
            "1. Hero Banner: homepage header - wide\n2. Story Frame - vertical 9:16\n3. Logo lockup",
        );
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name, "Hero Banner");
        assert_eq!(entries[0].intended_use, "homepage header - wide");
        assert_eq!(entries[1].name, "Story Frame");
        assert_eq!(entries[1].intended_use, "vertical 9:16");
        assert_eq!(entries[2].name, "Logo lockup");
        assert_eq!(entries[2].intended_use, "");
    }

    #[test]
    fn preamble_is_ignored() {
        let entries = extract_visual_asset_entries("Here are the visuals.\nThey are great.");
        assert!(entries.is_empty());
    }

    #[test]
    fn custom_closing_prefix() {
        let text = "1. **Cover** - hero\nIn summary, everything matches.";
        assert_eq!(extract_visual_asset_entries(text)[0].specifications, "In summary, everything matches.");

        let scanner = VisualAssetScanner::new().with_closing_prefixes(["In summary"]);
        assert_eq!(scanner.scan(text)[0].specifications, "");
        assert_eq!(scanner.closing_prefixes().len(), 3);
    }

    #[test]
    fn blank_prefixes_are_not_added() {
        let scanner = VisualAssetScanner::new().with_closing_prefixes(["", "  ", "All assets"]);
        assert_eq!(scanner.closing_prefixes().len(), DEFAULT_CLOSING_PREFIXES.len());
    }

    #[test]
    fn empty_text() {
        assert!(extract_visual_asset_entries("").is_empty());
    }
}
