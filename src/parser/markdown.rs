use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Inline {
    Text(String),
    Bold(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, spans: Vec<Inline> },
    List(Vec<Vec<Inline>>),
    Paragraph(Vec<Inline>),
}

/// Line-oriented render of the markdown subset agents write: `#`/`##`/`###`
/// headings, `-`/`*` bullet lists, `**bold**` spans and paragraphs.
///
/// Consecutive list lines collect into one [`Block::List`]; any other line,
/// a blank line, or end of input closes the pending list. Never fails.
pub fn render(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut pending: Vec<Vec<Inline>> = Vec::new();

    for line in text.lines() {
        let line = line.trim();

        // ── Headings, most specific marker first ──
        if let Some((level, rest)) = heading(line) {
            flush_list(&mut pending, &mut blocks);
            blocks.push(Block::Heading {
                level,
                spans: render_inline(rest),
            });
            continue;
        }

        // ── List item: queued until the list ends ──
        if let Some(item) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
            pending.push(render_inline(item));
            continue;
        }

        flush_list(&mut pending, &mut blocks);
        if !line.is_empty() {
            blocks.push(Block::Paragraph(render_inline(line)));
        }
    }

    flush_list(&mut pending, &mut blocks);
    blocks
}

fn heading(line: &str) -> Option<(u8, &str)> {
    [("### ", 3), ("## ", 2), ("# ", 1)]
        .into_iter()
        .find_map(|(marker, level)| line.strip_prefix(marker).map(|rest| (level, rest)))
}

fn flush_list(pending: &mut Vec<Vec<Inline>>, blocks: &mut Vec<Block>) {
    if !pending.is_empty() {
        blocks.push(Block::List(std::mem::take(pending)));
    }
}

/// Split a span into text and `**bold**` runs, left to right, non-nested.
pub fn render_inline(text: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut rest = text;

    while let Some(caps) = BOLD_RE.captures(rest) {
        let whole = caps.get(0).unwrap();
        if whole.start() > 0 {
            spans.push(Inline::Text(rest[..whole.start()].to_string()));
        }
        spans.push(Inline::Bold(caps[1].to_string()));
        rest = &rest[whole.end()..];
    }
    if !rest.is_empty() {
        spans.push(Inline::Text(rest.to_string()));
    }
    spans
}

/// Terminal rendering: headings underlined, list items bulleted, bold kept as `**`.
pub fn to_plain_text(blocks: &[Block]) -> String {
    let mut out: Vec<String> = Vec::with_capacity(blocks.len());
    for block in blocks {
        match block {
            Block::Heading { level, spans } => {
                let text = spans_text(spans);
                let rule = if *level == 1 { '=' } else { '-' };
                let underline = rule.to_string().repeat(text.chars().count());
                out.push(format!("{}\n{}", text, underline));
            }
            Block::List(items) => {
                let lines: Vec<String> = items
                    .iter()
                    .map(|item| format!("  • {}", spans_text(item)))
                    .collect();
                out.push(lines.join("\n"));
            }
            Block::Paragraph(spans) => out.push(spans_text(spans)),
        }
    }
    out.join("\n\n")
}

fn spans_text(spans: &[Inline]) -> String {
    spans
        .iter()
        .map(|span| match span {
            Inline::Text(t) => t.clone(),
            Inline::Bold(b) => format!("**{}**", b),
        })
        .collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    fn bold(s: &str) -> Inline {
        Inline::Bold(s.to_string())
    }

    #[test]
    fn heading_list_paragraph() {
        assert_eq!(
            render("## Title\n- one\n- two\n\nPara."),
            vec![
                Block::Heading {
                    level: 2,
                    spans: vec![text("Title")]
                },
                Block::List(vec![vec![text("one")], vec![text("two")]]),
                Block::Paragraph(vec![text("Para.")]),
            ]
        );
    }

    #[test]
    fn heading_levels() {
        let blocks = render("# One\n## Two\n### Three\n#### Four\n#NoSpace");
        let levels: Vec<_> = blocks
            .iter()
            .filter_map(|b| match b {
                Block::Heading { level, .. } => Some(*level),
                _ => None,
            })
            .collect();
        assert_eq!(levels, vec![1, 2, 3]);
        assert_eq!(blocks[3], Block::Paragraph(vec![text("#### Four")]));
        assert_eq!(blocks[4], Block::Paragraph(vec![text("#NoSpace")]));
    }

    #[test]
    fn list_closed_by_paragraph_and_heading() {
        let blocks = render("- a\n* b\nplain\n- c\n# H");
        assert_eq!(
            blocks,
            vec![
                Block::List(vec![vec![text("a")], vec![text("b")]]),
                Block::Paragraph(vec![text("plain")]),
                Block::List(vec![vec![text("c")]]),
                Block::Heading {
                    level: 1,
                    spans: vec![text("H")]
                },
            ]
        );
    }

    #[test]
    fn indented_lines_are_trimmed() {
        let blocks = render("   - nested item\n\t## Indented");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], Block::List(vec![vec![text("nested item")]]));
    }

    #[test]
    fn blank_lines_emit_nothing() {
        assert!(render("").is_empty());
        assert!(render("\n\n   \n").is_empty());
    }

    #[test]
    fn bold_spans_left_to_right() {
        assert_eq!(
            render_inline("a **b** c **d**"),
            vec![text("a "), bold("b"), text(" c "), bold("d")]
        );
        assert_eq!(render_inline("**only**"), vec![bold("only")]);
        assert_eq!(render_inline("no bold"), vec![text("no bold")]);
        assert!(render_inline("").is_empty());
    }

    #[test]
    fn unmatched_markers_pass_through() {
        assert_eq!(render_inline("**open only"), vec![text("**open only")]);
        assert_eq!(render_inline("****"), vec![text("****")]);
    }

    #[test]
    fn bold_inside_list_and_heading() {
        let blocks = render("### **Key** point\n- **Primary:** focus");
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 3,
                    spans: vec![bold("Key"), text(" point")]
                },
                Block::List(vec![vec![bold("Primary:"), text(" focus")]]),
            ]
        );
    }

    #[test]
    fn plain_text_output() {
        let blocks = render("# Launch\n- one\n- **two**\n\nDone.");
        assert_eq!(to_plain_text(&blocks), "Launch\n======\n\n  • one\n  • **two**\n\nDone.");
    }

    #[test]
    fn sample_written_content_renders() {
        let record = crate::sample::sample_result();
        let blocks = render(&record.written_content);
        assert!(matches!(blocks.first(), Some(Block::Heading { level: 1, .. })));
        assert!(blocks.iter().any(|b| matches!(b, Block::List(_))));
    }
}
