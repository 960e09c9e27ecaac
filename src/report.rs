use crate::history::CampaignHistoryEntry;
use crate::parser::extract::{KeywordSet, SeoInsights, VisualAssetEntry};
use crate::parser::markdown;
use crate::parser::ProcessedCampaign;

const RULE_WIDTH: usize = 72;

/// Full terminal report for one campaign. Empty sections are left out.
pub fn campaign_report(campaign: &ProcessedCampaign) -> String {
    let record = &campaign.record;
    let mut sections = Vec::new();

    push_section(&mut sections, "Campaign Summary", record.summary.trim().to_string());
    push_section(&mut sections, "Campaign Overview", render_md(&record.campaign_overview));
    push_section(&mut sections, "Written Content", render_md(&record.written_content));
    push_section(
        &mut sections,
        "SEO Recommendations",
        seo_block(&campaign.insights.seo, &record.seo_recommendations),
    );

    let visuals = if campaign.insights.visual_assets.is_empty() {
        render_md(&record.visual_assets)
    } else {
        visual_cards(&campaign.insights.visual_assets)
    };
    push_section(&mut sections, "Visual Assets", visuals);
    push_section(&mut sections, "Consistency Notes", render_md(&record.consistency_notes));
    push_section(&mut sections, "Revision Notes", render_md(&record.revision_flags));

    sections.join("\n\n")
}

fn push_section(sections: &mut Vec<String>, title: &str, body: String) {
    if body.trim().is_empty() {
        return;
    }
    sections.push(format!("{}\n{}\n{}", title.to_uppercase(), "─".repeat(RULE_WIDTH), body));
}

fn render_md(text: &str) -> String {
    markdown::to_plain_text(&markdown::render(text))
}

/// Structured SEO panels followed by the full text. Without any structure the
/// full text stands alone.
fn seo_block(seo: &SeoInsights, full_text: &str) -> String {
    if seo.is_empty() {
        return render_md(full_text);
    }

    let mut parts = Vec::new();

    if !seo.keywords.is_empty() {
        parts.push(keyword_lines(&seo.keywords));
    }
    if !seo.meta_descriptions.is_empty() {
        parts.push(numbered("Meta Descriptions", &seo.meta_descriptions));
    }
    if !seo.checklist.is_empty() {
        let items: Vec<String> = seo.checklist.iter().map(|c| format!("  [ ] {}", c)).collect();
        parts.push(format!("Optimization Checklist\n{}", items.join("\n")));
    }

    let full = render_md(full_text);
    if !full.is_empty() {
        parts.push(format!("Full SEO Recommendations\n\n{}", full));
    }
    parts.join("\n\n")
}

fn keyword_lines(keywords: &KeywordSet) -> String {
    [
        ("Primary", &keywords.primary),
        ("Secondary", &keywords.secondary),
        ("Long-tail", &keywords.long_tail),
    ]
    .iter()
    .filter(|(_, tier)| !tier.is_empty())
    .map(|(label, tier)| format!("{:<10} {}", format!("{}:", label), tier.join(" · ")))
    .collect::<Vec<_>>()
    .join("\n")
}

fn numbered(title: &str, items: &[String]) -> String {
    let lines: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("  {}. {}", i + 1, item))
        .collect();
    format!("{}\n{}", title, lines.join("\n"))
}

fn visual_cards(assets: &[VisualAssetEntry]) -> String {
    assets
        .iter()
        .enumerate()
        .map(|(i, asset)| {
            let mut card = format!("#{} {}", i + 1, asset.name);
            if !asset.intended_use.is_empty() {
                card.push_str(&format!("\n   Use:   {}", asset.intended_use));
            }
            if !asset.specifications.is_empty() {
                card.push_str(&format!("\n   Specs: {}", asset.specifications));
            }
            card
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Compact history table, newest first.
pub fn history_table(entries: &[CampaignHistoryEntry]) -> String {
    let mut out = vec![
        format!(
            "{:>3} | {:<12} | {:<10} | {:<12} | {:<32} | {:<20}",
            "#", "Id", "Date", "Tone", "Topic", "Audience"
        ),
        "-".repeat(102),
    ];
    for (i, e) in entries.iter().enumerate() {
        out.push(format!(
            "{:>3} | {:<12} | {:<10} | {:<12} | {:<32} | {:<20}",
            i + 1,
            e.id,
            e.timestamp,
            truncate(&e.tone, 12),
            truncate(&e.topic, 32),
            truncate(&e.audience, 20),
        ));
    }
    out.join("\n")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::extract::VisualAssetScanner;
    use crate::record::CampaignRecord;

    fn processed(record: CampaignRecord) -> ProcessedCampaign {
        ProcessedCampaign::from_record(record, &VisualAssetScanner::default())
    }

    #[test]
    fn sample_report_has_every_section() {
        let report = campaign_report(&processed(crate::sample::sample_result()));
        for title in [
            "CAMPAIGN SUMMARY",
            "CAMPAIGN OVERVIEW",
            "WRITTEN CONTENT",
            "SEO RECOMMENDATIONS",
            "VISUAL ASSETS",
            "CONSISTENCY NOTES",
            "REVISION NOTES",
        ] {
            assert!(report.contains(title), "missing {}", title);
        }
        assert!(report.contains("Primary:   productivity app · remote work productivity"));
        assert!(report.contains("#4 Collaboration CTA Social Graphic"));
        assert!(report.contains("  [ ] Encourage user reviews and testimonials for social proof"));
    }

    #[test]
    fn empty_sections_are_omitted() {
        let report = campaign_report(&processed(CampaignRecord {
            written_content: "# Hello\nWorld".into(),
            ..Default::default()
        }));
        assert_eq!(report.matches('─').count(), RULE_WIDTH);
        assert!(report.starts_with("WRITTEN CONTENT"));
        assert!(!report.contains("SEO"));
    }

    #[test]
    fn unstructured_visuals_fall_back_to_markdown() {
        let report = campaign_report(&processed(CampaignRecord {
            visual_assets: "A single hero image with **bold** colors.".into(),
            ..Default::default()
        }));
        assert!(report.contains("A single hero image with **bold** colors."));
        assert!(!report.contains("#1"));
    }

    #[test]
    fn seo_without_anchors_shows_full_text_only() {
        let report = campaign_report(&processed(CampaignRecord {
            seo_recommendations: "Use shorter titles.".into(),
            ..Default::default()
        }));
        assert!(report.contains("SEO RECOMMENDATIONS"));
        assert!(report.contains("Use shorter titles."));
        assert!(!report.contains("Full SEO Recommendations"));
        assert!(!report.contains("Optimization Checklist"));
    }

    #[test]
    fn structured_seo_keeps_full_text_heading() {
        let text = "**Optimization Checklist:**\n- Add alt text\n- Compress hero images";
        let seo = SeoInsights::from_text(text);
        assert!(!seo.is_empty());
        let block = seo_block(&seo, text);
        assert!(block.starts_with("Optimization Checklist"));
        assert!(block.contains("Full SEO Recommendations"));
    }

    #[test]
    fn history_rows() {
        let entry = CampaignHistoryEntry {
            id: "abc123def456".into(),
            topic: "A very long campaign topic that will not fit in the column".into(),
            tone: "bold".into(),
            audience: String::new(),
            timestamp: "6/1/2026".into(),
            result: CampaignRecord::default(),
        };
        let table = history_table(&[entry]);
        let row = table.lines().nth(2).unwrap();
        assert!(row.contains("abc123def456"));
        assert!(row.contains("A very long campaign topic th..."));
    }

    #[test]
    fn truncate_respects_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("élan vital forever", 8), "élan ...");
    }
}
