//! Plain-text rendering of clauses, summaries, and comparisons.
//!
//! Rendering goes through [`ViewState`]: risk highlights and pending changes
//! are only shown when their toggles are on.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

use clausewise_core::{Clause, Comparison, RiskLevel, RiskSummary, ViewMode, ViewState};

const MAX_PREVIEW: usize = 72;

// ── Public API ──

pub fn summary_card(
    title: Option<&str>,
    summary: &RiskSummary,
    breakdown: &BTreeMap<String, RiskLevel>,
    missing: &BTreeSet<String>,
) -> String {
    let mut out = String::new();
    if let Some(title) = title {
        let _ = writeln!(out, "=== {title} ===");
    }
    let _ = writeln!(out, "  {:<14} {}%", "score", summary.score);
    let _ = writeln!(out, "  {:<14} {}", "clauses", summary.total());
    for level in RiskLevel::ALL.iter().rev() {
        let _ = writeln!(out, "  {:<14} {}", format!("{level} risk"), summary.count(*level));
    }
    if !breakdown.is_empty() {
        let _ = writeln!(out, "\nBy category");
        for (category, level) in breakdown {
            let _ = writeln!(out, "  {category:<26} {level}");
        }
    }
    if !missing.is_empty() {
        let _ = writeln!(out, "\nMissing clauses");
        for category in missing {
            let _ = writeln!(out, "  {category}");
        }
    }
    out
}

/// All clauses, one card each (tree) or one line each (list).
pub fn clause_listing(clauses: &[Clause], view: &ViewState) -> String {
    let mut out = String::new();
    for clause in clauses {
        match view.view_mode() {
            ViewMode::Tree => {
                out.push_str(&clause_card(clause, view));
                out.push('\n');
            }
            ViewMode::List => {
                let _ = writeln!(out, "{}", clause_line(clause, view));
            }
        }
    }
    out
}

pub fn clause_card(clause: &Clause, view: &ViewState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", clause_line(clause, view));
    let _ = writeln!(out, "  {}", clause.content);
    if let Some(category) = &clause.category {
        let _ = writeln!(out, "  {:<10} {}", "category", category);
    }
    if let Some(suggested) = clause.suggested() {
        let _ = writeln!(out, "  {:<10} {}", "suggested", suggested);
        if let Some(reasoning) = clause.reasoning() {
            let _ = writeln!(out, "  {:<10} {}", "reasoning", reasoning);
        }
    }
    if let Some(note) = &clause.ai_note {
        let _ = writeln!(out, "  {:<10} {}", "note", note);
    }
    out
}

pub fn comparison_card(clause: &Clause, comparison: &Comparison) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}. {} vs {}", clause.section, clause.title, comparison.mode);
    let _ = writeln!(out, "  {:<10} {}", "current", clause.content);
    let _ = writeln!(out, "  {:<10} {}", "reference", comparison.comparison_text);
    let _ = writeln!(out, "  {:<10} {}", "deviation", comparison.deviation_score);
    out
}

// ── Helpers ──

/// `4. INTELLECTUAL PROPERTY [high] [modified]`, plus a content preview in list mode.
fn clause_line(clause: &Clause, view: &ViewState) -> String {
    let mut line = format!("{}. {}", clause.section, clause.title);
    if let Some(level) = view.risk_highlight(clause) {
        let _ = write!(line, " [{level}]");
    }
    if let Some(change) = view.visible_change(clause) {
        let _ = write!(line, " [{change}]");
    }
    if view.view_mode() == ViewMode::List {
        let _ = write!(line, "  {}", preview(&clause.content));
    }
    line
}

fn preview(text: &str) -> String {
    if text.chars().count() > MAX_PREVIEW {
        let cut: String = text.chars().take(MAX_PREVIEW - 3).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clausewise_core::{ChangeType, ComparisonMode, Suggestion, aggregate};

    fn clause() -> Clause {
        Clause::new(4, "4", "INTELLECTUAL PROPERTY", "Contractor owns.", RiskLevel::High)
            .with_category("ip")
            .with_change(ChangeType::Modified)
            .with_suggestion(Suggestion::new("Company owns.").with_reasoning("Paid work."))
    }

    #[test]
    fn card_shows_gated_markers() {
        let view = ViewState::default();
        let card = clause_card(&clause(), &view);
        assert!(card.starts_with("4. INTELLECTUAL PROPERTY [high] [modified]"));
        assert!(card.contains("Company owns."));
        assert!(card.contains("Paid work."));
    }

    #[test]
    fn toggles_hide_markers() {
        let mut view = ViewState::default();
        view.set_show_highlights(false);
        view.set_track_changes(false);
        let card = clause_card(&clause(), &view);
        assert!(card.starts_with("4. INTELLECTUAL PROPERTY\n"));
    }

    #[test]
    fn list_mode_one_line_per_clause() {
        let mut view = ViewState::default();
        view.set_view_mode(ViewMode::List);
        let long = Clause::new(5, "5", "CONFIDENTIALITY", "x".repeat(200), RiskLevel::Medium);
        let listing = clause_listing(&[clause(), long], &view);
        assert_eq!(listing.lines().count(), 2);
        assert!(listing.contains("..."));
    }

    #[test]
    fn summary_lists_counts_and_categories() {
        let clauses = vec![clause()];
        let summary = aggregate(&clauses);
        let mut breakdown = BTreeMap::new();
        breakdown.insert("ip".to_string(), RiskLevel::High);
        let missing = BTreeSet::from(["arbitration".to_string()]);
        let card = summary_card(Some("MSA"), &summary, &breakdown, &missing);
        assert!(card.contains("=== MSA ==="));
        assert!(card.contains("score          50%"));
        assert!(card.contains("high risk      1"));
        assert!(card.contains("ip"));
        assert!(card.contains("Missing clauses\n  arbitration\n"));

        let card = summary_card(None, &summary, &breakdown, &BTreeSet::new());
        assert!(!card.contains("Missing clauses"));
    }

    #[test]
    fn comparison_shows_deviation() {
        let cmp = Comparison {
            mode: ComparisonMode::Industry,
            comparison_text: "Jointly owned.".into(),
            deviation_score: 100,
        };
        let card = comparison_card(&clause(), &cmp);
        assert!(card.contains("vs industry"));
        assert!(card.contains("deviation  100"));
    }
}
