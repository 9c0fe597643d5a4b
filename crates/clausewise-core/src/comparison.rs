//! Comparison of a clause against a reference corpus.
//!
//! Resolving is a pure function of `(clause, mode, corpora)`: it looks up the
//! reference text for the clause's category (or its prior version) and measures
//! how far the current content deviates from it.
//!
//! # Deviation score
//!
//! Both texts are reduced to term-frequency vectors over lower-cased word
//! unigrams and adjacent-word bigrams, L2-normalised, and compared by cosine
//! similarity: `deviation = round(100 × (1 − cosine))`. Bigrams make word
//! order count, so a reordered clause deviates even with the same vocabulary.
//!
//! Texts without any word (empty, or punctuation only) have no features; two
//! of them are compared verbatim, ignoring surrounding whitespace.
//!
//! The score is symmetric: swapping current and reference yields the same value.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Clause, ClauseId, ReviewError};

/// Reference corpus a clause is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComparisonMode {
    /// Firm's canonical clause text.
    #[default]
    Template,
    /// The clause's prior version.
    LastVersion,
    /// Industry-standard clause text.
    Industry,
}

impl ComparisonMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Template => "template",
            Self::LastVersion => "lastVersion",
            Self::Industry => "industry",
        }
    }
}

impl fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonMode {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "template" => Ok(Self::Template),
            "lastVersion" | "last-version" | "last_version" => Ok(Self::LastVersion),
            "industry" => Ok(Self::Industry),
            _ => Err(ReviewError::invalid_mode("comparison mode", s)),
        }
    }
}

/// Prior clause text, keyed by clause id.
pub trait VersionHistory {
    fn previous(&self, id: ClauseId) -> Option<&str>;
}

/// No version history tracked: the last version is the current content.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl VersionHistory for NoHistory {
    fn previous(&self, _id: ClauseId) -> Option<&str> {
        None
    }
}

/// Reference texts supplied by an external repository, keyed by clause category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Corpora {
    pub templates: HashMap<String, String>,
    pub industry_standards: HashMap<String, String>,
    /// Snapshot of each clause's previous version, when the caller tracks one.
    pub previous_versions: HashMap<ClauseId, String>,
}

impl Corpora {
    pub fn template(&self, category: &str) -> Option<&str> {
        self.templates.get(category).map(String::as_str)
    }

    pub fn industry_standard(&self, category: &str) -> Option<&str> {
        self.industry_standards.get(category).map(String::as_str)
    }

    /// Resolve against this corpus, using its own `previous_versions` as history.
    pub fn resolve(&self, clause: &Clause, mode: ComparisonMode) -> Result<Comparison, ReviewError> {
        resolve_with_history(clause, mode, self, self)
    }
}

impl VersionHistory for Corpora {
    fn previous(&self, id: ClauseId) -> Option<&str> {
        self.previous_versions.get(&id).map(String::as_str)
    }
}

/// Resolved reference text and its distance from the clause's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub mode: ComparisonMode,
    pub comparison_text: String,
    pub deviation_score: u8,
}

/// Resolve `clause` against `corpora` in `mode`.
///
/// `history` supplies prior versions for [`ComparisonMode::LastVersion`]; when it
/// has none for this clause the current content is used and the deviation is 0.
pub fn resolve_with_history(
    clause: &Clause,
    mode: ComparisonMode,
    corpora: &Corpora,
    history: &dyn VersionHistory,
) -> Result<Comparison, ReviewError> {
    let category = clause.category.as_deref();
    let comparison_text = match mode {
        ComparisonMode::Template => category.and_then(|c| corpora.template(c)).ok_or_else(|| {
            ReviewError::TemplateNotFound {
                clause: clause.id,
                category: clause.category.clone(),
            }
        })?,
        ComparisonMode::Industry => category
            .and_then(|c| corpora.industry_standard(c))
            .ok_or_else(|| ReviewError::IndustryStandardNotFound {
                clause: clause.id,
                category: clause.category.clone(),
            })?,
        ComparisonMode::LastVersion => history.previous(clause.id).unwrap_or(clause.content.as_str()),
    };

    Ok(Comparison {
        mode,
        deviation_score: deviation_score(&clause.content, comparison_text),
        comparison_text: comparison_text.to_string(),
    })
}

/// Resolve without any version history.
pub fn resolve(clause: &Clause, mode: ComparisonMode, corpora: &Corpora) -> Result<Comparison, ReviewError> {
    resolve_with_history(clause, mode, corpora, &NoHistory)
}

/// 0 for identical texts, 100 for texts that share no word. Symmetric.
///
/// Word-less texts deviate fully unless they are the same string.
pub fn deviation_score(current: &str, reference: &str) -> u8 {
    let a = features(current);
    let b = features(reference);

    match (a.is_empty(), b.is_empty()) {
        (true, true) => return if current.trim() == reference.trim() { 0 } else { 100 },
        (true, false) | (false, true) => return 100,
        (false, false) => {}
    }

    let similarity = cosine_sim(&a, &b).clamp(0.0, 1.0);
    ((1.0 - similarity) * 100.0).round() as u8
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Unigram and bigram term frequencies.
fn features(text: &str) -> HashMap<String, f64> {
    let words = tokenize(text);
    let mut tf: HashMap<String, f64> = HashMap::new();
    for word in &words {
        *tf.entry(word.clone()).or_insert(0.0) += 1.0;
    }
    for pair in words.windows(2) {
        *tf.entry(format!("{} {}", pair[0], pair[1])).or_insert(0.0) += 1.0;
    }
    tf
}

fn cosine_sim(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    // Iterate the smaller map; the dot product is the same either way.
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(k, x)| large.get(k).map(|y| x * y))
        .sum();
    let norm = |v: &HashMap<String, f64>| v.values().map(|x| x * x).sum::<f64>().sqrt();
    let denom = norm(a) * norm(b);
    if denom > 0.0 { dot / denom } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RiskLevel;

    const FIRM: &str = "All work product, including but not limited to source code, documentation, \
                        and derivative works, shall be the exclusive property of Company.";
    const INDUSTRY: &str = "All work product shall be jointly owned by both parties with Company \
                            retaining first right of use for business purposes.";
    const CURRENT: &str = "All work product, including but not limited to source code, documentation, \
                           and derivative works, shall remain the exclusive property of Contractor \
                           unless explicitly transferred in writing.";

    fn corpora() -> Corpora {
        let mut c = Corpora::default();
        c.templates.insert("ip".into(), FIRM.into());
        c.industry_standards.insert("ip".into(), INDUSTRY.into());
        c
    }

    fn ip_clause() -> Clause {
        Clause::new(4, "4", "INTELLECTUAL PROPERTY", CURRENT, RiskLevel::High).with_category("ip")
    }

    #[test]
    fn template_mode_returns_firm_text() {
        let cmp = resolve(&ip_clause(), ComparisonMode::Template, &corpora()).unwrap();
        assert_eq!(cmp.comparison_text, FIRM);
        assert_eq!(cmp.mode, ComparisonMode::Template);
        assert!(cmp.deviation_score > 0 && cmp.deviation_score < 100);
    }

    #[test]
    fn industry_mode_returns_standard_text() {
        let cmp = resolve(&ip_clause(), ComparisonMode::Industry, &corpora()).unwrap();
        assert_eq!(cmp.comparison_text, INDUSTRY);
    }

    #[test]
    fn closer_reference_deviates_less() {
        let firm = resolve(&ip_clause(), ComparisonMode::Template, &corpora()).unwrap();
        let industry = resolve(&ip_clause(), ComparisonMode::Industry, &corpora()).unwrap();
        assert!(firm.deviation_score < industry.deviation_score);
    }

    #[test]
    fn missing_template_fails() {
        let clause = ip_clause().with_category("indemnity");
        assert_eq!(
            resolve(&clause, ComparisonMode::Template, &corpora()),
            Err(ReviewError::TemplateNotFound {
                clause: 4,
                category: Some("indemnity".into()),
            })
        );
    }

    #[test]
    fn missing_category_fails_both_corpora() {
        let mut clause = ip_clause();
        clause.category = None;
        assert!(matches!(
            resolve(&clause, ComparisonMode::Template, &corpora()),
            Err(ReviewError::TemplateNotFound { category: None, .. })
        ));
        assert!(matches!(
            resolve(&clause, ComparisonMode::Industry, &corpora()),
            Err(ReviewError::IndustryStandardNotFound { category: None, .. })
        ));
    }

    #[test]
    fn last_version_without_history_is_current_content() {
        let cmp = resolve(&ip_clause(), ComparisonMode::LastVersion, &corpora()).unwrap();
        assert_eq!(cmp.comparison_text, CURRENT);
        assert_eq!(cmp.deviation_score, 0);
    }

    #[test]
    fn last_version_uses_history() {
        let mut c = corpora();
        c.previous_versions.insert(4, "Contractor owns all work product.".into());
        let cmp = c.resolve(&ip_clause(), ComparisonMode::LastVersion).unwrap();
        assert_eq!(cmp.comparison_text, "Contractor owns all work product.");
        assert!(cmp.deviation_score > 0);
    }

    #[test]
    fn last_version_needs_no_category() {
        let mut clause = ip_clause();
        clause.category = None;
        assert!(resolve(&clause, ComparisonMode::LastVersion, &Corpora::default()).is_ok());
    }

    #[test]
    fn identical_texts_score_zero() {
        assert_eq!(deviation_score(FIRM, FIRM), 0);
        assert_eq!(deviation_score("", ""), 0);
    }

    #[test]
    fn identical_content_resolves_to_zero() {
        let clause = ip_clause();
        let mut c = corpora();
        c.templates.insert("ip".into(), CURRENT.into());
        assert_eq!(resolve(&clause, ComparisonMode::Template, &c).unwrap().deviation_score, 0);
    }

    #[test]
    fn disjoint_texts_score_100() {
        assert_eq!(deviation_score("alpha beta gamma", "delta epsilon"), 100);
        assert_eq!(deviation_score("something", ""), 100);
    }

    #[test]
    fn wordless_texts_compare_verbatim() {
        assert_eq!(deviation_score("§§§", "---"), 100);
        assert_eq!(deviation_score("...", ""), 100);
        assert_eq!(deviation_score("", "..."), 100);
        assert_eq!(deviation_score("---", " --- "), 0);
    }

    #[test]
    fn case_and_punctuation_ignored() {
        assert_eq!(deviation_score("Net 30 days.", "net 30 DAYS"), 0);
    }

    #[test]
    fn word_order_counts() {
        let score = deviation_score("company owns the work", "the work owns company");
        assert!(score > 0 && score < 100, "got {score}");
    }

    #[test]
    fn deviation_is_symmetric() {
        assert_eq!(deviation_score(CURRENT, FIRM), deviation_score(FIRM, CURRENT));
        assert_eq!(deviation_score(CURRENT, INDUSTRY), deviation_score(INDUSTRY, CURRENT));
        assert_eq!(deviation_score("a", ""), deviation_score("", "a"));
    }

    #[test]
    fn parse_modes() {
        assert_eq!("lastVersion".parse::<ComparisonMode>().unwrap(), ComparisonMode::LastVersion);
        assert_eq!("last-version".parse::<ComparisonMode>().unwrap(), ComparisonMode::LastVersion);
        assert!(matches!(
            "firm".parse::<ComparisonMode>(),
            Err(ReviewError::InvalidMode { kind: "comparison mode", .. })
        ));
    }

    #[test]
    fn corpora_json_shape() {
        let json = r#"{
            "templates": {"ip": "firm"},
            "industryStandards": {"ip": "industry"},
            "previousVersions": {"4": "old"}
        }"#;
        let c: Corpora = serde_json::from_str(json).unwrap();
        assert_eq!(c.template("ip"), Some("firm"));
        assert_eq!(c.industry_standard("ip"), Some("industry"));
        assert_eq!(c.previous(4), Some("old"));
    }
}
