// File: src/professions/rules.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Punctuation replaced by spaces before whole-word keyword search.
const FOLDED_PUNCTUATION: [char; 8] = ['"', ',', '(', ')', '\\', '-', '/', '.'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Every word of a phrase must occur somewhere in the name, as a substring.
    And,
    /// The keyword must occur in the punctuation-folded name as a whole word.
    Keyword,
}

/// One step of the cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionRule {
    pub kind: RuleKind,
    pub label: String,
    /// Phrases for `And`, keywords for `Keyword`. Empty means `[label]`.
    #[serde(default)]
    pub phrases: Vec<String>,
    /// Only fire while the posting has no rule-assigned label yet.
    #[serde(default)]
    pub only_if_empty: bool,
}

impl ProfessionRule {
    pub fn and(label: &str, phrases: &[&str], only_if_empty: bool) -> Self {
        Self::with_kind(RuleKind::And, label, phrases, only_if_empty)
    }

    pub fn keyword(label: &str, keywords: &[&str], only_if_empty: bool) -> Self {
        Self::with_kind(RuleKind::Keyword, label, keywords, only_if_empty)
    }

    fn with_kind(kind: RuleKind, label: &str, phrases: &[&str], only_if_empty: bool) -> Self {
        Self {
            kind,
            label: label.to_string(),
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
            only_if_empty,
        }
    }

    fn phrases(&self) -> impl Iterator<Item = &str> {
        let fallback = self.phrases.is_empty().then_some(self.label.as_str());
        self.phrases.iter().map(String::as_str).chain(fallback)
    }

    /// Adds the label to `assigned` if any phrase matches.
    /// Phrases are tried in order, so an `only_if_empty` gate sees labels set by earlier phrases.
    pub fn apply(&self, name: &PostingName, assigned: &mut BTreeSet<String>) {
        for phrase in self.phrases() {
            if self.only_if_empty && !assigned.is_empty() {
                return;
            }
            let fired = match self.kind {
                RuleKind::And => name.contains_all_words(phrase),
                RuleKind::Keyword => name.contains_keyword(phrase),
            };
            if fired {
                assigned.insert(self.label.clone());
            }
        }
    }
}

/// A posting's display name, pre-lowered and pre-folded once for the whole cascade.
#[derive(Debug, Clone)]
pub struct PostingName {
    lowered: String,
    folded: String,
}

impl PostingName {
    pub fn new(name: &str) -> Self {
        let lowered = name.to_lowercase();
        let replaced: String = lowered
            .chars()
            .map(|c| if FOLDED_PUNCTUATION.contains(&c) { ' ' } else { c })
            .collect();
        Self {
            folded: format!(" {replaced} "),
            lowered,
        }
    }

    fn contains_all_words(&self, phrase: &str) -> bool {
        phrase
            .split([' ', '-'])
            .all(|word| self.lowered.contains(&word.to_lowercase()))
    }

    fn contains_keyword(&self, keyword: &str) -> bool {
        let padded = format!(" {} ", keyword.to_lowercase());
        self.folded.contains(&padded)
    }
}

/// Ordered rule list evaluated by a single interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleCascade {
    rules: Vec<ProfessionRule>,
}

impl RuleCascade {
    pub fn new(rules: Vec<ProfessionRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ProfessionRule] {
        &self.rules
    }

    /// Labels assigned to a posting name by the whole cascade. Empty when nothing fired.
    pub fn classify(&self, name: &str) -> BTreeSet<String> {
        let name = PostingName::new(name);
        let mut assigned = BTreeSet::new();
        for rule in &self.rules {
            rule.apply(&name, &mut assigned);
        }
        assigned
    }
}

impl Default for RuleCascade {
    /// Curated cascade for data and analytics professions. Order is significant.
    fn default() -> Self {
        use ProfessionRule as R;
        Self::new(vec![
            // analysts
            R::and("Системный аналитик", &[], false),
            R::and("Бизнес-аналитик", &["Бизнес-аналитик", "Business Analyst"], false),
            R::keyword("Аналитик BI", &["Аналитик BI", "BI analyst"], true),
            R::and("Аналитик данных", &["Аналитик данных", "Data Analyst"], false),
            R::and("Продуктовый аналитик", &[], false),
            R::and("Аналитик", &["Аналитик", "Analyst"], true),
            // database administration
            R::and(
                "Администратор баз данных",
                &["Администратор баз данных", "Администратор БД"],
                false,
            ),
            // data engineering
            R::and(
                "Инженер данных",
                &[
                    "Инженер данных",
                    "Data Engineer",
                    "Дата инженер",
                    "Data инженер",
                    "Data Architect",
                    "Hadoop",
                    "Kafka",
                ],
                false,
            ),
            R::keyword("Инженер данных", &["баз данных", "PostgreSQL", "MSSQL"], true),
            R::keyword("Инженер данных", &["Hadoop", "Kafka"], false),
            R::and("Data Scientist", &[], false),
            R::keyword("ML инженер", &["ML", "ETL", "MLOps"], false),
            R::keyword(
                "Big Data",
                &[
                    "Big Data",
                    "Биг Дата",
                    "DWH",
                    "Data lake",
                    "Hadoop",
                    "Kafka",
                    "больших данных",
                    "большие данные",
                ],
                false,
            ),
            // leftovers
            R::and("Data Scientist", &["Data Science"], false),
            R::and("Computer Vision", &["Computer Vision", "CV"], false),
            R::and(
                "NLP",
                &["Computer Vision", "NLP", "Natural Language Processing"],
                false,
            ),
        ])
    }
}
