// File: src/professions/classifier.rs
use crate::core::types::{Posting, ProfId, ProfessionLabel};
use crate::dataset::split_tokens_lenient;
use crate::professions::rules::RuleCascade;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::info;

/// Canonical profession labels, ids in first-appearance order.
#[derive(Debug, Clone, Default)]
pub struct ProfessionVocabulary {
    labels: Vec<ProfessionLabel>,
    index: HashMap<String, ProfId>,
}

impl ProfessionVocabulary {
    fn get_or_insert(&mut self, name: &str) -> ProfId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = self.labels.len();
        self.labels.push(ProfessionLabel {
            canonical_id: id,
            name: name.to_string(),
        });
        self.index.insert(name.to_string(), id);
        id
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[ProfessionLabel] {
        &self.labels
    }

    pub fn id_of(&self, name: &str) -> Option<ProfId> {
        self.index.get(name).copied()
    }

    pub fn name(&self, id: ProfId) -> Option<&str> {
        self.labels.get(id).map(|l| l.name.as_str())
    }

    pub fn id_to_name(&self) -> BTreeMap<ProfId, &str> {
        self.labels
            .iter()
            .map(|l| (l.canonical_id, l.name.as_str()))
            .collect()
    }
}

/// Result of classifying a whole posting set.
#[derive(Debug, Clone, Default)]
pub struct ProfessionAssignment {
    pub vocabulary: ProfessionVocabulary,
    /// Final label set per posting, parallel to the input postings.
    pub label_sets: Vec<BTreeSet<String>>,
    /// Same sets expressed as vocabulary ids.
    pub id_sets: Vec<BTreeSet<ProfId>>,
}

/// Maps posting query text and display name to canonical profession labels.
#[derive(Debug, Clone)]
pub struct ProfessionClassifier {
    direct_map: HashMap<String, String>,
    cascade: RuleCascade,
}

impl ProfessionClassifier {
    pub fn new(direct_map: HashMap<String, String>, cascade: RuleCascade) -> Self {
        Self {
            direct_map,
            cascade,
        }
    }

    /// Query tokens mapped through the curated map; unmapped tokens stand for themselves.
    pub fn direct_labels(&self, query_text: &str) -> BTreeSet<String> {
        split_tokens_lenient("query", query_text)
            .into_iter()
            .map(|token| self.direct_map.get(&token).cloned().unwrap_or(token))
            .collect()
    }

    /// The cascade result replaces the direct labels whenever it assigned anything.
    pub fn classify(&self, query_text: &str, name: &str) -> BTreeSet<String> {
        self.classify_with_source(query_text, name).0
    }

    /// Final labels plus whether they came from the cascade.
    fn classify_with_source(&self, query_text: &str, name: &str) -> (BTreeSet<String>, bool) {
        let ruled = self.cascade.classify(name);
        if ruled.is_empty() {
            (self.direct_labels(query_text), false)
        } else {
            (ruled, true)
        }
    }

    pub fn classify_all(&self, postings: &[Posting]) -> ProfessionAssignment {
        info!("Processing professions...");
        let mut vocabulary = ProfessionVocabulary::default();
        let mut label_sets = Vec::with_capacity(postings.len());
        let mut id_sets = Vec::with_capacity(postings.len());
        let mut by_rules = 0usize;

        for posting in postings {
            let (labels, from_rules) =
                self.classify_with_source(&posting.raw_query_text, &posting.name);
            if from_rules {
                by_rules += 1;
            }
            let ids: BTreeSet<ProfId> = labels
                .iter()
                .map(|label| vocabulary.get_or_insert(label))
                .collect();
            label_sets.push(labels);
            id_sets.push(ids);
        }

        info!(
            total = postings.len(),
            processed_by_rules = by_rules,
            professions = vocabulary.len(),
            "Processed professions"
        );

        ProfessionAssignment {
            vocabulary,
            label_sets,
            id_sets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(query: &str, name: &str) -> Posting {
        Posting {
            id: name.to_string(),
            raw_skill_mentions: Vec::new(),
            raw_query_text: query.to_string(),
            name: name.to_string(),
            salary_present: false,
            salary_from: None,
            salary_to: None,
        }
    }

    fn classifier() -> ProfessionClassifier {
        let direct_map = HashMap::from([
            ("java developer".to_string(), "Backend".to_string()),
            ("devops".to_string(), "DevOps".to_string()),
        ]);
        ProfessionClassifier::new(direct_map, RuleCascade::default())
    }

    fn labels(set: &BTreeSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    #[test]
    fn direct_pass_maps_and_keeps_unknown_tokens() {
        let labels_set = classifier().direct_labels(r#"['java developer', "devops", 'Tester']"#);
        assert_eq!(labels(&labels_set), vec!["Backend", "DevOps", "Tester"]);
    }

    #[test]
    fn direct_pass_splits_on_all_separators() {
        let labels_set = classifier().direct_labels(r"java developer\devops//QA");
        assert_eq!(labels(&labels_set), vec!["Backend", "DevOps", "QA"]);
    }

    #[test]
    fn malformed_query_yields_nothing() {
        assert!(classifier().direct_labels("['java developer'").is_empty());
        assert!(classifier().classify("['java developer'", "Курьер").is_empty());
    }

    #[test]
    fn cascade_replaces_direct_labels() {
        let labels_set = classifier().classify("['java developer']", "Data Engineer");
        assert_eq!(labels(&labels_set), vec!["Инженер данных"]);
    }

    #[test]
    fn falls_back_to_direct_labels() {
        let labels_set = classifier().classify("['java developer']", "Java разработчик");
        assert_eq!(labels(&labels_set), vec!["Backend"]);
    }

    #[test]
    fn vocabulary_ids_follow_first_appearance() {
        let postings = vec![
            posting("['devops']", "Инженер DevOps"),
            posting("['java developer', 'devops']", "Java разработчик"),
            posting("", "Data Scientist"),
            posting("", "Грузчик"),
        ];
        let assignment = classifier().classify_all(&postings);
        let vocab = &assignment.vocabulary;

        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.name(0), Some("DevOps"));
        assert_eq!(vocab.name(1), Some("Backend"));
        assert_eq!(vocab.name(2), Some("Data Scientist"));
        assert_eq!(assignment.id_sets[1], BTreeSet::from([0, 1]));
        assert!(assignment.label_sets[3].is_empty());
        assert!(assignment.id_sets[3].is_empty());
        for (id, label) in vocab.labels().iter().enumerate() {
            assert_eq!(label.canonical_id, id);
        }
    }

    #[test]
    fn batch_and_single_classification_agree() {
        let postings = vec![
            posting("['java developer']", "Data Engineer"),
            posting("['java developer', 'devops']", "Java разработчик"),
            posting("['java developer'", "Курьер"),
        ];
        let assignment = classifier().classify_all(&postings);
        for (posting, labels_set) in postings.iter().zip(&assignment.label_sets) {
            assert_eq!(
                labels_set,
                &classifier().classify(&posting.raw_query_text, &posting.name)
            );
        }
    }

    #[test]
    fn classification_is_deterministic() {
        let postings = vec![
            posting("['a', 'b', 'c']", "x"),
            posting("['c', 'd']", "y"),
        ];
        let first = classifier().classify_all(&postings);
        let second = classifier().classify_all(&postings);
        assert_eq!(first.vocabulary.id_to_name(), second.vocabulary.id_to_name());
        assert_eq!(first.id_sets, second.id_sets);
    }
}
