// File: src/core/skills.rs
use crate::core::normalizer::NameNormalizer;
use crate::core::types::{Posting, SkillGroup, SkillId};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info};

/// Relative occurrence frequency of every distinct raw skill mention.
///
/// Entries keep first-appearance order so that id assignment downstream is reproducible.
#[derive(Debug, Clone, Default)]
pub struct MentionFrequencies {
    entries: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl MentionFrequencies {
    /// Fraction of postings containing each mention. O(total mentions).
    pub fn from_postings(postings: &[Posting]) -> Self {
        let mut counts: Vec<(String, u64)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for posting in postings {
            for mention in &posting.raw_skill_mentions {
                let slot = *index.entry(mention.clone()).or_insert_with(|| {
                    counts.push((mention.clone(), 0));
                    counts.len() - 1
                });
                counts[slot].1 += 1;
            }
        }

        let total = postings.len().max(1) as f64;
        let entries = counts
            .into_iter()
            .map(|(mention, count)| (mention, count as f64 / total))
            .collect();
        Self { entries, index }
    }

    /// Builds a table from explicit pairs. A repeated mention keeps its first position and last value.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for (mention, frequency) in pairs {
            let mention = mention.into();
            match table.index.get(&mention) {
                Some(&slot) => table.entries[slot].1 = frequency,
                None => {
                    table.index.insert(mention.clone(), table.entries.len());
                    table.entries.push((mention, frequency));
                }
            }
        }
        table
    }

    pub fn get(&self, mention: &str) -> Option<f64> {
        self.index.get(mention).map(|&slot| self.entries[slot].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(m, f)| (m.as_str(), *f))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The canonical skill vocabulary: dense groups plus the raw-spelling lookup.
#[derive(Debug, Clone, Default)]
pub struct SkillVocabulary {
    pub groups: Vec<SkillGroup>,
    original_to_id: HashMap<String, SkillId>,
}

impl SkillVocabulary {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn id_of(&self, raw: &str) -> Option<SkillId> {
        self.original_to_id.get(raw).copied()
    }

    pub fn display_name(&self, id: SkillId) -> Option<&str> {
        self.groups.get(id).map(|g| g.display_name.as_str())
    }

    pub fn original_to_id(&self) -> BTreeMap<&str, SkillId> {
        self.original_to_id
            .iter()
            .map(|(raw, &id)| (raw.as_str(), id))
            .collect()
    }

    pub fn id_to_display_name(&self) -> BTreeMap<SkillId, &str> {
        self.groups
            .iter()
            .map(|g| (g.canonical_id, g.display_name.as_str()))
            .collect()
    }

    /// Display names in lexicographic order.
    pub fn sorted_display_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.groups.iter().map(|g| g.display_name.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Ids for a posting's raw mentions. Unknown spellings are skipped.
    pub fn ids_for(&self, mentions: &[String]) -> BTreeSet<SkillId> {
        mentions.iter().filter_map(|m| self.id_of(m)).collect()
    }
}

/// Groups raw skill mentions by their normalized key.
pub struct SkillResolver<'a> {
    normalizer: &'a NameNormalizer,
}

impl<'a> SkillResolver<'a> {
    pub fn new(normalizer: &'a NameNormalizer) -> Self {
        Self { normalizer }
    }

    /// Assigns ids in the table's iteration order; the first new normalized key gets the next id.
    pub fn resolve(&self, frequencies: &MentionFrequencies) -> SkillVocabulary {
        let mut groups: Vec<SkillGroup> = Vec::new();
        let mut original_to_id = HashMap::with_capacity(frequencies.len());
        let mut normalized_to_id: HashMap<String, SkillId> = HashMap::new();

        for (raw, _) in frequencies.iter() {
            let key = self.normalizer.normalize(raw);
            let id = match normalized_to_id.get(&key) {
                Some(&id) => id,
                None => {
                    let id = groups.len();
                    normalized_to_id.insert(key, id);
                    groups.push(SkillGroup {
                        canonical_id: id,
                        display_name: raw.to_string(),
                        member_names: BTreeSet::new(),
                    });
                    id
                }
            };
            original_to_id.insert(raw.to_string(), id);

            let group = &mut groups[id];
            group.member_names.insert(raw.to_string());
            if group.member_names.len() > 1 {
                group.display_name = best_display_name(&group.member_names, frequencies);
                debug!(id, display_name = %group.display_name, "skill group merged");
            }
        }

        info!(
            "All skills count = {}, after correction = {}",
            original_to_id.len(),
            groups.len()
        );

        SkillVocabulary {
            groups,
            original_to_id,
        }
    }
}

/// Most frequent member; equal frequencies go to the lexicographically smallest spelling.
fn best_display_name(members: &BTreeSet<String>, frequencies: &MentionFrequencies) -> String {
    let mut best: Option<(&String, f64)> = None;
    for member in members {
        let freq = frequencies.get(member).unwrap_or(0.0);
        match best {
            Some((_, best_freq)) if freq <= best_freq => {}
            _ => best = Some((member, freq)),
        }
    }
    best.map(|(name, _)| name.clone()).unwrap_or_default()
}
