// File: src/core/normalizer.rs
use std::collections::HashMap;

/// Characters removed from a skill name after alias substitution and lowercasing.
const STRIPPED_CHARS: [char; 4] = [' ', '-', '/', ':'];

/// Folds raw skill spellings onto a comparison key.
///
/// Alias groups come from config; the first entry of each group is canonical.
/// Lookup is case-insensitive and the first group containing a spelling wins.
#[derive(Debug, Clone, Default)]
pub struct NameNormalizer {
    alias_to_canonical: HashMap<String, String>,
}

impl NameNormalizer {
    pub fn new(alias_groups: &[Vec<String>]) -> Self {
        let mut alias_to_canonical = HashMap::new();
        for group in alias_groups {
            let Some(canonical) = group.first() else {
                continue;
            };
            for alias in group {
                alias_to_canonical
                    .entry(alias.to_lowercase())
                    .or_insert_with(|| canonical.clone());
            }
        }
        Self { alias_to_canonical }
    }

    pub fn normalize(&self, raw: &str) -> String {
        let substituted = self
            .alias_to_canonical
            .get(&raw.to_lowercase())
            .map(String::as_str)
            .unwrap_or(raw);

        substituted
            .to_lowercase()
            .chars()
            .filter(|c| !STRIPPED_CHARS.contains(c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|g| g.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn folds_case_and_punctuation() {
        let normalizer = NameNormalizer::default();
        assert_eq!(normalizer.normalize("CI/CD"), "cicd");
        assert_eq!(normalizer.normalize("Power BI"), "powerbi");
        assert_eq!(normalizer.normalize("scikit-learn"), "scikitlearn");
        assert_eq!(normalizer.normalize("Apache: Kafka"), "apachekafka");
        assert_eq!(normalizer.normalize(""), "");
    }

    #[test]
    fn substitutes_alias_case_insensitively() {
        let normalizer = NameNormalizer::new(&groups(&[&["Python", "python3", "py"]]));
        assert_eq!(normalizer.normalize("PY"), "python");
        assert_eq!(normalizer.normalize("Python3"), "python");
        assert_eq!(normalizer.normalize("Python"), "python");
    }

    #[test]
    fn first_group_wins_on_overlap() {
        let normalizer = NameNormalizer::new(&groups(&[
            &["PostgreSQL", "postgres"],
            &["Postgres DB", "postgres"],
        ]));
        assert_eq!(normalizer.normalize("postgres"), "postgresql");
        assert_eq!(normalizer.normalize("Postgres DB"), "postgresdb");
    }

    #[test]
    fn empty_group_is_ignored() {
        let normalizer = NameNormalizer::new(&groups(&[&[], &["SQL", "sql-92"]]));
        assert_eq!(normalizer.normalize("SQL-92"), "sql");
    }
}
