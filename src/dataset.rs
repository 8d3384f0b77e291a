// File: src/dataset.rs
use crate::core::types::Posting;
use crate::error::{FeaturesError, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// Splits list-like text such as `['Python', 'SQL']` into distinct tokens.
///
/// Separators are backslash, `//` and comma. Tokens are trimmed of whitespace and
/// quote characters; empty tokens are dropped. Order is first appearance.
pub fn split_tokens(field: &'static str, text: &str) -> Result<Vec<String>> {
    let trimmed = text.trim();
    let opens = trimmed.starts_with('[');
    let closes = trimmed.ends_with(']');
    if opens != closes {
        return Err(FeaturesError::MalformedRecord {
            field,
            text: text.to_string(),
        });
    }
    let inner = if opens {
        trimmed
            .get(1..trimmed.len() - 1)
            .ok_or_else(|| FeaturesError::MalformedRecord {
                field,
                text: text.to_string(),
            })?
    } else {
        trimmed
    };

    let unified = inner.replace("//", ",").replace('\\', ",");
    let mut seen = HashSet::new();
    let tokens = unified
        .split(',')
        .map(|t| t.trim_matches(|c: char| c.is_whitespace() || c == '\'' || c == '"'))
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.to_string()))
        .map(str::to_string)
        .collect();
    Ok(tokens)
}

/// Like [`split_tokens`], but a malformed record contributes no tokens instead of failing the batch.
pub fn split_tokens_lenient(field: &'static str, text: &str) -> Vec<String> {
    split_tokens(field, text).unwrap_or_else(|e| {
        warn!("{e}; treating as empty");
        Vec::new()
    })
}

/// One row of `vacancies.csv`. Unknown columns are ignored.
#[derive(Debug, Deserialize)]
struct PostingRecord {
    #[serde(alias = "vacancy_id")]
    id: String,
    #[serde(default)]
    query: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    skills: String,
    #[serde(default)]
    salary: String,
    salary_from: Option<f64>,
    salary_to: Option<f64>,
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim() {
        "True" | "true" | "TRUE" | "1" => Some(true),
        "False" | "false" | "FALSE" | "0" | "" => Some(false),
        _ => None,
    }
}

impl PostingRecord {
    fn into_posting(self, row: usize) -> Result<Posting> {
        let salary_present = parse_flag(&self.salary).ok_or(FeaturesError::InvalidValue {
            column: "salary",
            row,
            value: self.salary.clone(),
        })?;
        Ok(Posting {
            raw_skill_mentions: split_tokens_lenient("skills", &self.skills),
            id: self.id,
            raw_query_text: self.query,
            name: self.name,
            salary_present,
            salary_from: self.salary_from,
            salary_to: self.salary_to,
        })
    }
}

/// Loads the posting table. Rows that cannot be read are skipped with a warning.
pub fn load_postings(path: &Path) -> Result<Vec<Posting>> {
    if !path.is_file() {
        return Err(FeaturesError::MissingInput {
            path: path.to_path_buf(),
        });
    }
    let mut reader = csv::Reader::from_path(path)?;
    read_postings(&mut reader)
}

pub fn read_postings<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<Vec<Posting>> {
    let mut postings = Vec::new();
    for (idx, result) in reader.deserialize::<PostingRecord>().enumerate() {
        let row = idx + 1;
        match result.map_err(FeaturesError::from).and_then(|r| r.into_posting(row)) {
            Ok(posting) => postings.push(posting),
            Err(e) => warn!("Skipping row {row}: {e}"),
        }
    }
    info!(postings = postings.len(), "Loaded postings");
    Ok(postings)
}
