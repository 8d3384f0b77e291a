// File: src/config.rs
use crate::core::engine::FeaturesEngine;
use crate::core::normalizer::NameNormalizer;
use crate::error::{FeaturesError, Result};
use crate::professions::classifier::ProfessionClassifier;
use crate::professions::rules::RuleCascade;
use crate::stats::StatsAggregator;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

pub const VACANCIES_FILE: &str = "vacancies.csv";
pub const PROFESSIONS_FILE: &str = "professions.json";
pub const SKILL_ALIASES_FILE: &str = "skill_aliases.json";
/// Optional override of the built-in profession rule cascade.
pub const PROFESSION_RULES_FILE: &str = "profession_rules.json";

/// One entry of `professions.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionMapping {
    pub query_name: String,
    pub profession: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturesConfig {
    pub data_folder: PathBuf,
    pub features_folder: PathBuf,
    pub config_folder: PathBuf,
    pub min_vacancies_for_skill: usize,
    pub top_skills: usize,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            data_folder: PathBuf::from("data/processed"),
            features_folder: PathBuf::from("data/features"),
            config_folder: PathBuf::from("cnf"),
            min_vacancies_for_skill: 10,
            top_skills: 10,
        }
    }
}

impl FeaturesConfig {
    pub fn vacancies_path(&self) -> PathBuf {
        self.data_folder.join(VACANCIES_FILE)
    }

    pub fn professions_path(&self) -> PathBuf {
        self.config_folder.join(PROFESSIONS_FILE)
    }

    pub fn skill_aliases_path(&self) -> PathBuf {
        self.config_folder.join(SKILL_ALIASES_FILE)
    }

    pub fn profession_rules_path(&self) -> PathBuf {
        self.config_folder.join(PROFESSION_RULES_FILE)
    }

    /// Fails with `MissingInput` on the first absent required file.
    pub fn check_inputs(&self) -> Result<()> {
        for path in [
            self.vacancies_path(),
            self.professions_path(),
            self.skill_aliases_path(),
        ] {
            require_file(&path)?;
        }
        Ok(())
    }

    /// Builds the engine from the config folder.
    pub fn load_engine(&self) -> Result<FeaturesEngine> {
        let direct_map = load_direct_map(&self.professions_path())?;
        let aliases = load_skill_aliases(&self.skill_aliases_path())?;
        let cascade = load_rule_cascade(&self.profession_rules_path())?;
        info!(
            direct_mappings = direct_map.len(),
            alias_groups = aliases.len(),
            rules = cascade.rules().len(),
            "Loaded configuration"
        );

        Ok(FeaturesEngine::new(
            NameNormalizer::new(&aliases),
            ProfessionClassifier::new(direct_map, cascade),
            StatsAggregator::new(self.min_vacancies_for_skill, self.top_skills),
        ))
    }
}

fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(FeaturesError::MissingInput {
            path: path.to_path_buf(),
        })
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    require_file(path)?;
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Query string to preferred profession. A repeated `query_name` keeps the last entry.
pub fn load_direct_map(path: &Path) -> Result<HashMap<String, String>> {
    let mappings: Vec<ProfessionMapping> = load_json(path)?;
    Ok(mappings
        .into_iter()
        .map(|m| (m.query_name, m.profession))
        .collect())
}

pub fn load_skill_aliases(path: &Path) -> Result<Vec<Vec<String>>> {
    load_json(path)
}

/// The file's cascade if present, the built-in one otherwise.
pub fn load_rule_cascade(path: &Path) -> Result<RuleCascade> {
    if path.is_file() {
        load_json(path)
    } else {
        Ok(RuleCascade::default())
    }
}
