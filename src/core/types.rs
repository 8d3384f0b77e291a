// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Dense, 0-based identifier of a canonical skill group.
pub type SkillId = usize;

/// Dense, 0-based identifier of a canonical profession label.
pub type ProfId = usize;

/// One job listing, as loaded from the posting table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub id: String,
    /// Distinct raw skill spellings, in first-appearance order.
    pub raw_skill_mentions: Vec<String>,
    pub raw_query_text: String,
    pub name: String,
    pub salary_present: bool,
    pub salary_from: Option<f64>,
    pub salary_to: Option<f64>,
}

impl Posting {
    /// Midpoint of the salary fork. Only defined for salary-bearing postings with both bounds finite.
    pub fn salary_midpoint(&self) -> Option<f64> {
        if !self.salary_present {
            return None;
        }
        match (self.salary_from, self.salary_to) {
            (Some(from), Some(to)) => Some((from + to) / 2.0).filter(|m| m.is_finite()),
            _ => None,
        }
    }
}

/// All raw spellings that collapse onto one canonical skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub canonical_id: SkillId,
    /// Always a member of `member_names`.
    pub display_name: String,
    pub member_names: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionLabel {
    pub canonical_id: ProfId,
    pub name: String,
}

/// Derived per-posting ids, parallel to the posting slice they were built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPosting {
    pub skill_ids: BTreeSet<SkillId>,
    pub profession_ids: BTreeSet<ProfId>,
}

/// 25th/50th/75th salary percentiles, rounded. All three are either set or null.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryQuantiles {
    pub q25: Option<i64>,
    pub q50: Option<i64>,
    pub q75: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillFeatureRow {
    pub skill_name: String,
    pub skill_id: SkillId,
    pub salary: SalaryQuantiles,
    pub frequency: f64,
    pub popular_profession_id: Option<ProfId>,
    pub popular_profession_name: Option<String>,
    /// Share of each profession's skill mentions attributable to this skill, indexed by `ProfId`.
    pub profession_weights: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessionFeatureRow {
    pub prof_name: String,
    pub prof_id: ProfId,
    pub salary: SalaryQuantiles,
    pub frequency: f64,
    /// Up to `top_skills` display names, most co-occurring first.
    pub popular_skills: Vec<String>,
}

impl ProfessionFeatureRow {
    pub fn popular_skills_joined(&self) -> String {
        self.popular_skills.join(", ")
    }
}
