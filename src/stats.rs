// File: src/stats.rs
use crate::core::matrix::CoOccurrenceMatrix;
use crate::core::skills::SkillVocabulary;
use crate::core::types::{
    Posting, ProfId, ProfessionFeatureRow, ResolvedPosting, SalaryQuantiles, SkillFeatureRow,
};
use crate::professions::classifier::ProfessionVocabulary;
use std::collections::BTreeSet;
use tracing::info;

/// Per-entity sample gathered in one pass over the postings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntitySample {
    pub postings: usize,
    pub salary_postings: usize,
    pub midpoints: Vec<f64>,
}

impl EntitySample {
    pub fn frequency(&self, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            self.postings as f64 / total as f64
        }
    }

    /// Quantiles when strictly more than `min_exclusive` salary-bearing postings exist.
    pub fn salary_quantiles(&self, min_exclusive: usize) -> SalaryQuantiles {
        if self.salary_postings > min_exclusive {
            SalaryQuantiles::from_samples(&self.midpoints)
        } else {
            SalaryQuantiles::default()
        }
    }
}

/// Groups postings by entity id. `ids` yields each posting's entity set, parallel to `postings`.
pub fn collect_samples<'a, I>(postings: &[Posting], ids: I, num_entities: usize) -> Vec<EntitySample>
where
    I: IntoIterator<Item = &'a BTreeSet<usize>>,
{
    let mut samples = vec![EntitySample::default(); num_entities];
    for (posting, entity_ids) in postings.iter().zip(ids) {
        let midpoint = posting.salary_midpoint();
        for &id in entity_ids {
            let Some(sample) = samples.get_mut(id) else {
                continue;
            };
            sample.postings += 1;
            if posting.salary_present {
                sample.salary_postings += 1;
            }
            if let Some(m) = midpoint {
                sample.midpoints.push(m);
            }
        }
    }
    samples
}

/// Empirical quantile with linear interpolation between closest ranks. `sorted` must be ascending.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q.clamp(0.0, 1.0) * last as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

impl SalaryQuantiles {
    pub fn from_samples(samples: &[f64]) -> Self {
        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let at = |q| quantile(&sorted, q).map(|v: f64| v.round_ties_even() as i64);
        Self {
            q25: at(0.25),
            q50: at(0.50),
            q75: at(0.75),
        }
    }
}

/// Computes the skill and profession feature tables.
#[derive(Debug, Clone, Copy)]
pub struct StatsAggregator {
    pub min_vacancies_for_skill: usize,
    pub top_skills: usize,
}

impl StatsAggregator {
    pub fn new(min_vacancies_for_skill: usize, top_skills: usize) -> Self {
        Self {
            min_vacancies_for_skill,
            top_skills,
        }
    }

    /// Share of postings carrying each profession, indexed by `ProfId`.
    pub fn profession_frequencies(
        postings: &[Posting],
        resolved: &[ResolvedPosting],
        professions: &ProfessionVocabulary,
    ) -> Vec<f64> {
        collect_samples(
            postings,
            resolved.iter().map(|r| &r.profession_ids),
            professions.len(),
        )
        .iter()
        .map(|s| s.frequency(postings.len()))
        .collect()
    }

    pub fn skill_rows(
        &self,
        postings: &[Posting],
        resolved: &[ResolvedPosting],
        skills: &SkillVocabulary,
        professions: &ProfessionVocabulary,
        matrix: &CoOccurrenceMatrix,
        profession_frequency: &[f64],
    ) -> Vec<SkillFeatureRow> {
        info!("Creating skills data frame...");
        let samples = collect_samples(postings, resolved.iter().map(|r| &r.skill_ids), skills.len());
        let column_sums = matrix.column_sums();

        let rows: Vec<SkillFeatureRow> = skills
            .groups
            .iter()
            .zip(&samples)
            .map(|(group, sample)| {
                let counts = matrix.row(group.canonical_id);
                let popular = popular_profession(counts, profession_frequency);
                let profession_weights = counts
                    .iter()
                    .zip(&column_sums)
                    .map(|(&c, &sum)| if sum == 0 { 0.0 } else { c as f64 / sum as f64 })
                    .collect();
                SkillFeatureRow {
                    skill_name: group.display_name.clone(),
                    skill_id: group.canonical_id,
                    salary: sample.salary_quantiles(self.min_vacancies_for_skill),
                    frequency: sample.frequency(postings.len()),
                    popular_profession_id: popular,
                    popular_profession_name: popular
                        .and_then(|id| professions.name(id))
                        .map(str::to_string),
                    profession_weights,
                }
            })
            .collect();

        info!(skills = rows.len(), "Created skills data frame");
        rows
    }

    pub fn profession_rows(
        &self,
        postings: &[Posting],
        resolved: &[ResolvedPosting],
        professions: &ProfessionVocabulary,
        skills: &SkillVocabulary,
        matrix: &CoOccurrenceMatrix,
    ) -> Vec<ProfessionFeatureRow> {
        let samples = collect_samples(
            postings,
            resolved.iter().map(|r| &r.profession_ids),
            professions.len(),
        );

        professions
            .labels()
            .iter()
            .zip(&samples)
            .map(|(label, sample)| ProfessionFeatureRow {
                prof_name: label.name.clone(),
                prof_id: label.canonical_id,
                salary: sample.salary_quantiles(0),
                frequency: sample.frequency(postings.len()),
                popular_skills: self.popular_skills(matrix, label.canonical_id, skills),
            })
            .collect()
    }

    /// Most co-occurring skills of a profession. Ties go to the lower skill id.
    fn popular_skills(
        &self,
        matrix: &CoOccurrenceMatrix,
        prof_id: ProfId,
        skills: &SkillVocabulary,
    ) -> Vec<String> {
        let mut ranked: Vec<(usize, u64)> = matrix
            .column(prof_id)
            .enumerate()
            .filter(|&(_, count)| count > 0)
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
            .into_iter()
            .take(self.top_skills)
            .filter_map(|(id, _)| skills.display_name(id).map(str::to_string))
            .collect()
    }
}

/// Argmax of `count / profession frequency`; the first maximum wins.
fn popular_profession(counts: &[u64], profession_frequency: &[f64]) -> Option<ProfId> {
    let mut best: Option<(ProfId, f64)> = None;
    for (id, (&count, &freq)) in counts.iter().zip(profession_frequency).enumerate() {
        let score = if freq > 0.0 { count as f64 / freq } else { 0.0 };
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((id, score)),
        }
    }
    best.map(|(id, _)| id)
}
