// File: src/core/matrix.rs
use crate::core::types::{ProfId, ResolvedPosting, SkillId};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Dense skill x profession co-occurrence counts, row-major.
/// Shape is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoOccurrenceMatrix {
    num_skills: usize,
    num_professions: usize,
    cells: Vec<u64>,
}

impl CoOccurrenceMatrix {
    pub fn zeros(num_skills: usize, num_professions: usize) -> Self {
        Self {
            num_skills,
            num_professions,
            cells: vec![0; num_skills * num_professions],
        }
    }

    /// Counts every (profession, skill) pair of every posting.
    /// O(postings x skills per posting x professions per posting).
    pub fn build(postings: &[ResolvedPosting], num_skills: usize, num_professions: usize) -> Self {
        info!("Creating relationship matrix...");
        let mut matrix = Self::zeros(num_skills, num_professions);
        for posting in postings {
            for &prof_id in &posting.profession_ids {
                for &skill_id in &posting.skill_ids {
                    matrix.increment(skill_id, prof_id);
                }
            }
        }
        info!(
            skills = num_skills,
            professions = num_professions,
            "Created relationship matrix"
        );
        matrix
    }

    fn increment(&mut self, skill_id: SkillId, prof_id: ProfId) {
        debug_assert!(skill_id < self.num_skills, "skill id {skill_id} out of range");
        debug_assert!(prof_id < self.num_professions, "profession id {prof_id} out of range");
        if skill_id < self.num_skills && prof_id < self.num_professions {
            self.cells[skill_id * self.num_professions + prof_id] += 1;
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.num_skills, self.num_professions)
    }

    pub fn get(&self, skill_id: SkillId, prof_id: ProfId) -> u64 {
        if skill_id < self.num_skills && prof_id < self.num_professions {
            self.cells[skill_id * self.num_professions + prof_id]
        } else {
            0
        }
    }

    pub fn row(&self, skill_id: SkillId) -> &[u64] {
        let start = skill_id * self.num_professions;
        self.cells
            .get(start..start + self.num_professions)
            .unwrap_or(&[])
    }

    pub fn column(&self, prof_id: ProfId) -> impl Iterator<Item = u64> + '_ {
        (0..self.num_skills).map(move |s| self.get(s, prof_id))
    }

    /// Total skill mentions per profession.
    pub fn column_sums(&self) -> Vec<u64> {
        let mut sums = vec![0; self.num_professions];
        for row in self.cells.chunks(self.num_professions.max(1)) {
            for (sum, &cell) in sums.iter_mut().zip(row) {
                *sum += cell;
            }
        }
        sums
    }

    /// Rows as nested vectors, shape `[num_skills][num_professions]`.
    pub fn to_rows(&self) -> Vec<Vec<u64>> {
        (0..self.num_skills).map(|s| self.row(s).to_vec()).collect()
    }
}
