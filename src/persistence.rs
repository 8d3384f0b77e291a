// File: src/persistence.rs
use crate::core::engine::FeatureSet;
use crate::core::matrix::CoOccurrenceMatrix;
use crate::core::types::{Posting, SalaryQuantiles};
use crate::error::{FeaturesError, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

pub const SKILLS_LIST_FILE: &str = "skills.txt";
pub const SKILL_ORIGINAL_TO_INDEX_FILE: &str = "skill_original_to_index.json";
pub const SKILL_INDEX_TO_CORRECTED_FILE: &str = "skill_index_to_corrected.json";
pub const PROF_INDEX_TO_NAME_FILE: &str = "prof_index_to_prof_name.json";
pub const VACANCY_PROFSET_FILE: &str = "vacancy_profset.csv";
pub const SKILLS_TABLE_FILE: &str = "skills.csv";
pub const PROF_TABLE_FILE: &str = "prof.csv";
pub const MATRIX_FILE: &str = "matrix.bin";

type TempWriter<'a> = BufWriter<&'a NamedTempFile>;

/// Writes through a temp file in the target directory and renames it into place.
fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut TempWriter<'_>) -> Result<()>,
{
    let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        write(&mut writer)?;
        writer.flush()?;
    }
    temp_file
        .persist(path)
        .map_err(|e| FeaturesError::Persist {
            path: path.to_path_buf(),
            source: e.error,
        })?;
    Ok(())
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn quantile_cells(salary: &SalaryQuantiles) -> [String; 3] {
    [opt(salary.q25), opt(salary.q50), opt(salary.q75)]
}

/// Saves every artifact of a run into `dir`, creating it if needed.
pub fn save_artifacts(features: &FeatureSet, postings: &[Posting], dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    let skills = &features.skills.vocabulary;
    let professions = &features.professions.vocabulary;

    write_atomic(&dir.join(SKILLS_LIST_FILE), |w| {
        for name in skills.sorted_display_names() {
            writeln!(w, "{name}")?;
        }
        Ok(())
    })?;

    write_atomic(&dir.join(SKILL_ORIGINAL_TO_INDEX_FILE), |w| {
        Ok(serde_json::to_writer_pretty(w, &skills.original_to_id())?)
    })?;
    write_atomic(&dir.join(SKILL_INDEX_TO_CORRECTED_FILE), |w| {
        Ok(serde_json::to_writer_pretty(w, &skills.id_to_display_name())?)
    })?;
    write_atomic(&dir.join(PROF_INDEX_TO_NAME_FILE), |w| {
        Ok(serde_json::to_writer_pretty(w, &professions.id_to_name())?)
    })?;

    write_atomic(&dir.join(VACANCY_PROFSET_FILE), |w| {
        let mut table = csv::Writer::from_writer(w);
        table.write_record(["vacancy_id", "prof_set"])?;
        for (posting, labels) in postings.iter().zip(&features.professions.label_sets) {
            let joined = labels.iter().map(String::as_str).collect::<Vec<_>>().join("|");
            table.write_record([posting.id.as_str(), joined.as_str()])?;
        }
        table.flush()?;
        Ok(())
    })?;

    write_atomic(&dir.join(SKILLS_TABLE_FILE), |w| {
        let mut table = csv::Writer::from_writer(w);
        let mut header: Vec<&str> = vec![
            "skill_name",
            "skill_id",
            "salary_q25",
            "salary_q50",
            "salary_q75",
            "frequency",
            "popular_profession_id",
            "popular_profession_name",
        ];
        header.extend(professions.labels().iter().map(|l| l.name.as_str()));
        table.write_record(&header)?;

        for row in &features.skill_rows {
            let mut record = vec![row.skill_name.clone(), row.skill_id.to_string()];
            record.extend(quantile_cells(&row.salary));
            record.push(row.frequency.to_string());
            record.push(opt(row.popular_profession_id));
            record.push(row.popular_profession_name.clone().unwrap_or_default());
            record.extend(row.profession_weights.iter().map(f64::to_string));
            table.write_record(&record)?;
        }
        table.flush()?;
        Ok(())
    })?;

    write_atomic(&dir.join(PROF_TABLE_FILE), |w| {
        let mut table = csv::Writer::from_writer(w);
        table.write_record([
            "prof_name",
            "prof_id",
            "salary_q25",
            "salary_q50",
            "salary_q75",
            "frequency",
            "popular_skills",
        ])?;
        for row in &features.profession_rows {
            let mut record = vec![row.prof_name.clone(), row.prof_id.to_string()];
            record.extend(quantile_cells(&row.salary));
            record.push(row.frequency.to_string());
            record.push(row.popular_skills_joined());
            table.write_record(&record)?;
        }
        table.flush()?;
        Ok(())
    })?;

    write_atomic(&dir.join(MATRIX_FILE), |w| {
        Ok(bincode::serialize_into(w, &features.matrix)?)
    })?;

    info!(folder = %dir.display(), "Saved feature artifacts");
    Ok(())
}

pub fn load_matrix(path: &Path) -> Result<CoOccurrenceMatrix> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(bincode::deserialize_from(reader)?)
}
