use features_core::config::{PROFESSIONS_FILE, SKILL_ALIASES_FILE, VACANCIES_FILE};
use features_core::persistence::{self, MATRIX_FILE, PROF_TABLE_FILE, SKILLS_LIST_FILE, SKILLS_TABLE_FILE};
use features_core::{dataset, FeaturesConfig, FeaturesError};
use std::fs;
use std::path::Path;

const VACANCIES: &str = "\
vacancy_id,query,name,skills,salary,salary_from,salary_to
1,['python developer'],Data Engineer,\"['Python', 'SQL', 'Kafka']\",True,200000.0,300000.0
2,['python developer'],Python разработчик,\"['python3', 'Django']\",True,150000.0,250000.0
3,['аналитик'],Аналитик данных,\"['SQL', 'Excel', 'py']\",False,,
4,['аналитик'],Data Analyst,\"['SQL', 'Power BI']\",True,100000.0,140000.0
5,['devops'],Инженер DevOps,\"['Docker', 'Kafka'\",True,250000.0,350000.0
6,['python developer'],Backend Python,['PowerBI'],False,,
";

fn write_inputs(root: &Path) -> FeaturesConfig {
    let data = root.join("data");
    let cnf = root.join("cnf");
    fs::create_dir_all(&data).unwrap();
    fs::create_dir_all(&cnf).unwrap();
    fs::write(data.join(VACANCIES_FILE), VACANCIES).unwrap();
    fs::write(
        cnf.join(PROFESSIONS_FILE),
        r#"[
            {"query_name": "python developer", "profession": "Python разработчик"},
            {"query_name": "devops", "profession": "DevOps"}
        ]"#,
    )
    .unwrap();
    fs::write(cnf.join(SKILL_ALIASES_FILE), r#"[["Python", "python3", "py"]]"#).unwrap();

    FeaturesConfig {
        data_folder: data,
        features_folder: root.join("features"),
        config_folder: cnf,
        min_vacancies_for_skill: 1,
        top_skills: 10,
    }
}

#[test]
fn end_to_end_run_produces_consistent_features() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_inputs(dir.path());
    config.check_inputs().unwrap();

    let engine = config.load_engine().unwrap();
    let postings = dataset::load_postings(&config.vacancies_path()).unwrap();
    assert_eq!(postings.len(), 6);
    // unbalanced skills text on row 5 contributes nothing
    assert!(postings[4].raw_skill_mentions.is_empty());

    let features = engine.run(&postings);
    let skills = &features.skills.vocabulary;
    let professions = &features.professions.vocabulary;

    // every raw mention lands in exactly one dense id
    for (mention, _) in features.skills.frequencies.iter() {
        let id = skills.id_of(mention).unwrap();
        assert!(id < skills.len());
    }
    assert_eq!(skills.id_of("py"), skills.id_of("Python"));
    assert_eq!(skills.id_of("python3"), skills.id_of("Python"));
    assert_eq!(skills.id_of("Power BI"), skills.id_of("PowerBI"));
    for (id, group) in skills.groups.iter().enumerate() {
        assert_eq!(group.canonical_id, id);
    }

    // the cascade overrides query mapping; DevOps falls back to the direct map
    assert_eq!(
        features.professions.label_sets[0].iter().collect::<Vec<_>>(),
        vec!["Инженер данных"]
    );
    assert!(features.professions.label_sets[4].contains("DevOps"));
    for (id, label) in professions.labels().iter().enumerate() {
        assert_eq!(label.canonical_id, id);
    }

    for row in &features.skill_rows {
        assert!((0.0..=1.0).contains(&row.frequency));
        if let (Some(q25), Some(q50), Some(q75)) = (row.salary.q25, row.salary.q50, row.salary.q75) {
            assert!(q25 <= q50 && q50 <= q75);
        }
        assert_eq!(row.profession_weights.len(), professions.len());
    }
    for row in &features.profession_rows {
        assert!((0.0..=1.0).contains(&row.frequency));
        assert!(row.popular_skills.len() <= 10);
    }

    // column sums equal (posting, skill) pairs per profession
    let sums = features.matrix.column_sums();
    for prof_id in 0..professions.len() {
        let expected: u64 = features
            .resolved
            .iter()
            .filter(|r| r.profession_ids.contains(&prof_id))
            .map(|r| r.skill_ids.len() as u64)
            .sum();
        assert_eq!(sums[prof_id], expected);
    }

    persistence::save_artifacts(&features, &postings, &config.features_folder).unwrap();
    let out = &config.features_folder;
    let list = fs::read_to_string(out.join(SKILLS_LIST_FILE)).unwrap();
    let names: Vec<&str> = list.lines().collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
    assert_eq!(names.len(), skills.len());

    let skills_csv = fs::read_to_string(out.join(SKILLS_TABLE_FILE)).unwrap();
    assert!(skills_csv.starts_with("skill_name,skill_id,salary_q25"));
    assert_eq!(skills_csv.lines().count(), skills.len() + 1);
    let prof_csv = fs::read_to_string(out.join(PROF_TABLE_FILE)).unwrap();
    assert_eq!(prof_csv.lines().count(), professions.len() + 1);

    let matrix = persistence::load_matrix(&out.join(MATRIX_FILE)).unwrap();
    assert_eq!(matrix, features.matrix);
}

#[test]
fn repeated_runs_are_identical() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_inputs(dir.path());
    let postings = dataset::load_postings(&config.vacancies_path()).unwrap();

    let first = config.load_engine().unwrap().run(&postings);
    let second = config.load_engine().unwrap().run(&postings);
    assert_eq!(first.skills.vocabulary.original_to_id(), second.skills.vocabulary.original_to_id());
    assert_eq!(first.professions.vocabulary.id_to_name(), second.professions.vocabulary.id_to_name());
    assert_eq!(first.matrix, second.matrix);
}

#[test]
fn missing_config_aborts_before_running() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_inputs(dir.path());
    fs::remove_file(config.skill_aliases_path()).unwrap();
    let err = config.check_inputs().unwrap_err();
    assert!(matches!(err, FeaturesError::MissingInput { ref path } if path.ends_with(SKILL_ALIASES_FILE)));
}
