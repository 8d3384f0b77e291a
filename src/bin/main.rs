use anyhow::Context;
use clap::Parser;
use crossterm::style::Stylize;
use features_core::{dataset, persistence, FeatureSet, FeaturesConfig};
use std::path::PathBuf;

/// Derive skill and profession features from processed vacancies.
#[derive(Parser, Debug)]
#[command(name = "features_engine")]
#[command(about = "Build skill/profession taxonomies, statistics and co-occurrence matrix")]
struct Args {
    /// Folder containing vacancies.csv
    #[arg(long, default_value = "data/processed")]
    data_folder: PathBuf,

    /// Output folder for feature artifacts
    #[arg(long, default_value = "data/features")]
    features_folder: PathBuf,

    /// Folder containing professions.json and skill_aliases.json
    #[arg(long, default_value = "cnf")]
    config_folder: PathBuf,

    /// Skills need strictly more salary-bearing vacancies than this to get quantiles
    #[arg(long, default_value_t = 10)]
    min_vacancies_for_skill: usize,

    /// Number of popular skills listed per profession
    #[arg(long, default_value_t = 10)]
    top_skills: usize,
}

impl From<Args> for FeaturesConfig {
    fn from(args: Args) -> Self {
        Self {
            data_folder: args.data_folder,
            features_folder: args.features_folder,
            config_folder: args.config_folder,
            min_vacancies_for_skill: args.min_vacancies_for_skill,
            top_skills: args.top_skills,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("features_core=info".parse()?),
        )
        .init();

    let config = FeaturesConfig::from(Args::parse());
    config.check_inputs()?;

    let engine = config.load_engine().context("Failed to load configuration")?;
    let postings = dataset::load_postings(&config.vacancies_path())
        .context("Failed to load vacancies")?;

    let features = engine.run(&postings);
    persistence::save_artifacts(&features, &postings, &config.features_folder)
        .with_context(|| format!("Failed to save features to {}", config.features_folder.display()))?;

    print_summary(&features, postings.len(), &config);
    Ok(())
}

fn print_summary(features: &FeatureSet, postings: usize, config: &FeaturesConfig) {
    let skills = &features.skills;
    let (rows, cols) = features.matrix.shape();
    println!("{}", "Feature processing completed".green().bold());
    println!("  vacancies:            {}", postings.to_string().cyan());
    println!(
        "  skills (raw -> canon): {} -> {}",
        skills.frequencies.len().to_string().cyan(),
        skills.vocabulary.len().to_string().cyan()
    );
    println!(
        "  professions:          {}",
        features.professions.vocabulary.len().to_string().cyan()
    );
    println!("  matrix:               {rows} x {cols}");
    println!(
        "  output:               {}",
        config.features_folder.display().to_string().yellow()
    );
}
