use crate::core::matrix::CoOccurrenceMatrix;
use crate::core::normalizer::NameNormalizer;
use crate::core::skills::{MentionFrequencies, SkillResolver, SkillVocabulary};
use crate::core::types::{Posting, ProfessionFeatureRow, ResolvedPosting, SkillFeatureRow};
use crate::professions::classifier::{ProfessionAssignment, ProfessionClassifier};
use crate::stats::StatsAggregator;
use tracing::info;

/// Output of the skill stage.
#[derive(Debug, Clone)]
pub struct SkillStage {
    pub frequencies: MentionFrequencies,
    pub vocabulary: SkillVocabulary,
}

/// Everything one run produces. Immutable once returned.
#[derive(Debug, Clone)]
pub struct FeatureSet {
    pub skills: SkillStage,
    pub professions: ProfessionAssignment,
    /// Per-posting ids, parallel to the input postings.
    pub resolved: Vec<ResolvedPosting>,
    pub matrix: CoOccurrenceMatrix,
    pub skill_rows: Vec<SkillFeatureRow>,
    pub profession_rows: Vec<ProfessionFeatureRow>,
}

/// Runs the stages in fixed order. Each stage reads only what earlier stages returned.
pub struct FeaturesEngine {
    pub normalizer: NameNormalizer,
    pub classifier: ProfessionClassifier,
    pub aggregator: StatsAggregator,
}

impl FeaturesEngine {
    pub fn new(
        normalizer: NameNormalizer,
        classifier: ProfessionClassifier,
        aggregator: StatsAggregator,
    ) -> Self {
        Self {
            normalizer,
            classifier,
            aggregator,
        }
    }

    pub fn resolve_skills(&self, postings: &[Posting]) -> SkillStage {
        info!("Extracting skills...");
        let frequencies = MentionFrequencies::from_postings(postings);
        info!("Correcting skills...");
        let vocabulary = SkillResolver::new(&self.normalizer).resolve(&frequencies);
        SkillStage {
            frequencies,
            vocabulary,
        }
    }

    pub fn classify_professions(&self, postings: &[Posting]) -> ProfessionAssignment {
        self.classifier.classify_all(postings)
    }

    pub fn attach_ids(
        postings: &[Posting],
        skills: &SkillVocabulary,
        professions: &ProfessionAssignment,
    ) -> Vec<ResolvedPosting> {
        postings
            .iter()
            .zip(&professions.id_sets)
            .map(|(posting, prof_ids)| ResolvedPosting {
                skill_ids: skills.ids_for(&posting.raw_skill_mentions),
                profession_ids: prof_ids.clone(),
            })
            .collect()
    }

    pub fn run(&self, postings: &[Posting]) -> FeatureSet {
        let skills = self.resolve_skills(postings);
        let professions = self.classify_professions(postings);
        let resolved = Self::attach_ids(postings, &skills.vocabulary, &professions);

        let matrix = CoOccurrenceMatrix::build(
            &resolved,
            skills.vocabulary.len(),
            professions.vocabulary.len(),
        );

        let profession_frequency =
            StatsAggregator::profession_frequencies(postings, &resolved, &professions.vocabulary);
        let skill_rows = self.aggregator.skill_rows(
            postings,
            &resolved,
            &skills.vocabulary,
            &professions.vocabulary,
            &matrix,
            &profession_frequency,
        );

        info!("Updating prof data frame...");
        let profession_rows = self.aggregator.profession_rows(
            postings,
            &resolved,
            &professions.vocabulary,
            &skills.vocabulary,
            &matrix,
        );

        info!("Feature processing completed");
        FeatureSet {
            skills,
            professions,
            resolved,
            matrix,
            skill_rows,
            profession_rows,
        }
    }
}
