//! Top-K course recommendation
//!
//! Ranks every course outside the student's input set by composite score,
//! descending, with ties broken by ascending course key. Two identical
//! requests always produce identical output.

mod similarity;

pub use similarity::{SimilarityRanker, SIMILARITY_WEIGHTS};

use crate::scoring::{CourseScorer, ScoreBreakdown};
use coursegraph_common::config::RecommendationConfig;
use coursegraph_common::errors::{GraphError, Result};
use coursegraph_common::metrics::RankingMetrics;
use coursegraph_graph::CourseGraph;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, instrument};

/// Candidate course with its score breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCourse {
    /// Course key
    pub item: String,

    /// Sub-scores and composite
    pub breakdown: ScoreBreakdown,
}

/// Recommendations keyed by input course
pub type Recommendations = BTreeMap<String, Vec<String>>;

/// Composite-score recommender over one graph
pub struct Recommender<'g> {
    scorer: CourseScorer<'g>,
    default_limit: usize,
}

impl<'g> Recommender<'g> {
    /// Create a recommender with the built-in default limit
    pub fn new(graph: &'g CourseGraph) -> Self {
        Self::from_config(graph, &RecommendationConfig::default())
    }

    /// Create a recommender using the configured default limit
    pub fn from_config(graph: &'g CourseGraph, config: &RecommendationConfig) -> Self {
        Self {
            scorer: CourseScorer::new(graph),
            default_limit: config.default_limit,
        }
    }

    pub fn scorer(&self) -> &CourseScorer<'g> {
        &self.scorer
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Score and order every course not in `input_courses`
    pub fn rank_candidates(
        &self,
        input_courses: &HashSet<&str>,
        completed_courses: &HashSet<&str>,
    ) -> Vec<RankedCourse> {
        let mut ranked: Vec<RankedCourse> = self
            .scorer
            .courses()
            .filter(|course| !input_courses.contains(course))
            .map(|course| RankedCourse {
                item: course.to_string(),
                breakdown: self.scorer.score(course, completed_courses),
            })
            .collect();

        ranked.sort_by(compare_ranked);
        ranked
    }

    /// Up to `limit` scored recommendations for each input course
    #[instrument(skip_all, fields(limit = limit, inputs = tracing::field::Empty))]
    pub fn recommend_scored<I, C>(
        &self,
        input_courses: I,
        completed_courses: C,
        limit: usize,
    ) -> Result<BTreeMap<String, Vec<RankedCourse>>>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        if limit == 0 {
            return Err(GraphError::InvalidLimit { limit });
        }

        let input: Vec<String> = input_courses
            .into_iter()
            .map(|c| c.as_ref().to_string())
            .collect();
        let completed: Vec<String> = completed_courses
            .into_iter()
            .map(|c| c.as_ref().to_string())
            .collect();
        tracing::Span::current().record("inputs", input.len());

        let metrics = RankingMetrics::start("composite");
        let input_set: HashSet<&str> = input.iter().map(String::as_str).collect();
        let completed_set: HashSet<&str> = completed.iter().map(String::as_str).collect();

        // A candidate's score does not depend on which input course it is
        // listed under, so one ranking serves every input course.
        let mut ranked = self.rank_candidates(&input_set, &completed_set);
        let candidates = ranked.len();
        debug!(candidates, "Scored candidates");
        ranked.truncate(limit);

        let recommendations: BTreeMap<String, Vec<RankedCourse>> = input_set
            .iter()
            .map(|&course| (course.to_string(), ranked.clone()))
            .collect();

        let elapsed = metrics.finish(candidates);
        info!(
            inputs = recommendations.len(),
            candidates,
            elapsed_ms = elapsed * 1000.0,
            "Recommendations ranked"
        );

        Ok(recommendations)
    }

    /// Up to `limit` recommended course keys for each input course
    pub fn recommend<I, C>(&self, input_courses: I, completed_courses: C, limit: usize) -> Result<Recommendations>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let scored = self.recommend_scored(input_courses, completed_courses, limit)?;
        Ok(scored
            .into_iter()
            .map(|(course, ranked)| (course, ranked.into_iter().map(|r| r.item).collect()))
            .collect())
    }

    /// `recommend` with the configured default limit
    pub fn recommend_default<I, C>(&self, input_courses: I, completed_courses: C) -> Result<Recommendations>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        self.recommend(input_courses, completed_courses, self.default_limit)
    }
}

/// Descending by composite score, then ascending by key
fn compare_ranked(a: &RankedCourse, b: &RankedCourse) -> Ordering {
    b.breakdown
        .total
        .total_cmp(&a.breakdown.total)
        .then_with(|| a.item.cmp(&b.item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{add_course, catalogue};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::sync::Arc;

    fn three_csc_courses() -> CourseGraph {
        let mut graph = CourseGraph::new();
        add_course(&mut graph, "CSC101", &["CSC"], &[], None, &[0.8]);
        add_course(&mut graph, "CSC201", &["CSC"], &[], None, &[0.6]);
        add_course(&mut graph, "CSC301", &["CSC"], &[], None, &[]);
        graph
    }

    #[test]
    fn test_review_breaks_otherwise_equal_scores() {
        let graph = three_csc_courses();
        let recommender = Recommender::new(&graph);

        let result = recommender.recommend(["CSC101"], ["CSC101"], 2).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result["CSC101"], vec!["CSC201", "CSC301"]);
    }

    #[test]
    fn test_equal_scores_ordered_by_key() {
        let mut graph = CourseGraph::new();
        add_course(&mut graph, "CSC210", &["CSC"], &[], None, &[]);
        add_course(&mut graph, "CSC110", &["CSC"], &[], None, &[]);
        add_course(&mut graph, "MAT100", &["MAT"], &[], None, &[]);
        let recommender = Recommender::new(&graph);

        let result = recommender.recommend(["MAT100"], Vec::<&str>::new(), 3).unwrap();

        assert_eq!(result["MAT100"], vec!["CSC110", "CSC210"]);
    }

    #[test]
    fn test_input_courses_never_recommended() {
        let graph = catalogue();
        let recommender = Recommender::new(&graph);

        let result = recommender
            .recommend(["CSC110", "MAT137"], ["CSC110", "MAT137"], 5)
            .unwrap();

        assert_eq!(result.len(), 2);
        for ranked in result.values() {
            assert_eq!(ranked.len(), 2);
            assert!(!ranked.iter().any(|c| c == "CSC110" || c == "MAT137"));
        }
        assert_eq!(result["CSC110"], result["MAT137"]);
    }

    #[test]
    fn test_ranked_candidates_are_sorted() {
        let graph = catalogue();
        let recommender = Recommender::new(&graph);
        let done: HashSet<&str> = ["CSC111", "MAT137"].into_iter().collect();

        let ranked = recommender.rank_candidates(&HashSet::new(), &done);

        assert_eq!(ranked.len(), 4);
        for pair in ranked.windows(2) {
            assert_ne!(compare_ranked(&pair[0], &pair[1]), Ordering::Greater);
        }
        // 0.07 + 0.4 + 0.4 + 0.6 puts CSC110 ahead of its unreviewed peer
        assert_eq!(ranked[0].item, "CSC110");
        assert_eq!(ranked[1].item, "CSC111");
    }

    #[test]
    fn test_zero_limit_rejected() {
        let graph = catalogue();
        let recommender = Recommender::new(&graph);

        let err = recommender.recommend(["CSC110"], ["CSC110"], 0).unwrap_err();
        assert!(matches!(err, GraphError::InvalidLimit { limit: 0 }));
    }

    #[test]
    fn test_unknown_input_course_still_answered() {
        let graph = catalogue();
        let recommender = Recommender::new(&graph);

        let result = recommender.recommend(["ZZZ999"], ["ZZZ999"], 3).unwrap();
        assert_eq!(result["ZZZ999"].len(), 3);
    }

    #[test]
    fn test_default_limit_from_config() {
        let graph = catalogue();
        let config = RecommendationConfig { default_limit: 1 };
        let recommender = Recommender::from_config(&graph, &config);

        let result = recommender.recommend_default(["CSC110"], ["CSC110"]).unwrap();
        assert_eq!(result["CSC110"].len(), 1);
        assert_eq!(Recommender::new(&graph).default_limit(), 3);
    }

    #[test]
    fn test_scored_output_serializes() {
        let graph = three_csc_courses();
        let recommender = Recommender::new(&graph);

        let scored = recommender.recommend_scored(["CSC101"], ["CSC101"], 1).unwrap();
        let json = serde_json::to_value(&scored).unwrap();

        assert_eq!(json["CSC101"][0]["item"], "CSC201");
        assert_eq!(json["CSC101"][0]["breakdown"]["program"], 2);
    }

    #[test]
    fn test_random_graphs_rank_deterministically_within_limit() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..20 {
            let mut graph = CourseGraph::new();
            let course_count = rng.gen_range(1..15);
            let codes: Vec<String> = (0..course_count).map(|i| format!("C{:03}", i)).collect();
            for code in &codes {
                let programme = ["CSC", "MAT", "STA"][rng.gen_range(0..3)];
                let breadth = ["1", "2", "3", "4", "5"][rng.gen_range(0..5)];
                let level = ["100", "200", "300", "400"][rng.gen_range(0..4)];
                let reviews: Vec<f64> = (0..rng.gen_range(0..3)).map(|_| rng.gen_range(0.0..1.0)).collect();
                add_course(&mut graph, code, &[programme], &[breadth], Some(level), &reviews);
            }

            let input: Vec<&str> = codes.iter().take(2).map(String::as_str).collect();
            let limit = rng.gen_range(1..6);
            let recommender = Recommender::new(&graph);

            let first = recommender.recommend(&input, &input, limit).unwrap();
            let second = Recommender::new(&graph).recommend(&input, &input, limit).unwrap();
            assert_eq!(first, second);

            let candidate_count = course_count - input.len();
            for ranked in first.values() {
                assert_eq!(ranked.len(), limit.min(candidate_count));
            }
        }
    }

    #[test]
    fn test_concurrent_readers_agree() {
        let graph = Arc::new(catalogue());
        let expected = Recommender::new(&graph).recommend(["CSC110"], ["CSC111"], 3).unwrap();

        let results: Vec<Recommendations> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let graph = Arc::clone(&graph);
                    scope.spawn(move || {
                        Recommender::new(&graph)
                            .recommend(["CSC110"], ["CSC111"], 3)
                            .unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for result in results {
            assert_eq!(result, expected);
        }
    }
}
