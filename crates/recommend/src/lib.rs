//! CourseGraph recommender
//!
//! Scores candidate courses against a student's completed courses and
//! returns a deterministic top-K list per input course:
//! - Five per-course signals combined by fixed weights
//! - Descending-score ranking with ascending-key tie-break
//! - Neighbourhood similarity ranking per input course
//!
//! The graph is only read. One `CourseGraph` can back any number of
//! recommenders on different threads.

pub mod ranking;
pub mod scoring;

#[cfg(test)]
mod fixtures;

pub use ranking::{RankedCourse, Recommendations, Recommender, SimilarityRanker};
pub use scoring::{CourseScorer, ScoreBreakdown, ScoringWeights, WEIGHTS};
