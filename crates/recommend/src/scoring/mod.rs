//! Multi-signal course scoring
//!
//! Five independent signals per candidate course, combined by fixed weights:
//! review average, prerequisite/corequisite overlap, shared programmes,
//! shared breadth requirements, and level proximity.

mod signals;

pub use signals::CourseScorer;

use serde::{Deserialize, Serialize};

/// Fixed weights of the composite score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub review: f64,
    pub pre_cor: f64,
    pub program: f64,
    pub breadth: f64,
    pub course_level: f64,
}

/// The composite weights. They sum to 1.0.
pub const WEIGHTS: ScoringWeights = ScoringWeights {
    review: 0.1,
    pre_cor: 0.3,
    program: 0.2,
    breadth: 0.2,
    course_level: 0.2,
};

/// Per-signal scores of one candidate course
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Mean recorded review score
    pub review: f64,

    /// Accumulated prerequisite/corequisite overlap (unbounded count)
    pub pre_cor: usize,

    /// Other courses sharing a programme
    pub program: usize,

    /// Other courses sharing a breadth requirement
    pub breadth: usize,

    /// Other courses at the same or the next level band
    pub course_level: usize,

    /// Weighted composite
    pub total: f64,
}

impl ScoreBreakdown {
    /// Assemble a breakdown from raw signals, computing the composite
    pub fn new(review: f64, pre_cor: usize, program: usize, breadth: usize, course_level: usize) -> Self {
        let total = WEIGHTS.review * review
            + WEIGHTS.pre_cor * pre_cor as f64
            + WEIGHTS.program * program as f64
            + WEIGHTS.breadth * breadth as f64
            + WEIGHTS.course_level * course_level as f64;

        Self {
            review,
            pre_cor,
            program,
            breadth,
            course_level,
            total,
        }
    }
}
