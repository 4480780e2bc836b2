//! Neighbourhood similarity between courses
//!
//! Compares two vertices kind by kind: the share of their combined
//! neighbours of that kind which both hold with the same edge weight.
//! Unlike the composite score, the ranking here depends on which input
//! course is being answered.

use super::Recommendations;
use coursegraph_common::errors::{GraphError, Result};
use coursegraph_common::metrics::RankingMetrics;
use coursegraph_graph::{CourseGraph, Vertex, VertexId, VertexKind};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, instrument};

/// Per-kind weights of the similarity score. They sum to 1.0.
pub const SIMILARITY_WEIGHTS: [(VertexKind, f64); 4] = [
    (VertexKind::Programme, 0.4),
    (VertexKind::Lecture, 0.2),
    (VertexKind::BreadthReq, 0.2),
    (VertexKind::CourseLevel, 0.2),
];

/// Ranks courses by neighbourhood similarity to each input course
pub struct SimilarityRanker<'g> {
    graph: &'g CourseGraph,
}

impl<'g> SimilarityRanker<'g> {
    pub fn new(graph: &'g CourseGraph) -> Self {
        Self { graph }
    }

    /// Weighted neighbourhood overlap of two vertices, in 0.0..=1.0
    pub fn similarity_score(&self, item1: &str, item2: &str) -> Result<f64> {
        let a = self
            .graph
            .vertex(item1)
            .ok_or_else(|| GraphError::unknown_vertex(item1))?;
        let b = self
            .graph
            .vertex(item2)
            .ok_or_else(|| GraphError::unknown_vertex(item2))?;
        Ok(self.similarity(a, b))
    }

    fn similarity(&self, a: &Vertex, b: &Vertex) -> f64 {
        if a.degree() == 0 || b.degree() == 0 {
            return 0.0;
        }

        SIMILARITY_WEIGHTS
            .iter()
            .map(|&(kind, weight)| {
                let ours = self.weighted_neighbours(a, kind);
                let theirs = self.weighted_neighbours(b, kind);

                let union = ours.keys().chain(theirs.keys()).collect::<HashSet<_>>().len();
                if union == 0 {
                    return 0.0;
                }
                let shared = ours
                    .iter()
                    .filter(|&(id, w)| theirs.get(id) == Some(w))
                    .count();

                weight * shared as f64 / union as f64
            })
            .sum()
    }

    fn weighted_neighbours(&self, vertex: &Vertex, kind: VertexKind) -> HashMap<VertexId, f64> {
        vertex
            .neighbour_ids()
            .filter(|&(id, _)| self.graph.get(id).kind() == kind)
            .collect()
    }

    /// Up to `limit` courses most similar to each input course.
    ///
    /// Candidates are all courses outside the input set, ordered by
    /// similarity descending and then by key ascending.
    #[instrument(skip_all, fields(limit = limit))]
    pub fn recommend_similar<I>(&self, input_courses: I, limit: usize) -> Result<Recommendations>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        if limit == 0 {
            return Err(GraphError::InvalidLimit { limit });
        }

        let input: BTreeSet<String> = input_courses
            .into_iter()
            .map(|c| c.as_ref().to_string())
            .collect();
        let metrics = RankingMetrics::start("similarity");

        let candidates: Vec<&Vertex> = self
            .graph
            .vertices_of(VertexKind::Course)
            .filter(|v| !input.contains(v.item()))
            .collect();

        let mut recommendations = Recommendations::new();
        for course in &input {
            let target = self
                .graph
                .vertex(course)
                .ok_or_else(|| GraphError::unknown_vertex(course.as_str()))?;

            let mut scored: Vec<(&str, f64)> = candidates
                .iter()
                .map(|candidate| (candidate.item(), self.similarity(target, candidate)))
                .collect();
            scored.sort_by(|a, b| compare_similarity(*a, *b));
            scored.truncate(limit);

            debug!(course = %course, candidates = candidates.len(), "Ranked by similarity");
            recommendations.insert(
                course.clone(),
                scored.into_iter().map(|(item, _)| item.to_string()).collect(),
            );
        }

        metrics.finish(candidates.len() * input.len());
        Ok(recommendations)
    }
}

fn compare_similarity(a: (&str, f64), b: (&str, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0))
}
