//! Metrics for graph construction and ranking
//!
//! Metric names share the `coursegraph` prefix. Without an installed
//! recorder every macro below is a no-op.

use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit,
};
use std::time::Instant;

/// Metrics prefix for all CourseGraph metrics
pub const METRICS_PREFIX: &str = "coursegraph";

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_recommendations_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of recommendation requests"
    );

    describe_counter!(
        format!("{}_candidates_scored_total", METRICS_PREFIX),
        Unit::Count,
        "Total candidate courses scored"
    );

    describe_histogram!(
        format!("{}_ranking_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Ranking latency in seconds"
    );

    describe_gauge!(
        format!("{}_graph_vertices", METRICS_PREFIX),
        Unit::Count,
        "Vertices in the most recently reported graph"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record one ranking pass
pub struct RankingMetrics {
    start: Instant,
    ranker: &'static str,
}

impl RankingMetrics {
    /// Start tracking a ranking pass
    pub fn start(ranker: &'static str) -> Self {
        Self {
            start: Instant::now(),
            ranker,
        }
    }

    /// Record ranking completion, returning the elapsed seconds
    pub fn finish(self, candidates_scored: usize) -> f64 {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_recommendations_total", METRICS_PREFIX),
            "ranker" => self.ranker
        )
        .increment(1);

        counter!(
            format!("{}_candidates_scored_total", METRICS_PREFIX),
            "ranker" => self.ranker
        )
        .increment(candidates_scored as u64);

        histogram!(
            format!("{}_ranking_duration_seconds", METRICS_PREFIX),
            "ranker" => self.ranker
        )
        .record(duration);

        duration
    }
}

/// Helper to record the size of a built graph
pub fn record_graph_size(vertex_count: usize, kind: &str) {
    gauge!(
        format!("{}_graph_vertices", METRICS_PREFIX),
        "kind" => kind.to_string()
    )
    .set(vertex_count as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_metrics() {
        register_metrics();
        let metrics = RankingMetrics::start("composite");
        let elapsed = metrics.finish(12);
        assert!(elapsed >= 0.0);
        record_graph_size(12, "course");
    }
}
