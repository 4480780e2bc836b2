//! Per-course signal functions
//!
//! `CourseScorer` precomputes a profile of every course (programmes, breadth
//! requirements, level band, requisite footprint) so each signal is a single
//! pass over the other courses. A candidate that is absent from the graph or
//! is not a course scores zero on every signal.

use super::ScoreBreakdown;
use coursegraph_graph::{CourseGraph, CourseLevel, Vertex, VertexId, VertexKind};
use std::collections::{HashMap, HashSet};

/// One-hop neighbourhood of a course
#[derive(Debug)]
struct CourseProfile<'g> {
    id: VertexId,
    programmes: HashSet<VertexId>,
    breadth: HashSet<VertexId>,
    level: Option<CourseLevel>,
    /// Union of the prerequisite and corequisite codes of every lecture
    requisites: HashSet<&'g str>,
}

impl<'g> CourseProfile<'g> {
    fn build(graph: &'g CourseGraph, id: VertexId, course: &'g Vertex) -> Self {
        let mut programmes = HashSet::new();
        let mut breadth = HashSet::new();
        let mut requisites = HashSet::new();

        for (nid, _) in course.neighbour_ids() {
            let neighbour = graph.get(nid);
            match neighbour.kind() {
                VertexKind::Programme => {
                    programmes.insert(nid);
                }
                VertexKind::BreadthReq => {
                    breadth.insert(nid);
                }
                VertexKind::Lecture => requisites.extend(neighbour.requisites()),
                _ => {}
            }
        }

        Self {
            id,
            programmes,
            breadth,
            level: graph.course_level(course),
            requisites,
        }
    }
}

/// Scores candidate courses against a fixed graph
pub struct CourseScorer<'g> {
    graph: &'g CourseGraph,

    /// Profiles of every course vertex, in graph insertion order
    profiles: Vec<CourseProfile<'g>>,

    /// Course item key -> position in `profiles`
    positions: HashMap<&'g str, usize>,
}

impl<'g> CourseScorer<'g> {
    /// Profile every course in `graph`
    pub fn new(graph: &'g CourseGraph) -> Self {
        let mut profiles = Vec::new();
        let mut positions = HashMap::new();

        for (id, vertex) in graph.iter() {
            if vertex.kind() == VertexKind::Course {
                positions.insert(vertex.item(), profiles.len());
                profiles.push(CourseProfile::build(graph, id, vertex));
            }
        }

        tracing::debug!(courses = profiles.len(), "Profiled courses");

        Self {
            graph,
            profiles,
            positions,
        }
    }

    pub fn graph(&self) -> &'g CourseGraph {
        self.graph
    }

    /// Course keys in graph insertion order
    pub fn courses(&self) -> impl Iterator<Item = &'g str> + '_ {
        self.profiles.iter().map(|p| self.graph.get(p.id).item())
    }

    pub fn course_count(&self) -> usize {
        self.profiles.len()
    }

    /// Mean of the course's recorded review scores; 0 if none recorded
    pub fn review_score(&self, course: &str) -> f64 {
        match self.graph.vertex(course) {
            Some(vertex) if vertex.kind() == VertexKind::Course => {
                let reviews = vertex.reviews();
                if reviews.is_empty() {
                    0.0
                } else {
                    reviews.iter().sum::<f64>() / reviews.len() as f64
                }
            }
            _ => 0.0,
        }
    }

    /// Overlap between the candidate's satisfied requisites and every other
    /// course's requisite footprint.
    ///
    /// The candidate's lecture requisites are first narrowed to `completed`;
    /// each other course then contributes the size of its footprint's
    /// intersection with that narrowed set. The count is not normalised.
    pub fn pre_cor_score(&self, course: &str, completed: &HashSet<&str>) -> usize {
        let Some(position) = self.position(course) else {
            return 0;
        };

        let relevant: HashSet<&str> = self.profiles[position]
            .requisites
            .iter()
            .copied()
            .filter(|code| completed.contains(code))
            .collect();
        if relevant.is_empty() {
            return 0;
        }

        self.others(position)
            .map(|other| other.requisites.intersection(&relevant).count())
            .sum()
    }

    /// Number of other courses sharing at least one programme
    pub fn program_score(&self, course: &str) -> usize {
        self.count_sharing(course, |p| &p.programmes)
    }

    /// Number of other courses sharing at least one breadth requirement
    pub fn breadth_score(&self, course: &str) -> usize {
        self.count_sharing(course, |p| &p.breadth)
    }

    /// Number of other courses at the candidate's level band or the band
    /// directly above it. Courses without exactly one level band never count.
    pub fn course_level_score(&self, course: &str) -> usize {
        let Some(position) = self.position(course) else {
            return 0;
        };
        let Some(level) = self.profiles[position].level else {
            return 0;
        };
        let successor = level.successor();

        self.others(position)
            .filter_map(|other| other.level)
            .filter(|&other| other == level || Some(other) == successor)
            .count()
    }

    /// All five signals and their weighted composite
    pub fn score(&self, course: &str, completed: &HashSet<&str>) -> ScoreBreakdown {
        ScoreBreakdown::new(
            self.review_score(course),
            self.pre_cor_score(course, completed),
            self.program_score(course),
            self.breadth_score(course),
            self.course_level_score(course),
        )
    }

    /// Weighted composite score of one candidate
    pub fn compute_total_score(&self, course: &str, completed: &HashSet<&str>) -> f64 {
        self.score(course, completed).total
    }

    fn position(&self, course: &str) -> Option<usize> {
        self.positions.get(course).copied()
    }

    fn others(&self, position: usize) -> impl Iterator<Item = &CourseProfile<'g>> + '_ {
        self.profiles
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != position)
            .map(|(_, profile)| profile)
    }

    fn count_sharing<F>(&self, course: &str, neighbours: F) -> usize
    where
        F: for<'a> Fn(&'a CourseProfile<'g>) -> &'a HashSet<VertexId>,
    {
        let Some(position) = self.position(course) else {
            return 0;
        };
        let own = neighbours(&self.profiles[position]);
        if own.is_empty() {
            return 0;
        }

        self.others(position)
            .filter(|other| !own.is_disjoint(neighbours(other)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{add_course, add_lecture, catalogue};

    fn completed<'a>(codes: &[&'a str]) -> HashSet<&'a str> {
        codes.iter().copied().collect()
    }

    #[test]
    fn test_review_score_is_mean() {
        let graph = catalogue();
        let scorer = CourseScorer::new(&graph);

        assert!((scorer.review_score("CSC110") - 0.7).abs() < 1e-12);
        assert_eq!(scorer.review_score("CSC111"), 0.0);
    }

    #[test]
    fn test_missing_or_non_course_scores_zero() {
        let graph = catalogue();
        let scorer = CourseScorer::new(&graph);
        let done = completed(&["CSC110"]);

        for item in ["NOPE101", "CSC", "200", "5", "CSC207-L0101"] {
            assert_eq!(scorer.score(item, &done), ScoreBreakdown::default(), "{}", item);
        }
    }

    #[test]
    fn test_program_score_counts_sharing_courses() {
        let graph = catalogue();
        let scorer = CourseScorer::new(&graph);

        // CSC110, CSC111, CSC207 share CSC; MAT137 is alone in MAT
        assert_eq!(scorer.program_score("CSC110"), 2);
        assert_eq!(scorer.program_score("MAT137"), 0);
    }

    #[test]
    fn test_breadth_score_counts_sharing_courses() {
        let graph = catalogue();
        let scorer = CourseScorer::new(&graph);

        // breadth 5: CSC110, CSC111, MAT137; CSC207 has none
        assert_eq!(scorer.breadth_score("CSC110"), 2);
        assert_eq!(scorer.breadth_score("MAT137"), 2);
        assert_eq!(scorer.breadth_score("CSC207"), 0);
    }

    #[test]
    fn test_course_level_score_same_or_next_band() {
        let graph = catalogue();
        let scorer = CourseScorer::new(&graph);

        // 100: CSC110, CSC111, MAT137; 200: CSC207
        assert_eq!(scorer.course_level_score("CSC110"), 3);
        assert_eq!(scorer.course_level_score("CSC207"), 0);
    }

    #[test]
    fn test_course_level_has_no_wraparound() {
        let mut graph = CourseGraph::new();
        add_course(&mut graph, "CSC490", &["CSC"], &[], Some("400"), &[]);
        add_course(&mut graph, "CSC108", &["CSC"], &[], Some("100"), &[]);
        let scorer = CourseScorer::new(&graph);

        assert_eq!(scorer.course_level_score("CSC490"), 0);
        assert_eq!(scorer.course_level_score("CSC108"), 0);
    }

    #[test]
    fn test_course_level_ignores_ambiguous_levels() {
        let mut graph = catalogue();
        graph.add_vertex("100/200", "course_level");
        graph.add_edge("CSC111", "100/200").unwrap();
        let scorer = CourseScorer::new(&graph);

        assert_eq!(scorer.course_level_score("CSC111"), 0);
        // CSC110 loses CSC111 as a same-band peer
        assert_eq!(scorer.course_level_score("CSC110"), 2);
    }

    #[test]
    fn test_pre_cor_score_accumulates_overlap() {
        let mut graph = catalogue();
        add_course(&mut graph, "CSC263", &["CSC"], &[], Some("200"), &[]);
        add_lecture(&mut graph, "CSC263-L0101", "CSC263", &["CSC207", "CSC111"], &["STA247"]);
        let scorer = CourseScorer::new(&graph);

        // CSC207 lecture footprint: {CSC111, MAT137}; CSC263: {CSC207, CSC111, STA247}
        let done = completed(&["CSC111", "MAT137"]);
        assert_eq!(scorer.pre_cor_score("CSC207", &done), 1);
        assert_eq!(scorer.pre_cor_score("CSC263", &done), 1);

        let nothing = completed(&[]);
        assert_eq!(scorer.pre_cor_score("CSC207", &nothing), 0);
    }

    #[test]
    fn test_pre_cor_score_counts_every_other_course() {
        let mut graph = CourseGraph::new();
        for code in ["A", "B", "C"] {
            add_course(&mut graph, code, &[], &[], None, &[]);
            add_lecture(&mut graph, &format!("{}-L1", code), code, &["X", "Y"], &[]);
        }
        let scorer = CourseScorer::new(&graph);

        // relevant {X, Y}; B and C each overlap on two codes
        assert_eq!(scorer.pre_cor_score("A", &completed(&["X", "Y"])), 4);
        assert_eq!(scorer.pre_cor_score("A", &completed(&["X"])), 2);
    }

    #[test]
    fn test_total_score_uses_fixed_weights() {
        let graph = catalogue();
        let scorer = CourseScorer::new(&graph);
        let done = completed(&["CSC111", "MAT137"]);

        let breakdown = scorer.score("CSC110", &done);
        let expected = 0.1 * 0.7
            + 0.3 * breakdown.pre_cor as f64
            + 0.2 * 2.0
            + 0.2 * 2.0
            + 0.2 * 3.0;
        assert!((scorer.compute_total_score("CSC110", &done) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_signals_monotonic_when_courses_added() {
        let mut graph = catalogue();
        let done = completed(&["CSC111", "MAT137"]);
        let before = {
            let scorer = CourseScorer::new(&graph);
            scorer.score("CSC207", &done)
        };

        add_course(&mut graph, "CSC209", &["CSC"], &["5"], Some("200"), &[]);
        add_lecture(&mut graph, "CSC209-L0101", "CSC209", &["CSC111"], &[]);
        let scorer = CourseScorer::new(&graph);
        let after = scorer.score("CSC207", &done);

        assert!(after.program > before.program);
        assert!(after.pre_cor > before.pre_cor);
        assert!(after.breadth >= before.breadth);
        assert!(after.total >= before.total);
    }

    #[test]
    fn test_breadth_score_grows_with_sharing_course() {
        let mut graph = catalogue();
        let before = CourseScorer::new(&graph).breadth_score("CSC110");

        add_course(&mut graph, "PHL101", &["PHL"], &["2"], Some("100"), &[]);
        assert_eq!(CourseScorer::new(&graph).breadth_score("CSC110"), before);

        add_course(&mut graph, "PHL102", &["PHL"], &["2", "5"], Some("100"), &[]);
        let scorer = CourseScorer::new(&graph);
        assert_eq!(before, 2);
        assert_eq!(scorer.breadth_score("CSC110"), before + 1);
        assert_eq!(scorer.breadth_score("PHL101"), 1);
    }

    #[test]
    fn test_courses_in_insertion_order() {
        let graph = catalogue();
        let scorer = CourseScorer::new(&graph);
        let courses: Vec<&str> = scorer.courses().collect();
        assert_eq!(courses, vec!["CSC110", "CSC111", "CSC207", "MAT137"]);
        assert_eq!(scorer.course_count(), 4);
    }
}
