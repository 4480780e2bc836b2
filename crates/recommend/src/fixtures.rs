//! Graph builders shared by the unit tests

use coursegraph_graph::CourseGraph;

/// Add a course wired to its programmes, breadth requirements and level
pub fn add_course(
    graph: &mut CourseGraph,
    code: &str,
    programmes: &[&str],
    breadth: &[&str],
    level: Option<&str>,
    reviews: &[f64],
) {
    graph.add_vertex(code, "course");
    for &programme in programmes {
        graph.add_vertex(programme, "programme");
        graph.add_edge(code, programme).unwrap();
    }
    for &category in breadth {
        graph.add_vertex(category, "breadth_req");
        graph.add_edge(code, category).unwrap();
    }
    if let Some(level) = level {
        graph.add_vertex(level, "course_level");
        graph.add_edge(code, level).unwrap();
    }
    for &score in reviews {
        graph.record_review(code, score).unwrap();
    }
}

/// Add a lecture section of `course` with requisite codes
pub fn add_lecture(graph: &mut CourseGraph, lecture: &str, course: &str, prerequisites: &[&str], corequisites: &[&str]) {
    graph.add_vertex(lecture, "lecture");
    graph.add_edge(course, lecture).unwrap();
    for &code in prerequisites {
        graph.add_prerequisite(lecture, code).unwrap();
    }
    for &code in corequisites {
        graph.add_corequisite(lecture, code).unwrap();
    }
}

/// Four courses across two programmes:
///
/// | course | programme | breadth | level | reviews    | lecture requisites |
/// |--------|-----------|---------|-------|------------|--------------------|
/// | CSC110 | CSC       | 5       | 100   | 0.8, 0.6   | none               |
/// | CSC111 | CSC       | 5       | 100   |            | CSC110             |
/// | CSC207 | CSC       |         | 200   |            | CSC111, MAT137     |
/// | MAT137 | MAT       | 5       | 100   | 0.9        | none               |
pub fn catalogue() -> CourseGraph {
    let mut graph = CourseGraph::new();
    add_course(&mut graph, "CSC110", &["CSC"], &["5"], Some("100"), &[0.8, 0.6]);
    add_course(&mut graph, "CSC111", &["CSC"], &["5"], Some("100"), &[]);
    add_course(&mut graph, "CSC207", &["CSC"], &[], Some("200"), &[]);
    add_course(&mut graph, "MAT137", &["MAT"], &["5"], Some("100"), &[0.9]);

    add_lecture(&mut graph, "CSC110-L0101", "CSC110", &[], &[]);
    add_lecture(&mut graph, "CSC111-L0101", "CSC111", &["CSC110"], &[]);
    add_lecture(&mut graph, "CSC207-L0101", "CSC207", &["CSC111"], &["MAT137"]);
    graph
}
