//! Course graph store
//!
//! Owns every vertex in a dense arena with a separate item-key index.
//! Edges are undirected: each is recorded on both endpoints with the same
//! weight, and no vertex is ever its own neighbour.

use crate::vertex::{CourseLevel, Vertex, VertexData, VertexId, VertexKind, DEFAULT_EDGE_WEIGHT};
use coursegraph_common::errors::{GraphError, Result};
use coursegraph_common::metrics::record_graph_size;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};

/// Vertex counts per kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub vertices: BTreeMap<VertexKind, usize>,
    pub edges: usize,
}

/// In-memory course graph
#[derive(Debug, Clone, Default)]
pub struct CourseGraph {
    /// Vertex arena
    vertices: Vec<Vertex>,

    /// Item key -> arena index
    index: HashMap<String, VertexId>,
}

impl CourseGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex from a kind string.
    ///
    /// Repeated keys and unrecognized kinds are ignored, as are level and
    /// breadth keys whose attribute cannot be derived. Returns whether a
    /// vertex was inserted.
    pub fn add_vertex(&mut self, item: impl Into<String>, kind: &str) -> bool {
        let item = item.into();
        let kind: VertexKind = match kind.parse() {
            Ok(kind) => kind,
            Err(e) => {
                debug!(item = %item, error = %e, "Ignoring vertex");
                return false;
            }
        };

        match VertexData::for_key(kind, &item) {
            Ok(data) => self.insert_vertex(item, data),
            Err(message) => {
                debug!(item = %item, kind = %kind, error = %message, "Ignoring vertex");
                false
            }
        }
    }

    /// Add a vertex with explicit attributes. An existing key is left untouched.
    ///
    /// The arena holds at most `u32::MAX + 1` vertices; further inserts are
    /// refused.
    pub fn insert_vertex(&mut self, item: impl Into<String>, data: VertexData) -> bool {
        let item = item.into();
        if self.index.contains_key(&item) {
            debug!(item = %item, "Vertex already present");
            return false;
        }

        let Some(id) = VertexId::from_index(self.vertices.len()) else {
            warn!(item = %item, vertices = self.vertices.len(), "Vertex arena full");
            return false;
        };
        self.index.insert(item.clone(), id);
        self.vertices.push(Vertex::new(item, data));
        true
    }

    /// Add an edge with the default weight of 1
    pub fn add_edge(&mut self, item1: &str, item2: &str) -> Result<()> {
        self.add_weighted_edge(item1, item2, DEFAULT_EDGE_WEIGHT)
    }

    /// Add or overwrite an undirected edge between two existing vertices
    pub fn add_weighted_edge(&mut self, item1: &str, item2: &str, weight: f64) -> Result<()> {
        let a = self.require(item1)?;
        let b = self.require(item2)?;

        if a == b {
            return Err(GraphError::SelfLoop { item: item1.to_string() });
        }
        if !weight.is_finite() {
            return Err(GraphError::InvalidAttribute {
                item: item1.to_string(),
                message: format!("edge weight to {} must be finite, got {}", item2, weight),
            });
        }

        self.vertices[a.index()].connect(b, weight);
        self.vertices[b.index()].connect(a, weight);
        Ok(())
    }

    /// Whether both vertices exist and share an edge
    pub fn adjacent(&self, item1: &str, item2: &str) -> bool {
        self.weight(item1, item2).is_some()
    }

    /// Weight of the edge between two vertices, if any
    pub fn weight(&self, item1: &str, item2: &str) -> Option<f64> {
        let a = self.vertex_id(item1)?;
        let b = self.vertex_id(item2)?;
        self.get(a).weight_to(b)
    }

    /// Item keys adjacent to `item`
    pub fn get_neighbours(&self, item: &str) -> Result<HashSet<&str>> {
        let vertex = self.require_vertex(item)?;
        Ok(self.neighbours(vertex).map(|(n, _)| n.item()).collect())
    }

    /// All item keys, or those of one kind. An empty filter matches
    /// everything; an unrecognized kind matches nothing.
    pub fn get_all_vertices(&self, kind: &str) -> HashSet<&str> {
        if kind.is_empty() {
            return self.index.keys().map(String::as_str).collect();
        }
        match kind.parse::<VertexKind>() {
            Ok(kind) => self.vertices_of(kind).map(Vertex::item).collect(),
            Err(_) => HashSet::new(),
        }
    }

    /// Vertices of one kind, in insertion order
    pub fn vertices_of(&self, kind: VertexKind) -> impl Iterator<Item = &Vertex> + '_ {
        self.vertices.iter().filter(move |v| v.kind() == kind)
    }

    /// Every vertex with its arena id, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .filter_map(|(i, v)| VertexId::from_index(i).map(|id| (id, v)))
    }

    /// Weighted neighbours of a vertex owned by this graph
    pub fn neighbours<'a>(&'a self, vertex: &'a Vertex) -> impl Iterator<Item = (&'a Vertex, f64)> + 'a {
        vertex.neighbour_ids().map(move |(id, weight)| (self.get(id), weight))
    }

    /// Neighbours of a vertex restricted to one kind
    pub fn neighbours_of_kind<'a>(
        &'a self,
        vertex: &'a Vertex,
        kind: VertexKind,
    ) -> impl Iterator<Item = (&'a Vertex, f64)> + 'a {
        self.neighbours(vertex).filter(move |(n, _)| n.kind() == kind)
    }

    /// The level band of a course with exactly one `course_level` neighbour
    pub fn course_level(&self, course: &Vertex) -> Option<CourseLevel> {
        let mut levels = self
            .neighbours_of_kind(course, VertexKind::CourseLevel)
            .filter_map(|(n, _)| n.level());
        match (levels.next(), levels.next()) {
            (Some(level), None) => Some(level),
            _ => None,
        }
    }

    pub fn vertex(&self, item: &str) -> Option<&Vertex> {
        self.vertex_id(item).map(|id| self.get(id))
    }

    pub fn vertex_id(&self, item: &str) -> Option<VertexId> {
        self.index.get(item).copied()
    }

    /// Vertex by arena id.
    ///
    /// Ids are only handed out by this graph, so a foreign id is a caller bug.
    pub fn get(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    pub fn kind(&self, item: &str) -> Option<VertexKind> {
        self.vertex(item).map(Vertex::kind)
    }

    pub fn contains(&self, item: &str) -> bool {
        self.index.contains_key(item)
    }

    pub fn degree(&self, item: &str) -> Result<usize> {
        Ok(self.require_vertex(item)?.degree())
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Append a review score to a course
    pub fn record_review(&mut self, course: &str, score: f64) -> Result<()> {
        if !score.is_finite() || score < 0.0 {
            return Err(GraphError::InvalidAttribute {
                item: course.to_string(),
                message: format!("review score must be finite and non-negative, got {}", score),
            });
        }
        match self.require_mut(course)?.data_mut() {
            VertexData::Course { reviews } => {
                reviews.push(score);
                Ok(())
            }
            other => Err(kind_mismatch(course, VertexKind::Course, other.kind())),
        }
    }

    /// Record a prerequisite course code on a lecture
    pub fn add_prerequisite(&mut self, lecture: &str, code: impl Into<String>) -> Result<()> {
        match self.require_mut(lecture)?.data_mut() {
            VertexData::Lecture { prerequisites, .. } => {
                prerequisites.insert(code.into());
                Ok(())
            }
            other => Err(kind_mismatch(lecture, VertexKind::Lecture, other.kind())),
        }
    }

    /// Record a corequisite course code on a lecture
    pub fn add_corequisite(&mut self, lecture: &str, code: impl Into<String>) -> Result<()> {
        match self.require_mut(lecture)?.data_mut() {
            VertexData::Lecture { corequisites, .. } => {
                corequisites.insert(code.into());
                Ok(())
            }
            other => Err(kind_mismatch(lecture, VertexKind::Lecture, other.kind())),
        }
    }

    /// Count vertices per kind and edges
    pub fn summary(&self) -> GraphSummary {
        let mut vertices = BTreeMap::new();
        let mut degree_sum = 0;
        for vertex in &self.vertices {
            *vertices.entry(vertex.kind()).or_insert(0) += 1;
            degree_sum += vertex.degree();
        }
        GraphSummary {
            vertices,
            edges: degree_sum / 2,
        }
    }

    /// Publish per-kind vertex gauges
    pub fn report_metrics(&self) {
        let summary = self.summary();
        for kind in VertexKind::ALL {
            let count = summary.vertices.get(&kind).copied().unwrap_or(0);
            record_graph_size(count, kind.as_str());
        }
    }

    fn require(&self, item: &str) -> Result<VertexId> {
        self.vertex_id(item)
            .ok_or_else(|| GraphError::unknown_vertex(item))
    }

    fn require_vertex(&self, item: &str) -> Result<&Vertex> {
        self.require(item).map(|id| self.get(id))
    }

    fn require_mut(&mut self, item: &str) -> Result<&mut Vertex> {
        let id = self.require(item)?;
        Ok(&mut self.vertices[id.index()])
    }
}

fn kind_mismatch(item: &str, expected: VertexKind, found: VertexKind) -> GraphError {
    GraphError::KindMismatch {
        item: item.to_string(),
        expected: expected.to_string(),
        found: found.to_string(),
    }
}
