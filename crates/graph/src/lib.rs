//! CourseGraph store
//!
//! A weighted, undirected graph whose vertices are courses, programmes,
//! lecture sections, breadth requirements, course levels, and users.
//! Built once by a loader, then read concurrently by rankers.

mod graph;
mod vertex;

pub use graph::{CourseGraph, GraphSummary};
pub use vertex::{
    BreadthCategory, CourseLevel, UnknownKind, Vertex, VertexData, VertexId, VertexKind,
    DEFAULT_EDGE_WEIGHT,
};
