//! Vertex model
//!
//! Every vertex carries a kind tag and only the attributes of that kind.
//! Adjacency is stored as weighted edges between arena indices.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default edge weight when the loader does not supply one
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

/// Index of a vertex inside its owning graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub(crate) u32);

impl VertexId {
    /// Id for an arena slot; `None` past `u32::MAX` vertices
    pub(crate) fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(VertexId)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Discriminator fixing a vertex's role and attribute set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexKind {
    /// A university course
    Course,
    /// A programme (subject area) offering courses
    Programme,
    /// A level band such as 200 or 100/200
    CourseLevel,
    /// One of the five breadth requirement categories
    BreadthReq,
    /// An instructor or lecture section
    Lecture,
    /// A student or reviewer
    User,
}

impl VertexKind {
    /// All recognized kinds
    pub const ALL: [VertexKind; 6] = [
        VertexKind::Course,
        VertexKind::Programme,
        VertexKind::CourseLevel,
        VertexKind::BreadthReq,
        VertexKind::Lecture,
        VertexKind::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VertexKind::Course => "course",
            VertexKind::Programme => "programme",
            VertexKind::CourseLevel => "course_level",
            VertexKind::BreadthReq => "breadth_req",
            VertexKind::Lecture => "lecture",
            VertexKind::User => "user",
        }
    }
}

impl fmt::Display for VertexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind string outside the recognized set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized vertex kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for VertexKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "course" => Ok(VertexKind::Course),
            "programme" => Ok(VertexKind::Programme),
            "course_level" => Ok(VertexKind::CourseLevel),
            "breadth_req" => Ok(VertexKind::BreadthReq),
            // older datasets call lecture sections "professor"
            "lecture" | "professor" => Ok(VertexKind::Lecture),
            "user" => Ok(VertexKind::User),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// Course level band.
///
/// Single bands are 100, 200, 300 and 400. A combined band such as
/// "100/200" is stored as its midpoint (150).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct CourseLevel(u16);

impl CourseLevel {
    pub const BANDS: [u16; 4] = [100, 200, 300, 400];
    const STEP: u16 = 100;

    /// A single band; `None` unless `band` is one of `BANDS`
    pub fn new(band: u16) -> Option<Self> {
        Self::BANDS.contains(&band).then_some(CourseLevel(band))
    }

    /// A combined band spanning two consecutive single bands
    pub fn combined(lower: u16, upper: u16) -> Option<Self> {
        let lower = Self::new(lower)?;
        let upper = Self::new(upper)?;
        (upper.0 == lower.0 + Self::STEP).then_some(CourseLevel(lower.0 + Self::STEP / 2))
    }

    pub fn value(self) -> u16 {
        self.0
    }

    pub fn is_combined(self) -> bool {
        self.0 % Self::STEP != 0
    }

    /// The band directly above this one. 400 has none; there is no wraparound.
    pub fn successor(self) -> Option<Self> {
        let next = self.0.checked_add(Self::STEP)?;
        (next <= Self::BANDS[Self::BANDS.len() - 1]).then_some(CourseLevel(next))
    }
}

impl TryFrom<u16> for CourseLevel {
    type Error = String;

    /// Accepts a single band or the midpoint of two consecutive bands
    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let half = Self::STEP / 2;
        CourseLevel::new(value)
            .or_else(|| {
                let lower = value.checked_sub(half)?;
                CourseLevel::combined(lower, lower.checked_add(Self::STEP)?)
            })
            .ok_or_else(|| format!("unknown level band {}", value))
    }
}

impl From<CourseLevel> for u16 {
    fn from(level: CourseLevel) -> Self {
        level.0
    }
}

impl fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_combined() {
            let lower = self.0 - Self::STEP / 2;
            write!(f, "{}/{}", lower, lower + Self::STEP)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for CourseLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<u16>()
                .map_err(|e| format!("invalid level band {:?}: {}", part, e))
        };

        let level = match s.split_once('/') {
            Some((lower, upper)) => CourseLevel::combined(parse(lower)?, parse(upper)?),
            None => CourseLevel::new(parse(s)?),
        };

        level.ok_or_else(|| format!("unknown level band {:?}", s))
    }
}

/// Breadth requirement category, 1 through 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BreadthCategory(u8);

impl BreadthCategory {
    pub fn new(category: u8) -> Option<Self> {
        (1..=5).contains(&category).then_some(BreadthCategory(category))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for BreadthCategory {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        BreadthCategory::new(value).ok_or_else(|| format!("breadth category {} outside 1..=5", value))
    }
}

impl From<BreadthCategory> for u8 {
    fn from(category: BreadthCategory) -> Self {
        category.0
    }
}

impl FromStr for BreadthCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let category = s
            .trim()
            .parse::<u8>()
            .map_err(|e| format!("invalid breadth category {:?}: {}", s, e))?;
        BreadthCategory::try_from(category)
    }
}

/// Kind-specific vertex attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VertexData {
    Course {
        /// One score per evaluation record
        reviews: Vec<f64>,
    },
    Programme,
    CourseLevel {
        level: CourseLevel,
    },
    BreadthReq {
        category: BreadthCategory,
    },
    Lecture {
        prerequisites: BTreeSet<String>,
        corequisites: BTreeSet<String>,
    },
    User,
}

impl VertexData {
    pub fn course() -> Self {
        VertexData::Course { reviews: Vec::new() }
    }

    pub fn lecture() -> Self {
        VertexData::Lecture {
            prerequisites: BTreeSet::new(),
            corequisites: BTreeSet::new(),
        }
    }

    pub fn kind(&self) -> VertexKind {
        match self {
            VertexData::Course { .. } => VertexKind::Course,
            VertexData::Programme => VertexKind::Programme,
            VertexData::CourseLevel { .. } => VertexKind::CourseLevel,
            VertexData::BreadthReq { .. } => VertexKind::BreadthReq,
            VertexData::Lecture { .. } => VertexKind::Lecture,
            VertexData::User => VertexKind::User,
        }
    }

    /// Build attributes for `kind`, deriving level and category from the item key
    pub fn for_key(kind: VertexKind, item: &str) -> Result<Self, String> {
        Ok(match kind {
            VertexKind::Course => VertexData::course(),
            VertexKind::Programme => VertexData::Programme,
            VertexKind::CourseLevel => VertexData::CourseLevel { level: item.parse()? },
            VertexKind::BreadthReq => VertexData::BreadthReq { category: item.parse()? },
            VertexKind::Lecture => VertexData::lecture(),
            VertexKind::User => VertexData::User,
        })
    }
}

/// A typed node owned by a `CourseGraph`
#[derive(Debug, Clone)]
pub struct Vertex {
    item: String,
    data: VertexData,
    neighbours: HashMap<VertexId, f64>,
}

impl Vertex {
    pub(crate) fn new(item: String, data: VertexData) -> Self {
        Self {
            item,
            data,
            neighbours: HashMap::new(),
        }
    }

    pub fn item(&self) -> &str {
        &self.item
    }

    pub fn kind(&self) -> VertexKind {
        self.data.kind()
    }

    pub fn data(&self) -> &VertexData {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut VertexData {
        &mut self.data
    }

    pub fn degree(&self) -> usize {
        self.neighbours.len()
    }

    /// Weighted neighbours as arena ids
    pub fn neighbour_ids(&self) -> impl Iterator<Item = (VertexId, f64)> + '_ {
        self.neighbours.iter().map(|(&id, &weight)| (id, weight))
    }

    pub(crate) fn weight_to(&self, other: VertexId) -> Option<f64> {
        self.neighbours.get(&other).copied()
    }

    pub(crate) fn connect(&mut self, other: VertexId, weight: f64) {
        self.neighbours.insert(other, weight);
    }

    /// Recorded review scores; empty for anything but a course
    pub fn reviews(&self) -> &[f64] {
        match &self.data {
            VertexData::Course { reviews } => reviews,
            _ => &[],
        }
    }

    /// Prerequisite and corequisite codes of a lecture; empty otherwise
    pub fn requisites(&self) -> impl Iterator<Item = &str> + '_ {
        let sets = match &self.data {
            VertexData::Lecture { prerequisites, corequisites } => Some((prerequisites, corequisites)),
            _ => None,
        };
        sets.into_iter()
            .flat_map(|(pre, co)| pre.iter().chain(co.iter()))
            .map(String::as_str)
    }

    pub fn level(&self) -> Option<CourseLevel> {
        match self.data {
            VertexData::CourseLevel { level } => Some(level),
            _ => None,
        }
    }

    pub fn breadth_category(&self) -> Option<BreadthCategory> {
        match self.data {
            VertexData::BreadthReq { category } => Some(category),
            _ => None,
        }
    }
}
