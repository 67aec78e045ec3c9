//! Geometry classes a preset can apply to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structural kind of a mapped object.
///
/// Presets list the kinds they apply to; a preset never matches an object of
/// a kind it does not list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Geometry {
    /// A standalone node.
    Point,
    /// A node that is part of a way.
    Vertex,
    /// An open way.
    Line,
    /// A closed way or multipolygon.
    Area,
}

impl Geometry {
    /// Every geometry class, in wire order.
    pub const ALL: [Geometry; 4] = [
        Geometry::Point,
        Geometry::Vertex,
        Geometry::Line,
        Geometry::Area,
    ];

    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Geometry::Point => "point",
            Geometry::Vertex => "vertex",
            Geometry::Line => "line",
            Geometry::Area => "area",
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the four geometry names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown geometry `{0}` (expected point, vertex, line or area)")]
pub struct UnknownGeometry(pub String);

impl FromStr for Geometry {
    type Err = UnknownGeometry;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "point" => Ok(Geometry::Point),
            "vertex" => Ok(Geometry::Vertex),
            "line" => Ok(Geometry::Line),
            "area" => Ok(Geometry::Area),
            other => Err(UnknownGeometry(other.to_string())),
        }
    }
}
