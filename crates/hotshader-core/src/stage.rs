//! Shader stage kinds and the per-stage slices cut out of a composite source.

use std::fmt;

/// One compilation unit of a linked program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageKind {
    Vertex,
    Geometry,
    Fragment,
    Compute,
}

impl StageKind {
    /// Every stage kind, in marker-search order.
    pub const ALL: [StageKind; 4] = [
        StageKind::Vertex,
        StageKind::Geometry,
        StageKind::Fragment,
        StageKind::Compute,
    ];

    /// The bare marker that opens this stage's section in a composite source.
    pub const fn keyword(self) -> &'static str {
        match self {
            StageKind::Vertex => "VERTEX",
            StageKind::Geometry => "GEOMETRY",
            StageKind::Fragment => "FRAGMENT",
            StageKind::Compute => "COMPUTE",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A stage kind paired with the text of its section.
///
/// Borrowed from the composite source and consumed right away by the compile
/// pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSlice<'a> {
    pub kind: StageKind,
    pub source: &'a str,
}
