//! GL-free building blocks for hot-reloadable shader programs.
//!
//! A shader program is authored as one *composite source*: a text blob with
//! bare stage markers (`VERTEX`, `GEOMETRY`, `FRAGMENT`, `COMPUTE`) and
//! optional `INCLUDE "path"` directives. This crate turns such a blob into
//! per-stage sources:
//!
//! - [`source::load_source`] reads a file through a [`SourceFs`] and splices
//!   in included files.
//! - [`split::split_stages`] cuts the composite text into [`StageSlice`]s.
//!
//! ### Warning
//!
//! Marker scanning is purely textual. A marker word inside a comment or a
//! string literal is taken as a real stage boundary.

pub mod error;
pub mod logging;
pub mod origin;
pub mod source;
pub mod split;
pub mod stage;

pub use error::{ShaderError, StageFailure};
pub use origin::SourceOrigin;
pub use source::{load_source, MemoryFs, SourceFs, StdFs};
pub use split::split_stages;
pub use stage::{StageKind, StageSlice};
