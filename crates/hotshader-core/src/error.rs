//! Error taxonomy for loading, building and reloading shaders.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::stage::StageKind;

/// Compiler output for one stage that failed to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    pub stage: StageKind,
    pub log: String,
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} shader compilation failed\n{}", self.stage, self.log)
    }
}

/// Everything that can go wrong while building or reloading a shader.
///
/// All variants are recoverable: the shader keeps its last good program.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("could not open file {}: {source}", .path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not read last write time of {}: {source}", .path.display())]
    Timestamp {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("INCLUDE directive without a quoted path in {}", .path.display())]
    MalformedInclude { path: PathBuf },

    #[error("INCLUDE nesting deeper than {limit} levels at {}", .path.display())]
    IncludeDepth { path: PathBuf, limit: usize },

    #[error("source is empty")]
    EmptySource,

    #[error("no stage marker (VERTEX, GEOMETRY, FRAGMENT, COMPUTE) found")]
    NoStages,

    #[error("{}", join_failures(.0))]
    StageCompile(Vec<StageFailure>),

    #[error("program linking failed\n{log}")]
    Link { log: String },

    #[error("inactive uniform = {name}")]
    UniformNotActive { name: String },

    #[error("shader was not loaded from a file and cannot be reloaded")]
    ReloadNotApplicable,
}

fn join_failures(failures: &[StageFailure]) -> String {
    failures
        .iter()
        .map(StageFailure::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl ShaderError {
    /// Stages whose compilation failed, if this is a compile error.
    pub fn failed_stages(&self) -> Vec<StageKind> {
        match self {
            ShaderError::StageCompile(failures) => failures.iter().map(|f| f.stage).collect(),
            _ => Vec::new(),
        }
    }
}
