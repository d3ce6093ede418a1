//! Core shared errors for mesh loading (renderer-agnostic).

use std::{fmt, io};

use thiserror::Error;

/// Kind of OBJ directive a diagnostic refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    Position,
    TexCoord,
    Face,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LineKind::Position => "v",
            LineKind::TexCoord => "vt",
            LineKind::Face => "f",
        })
    }
}

/// Per-vertex attribute a face corner points into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attribute {
    Position,
    TexCoord,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Attribute::Position => "position",
            Attribute::TexCoord => "texture coordinate",
        })
    }
}

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("Cannot read mesh source '{name}': {source}")]
    SourceUnavailable {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("{name}:{line}: malformed '{kind}' line: {reason}")]
    MalformedInput {
        name: String,
        line: usize,
        kind: LineKind,
        reason: String,
    },

    /// `index` is the 1-based value as written in the file.
    #[error("{name}:{line}: {attribute} index {index} out of range (1..={available})")]
    IndexOutOfRange {
        name: String,
        line: usize,
        attribute: Attribute,
        index: u64,
        available: usize,
    },
}

impl MeshError {
    /// Source line the error points at, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            MeshError::SourceUnavailable { .. } => None,
            MeshError::MalformedInput { line, .. } | MeshError::IndexOutOfRange { line, .. } => {
                Some(*line)
            }
        }
    }
}

pub type MeshResult<T> = Result<T, MeshError>;
