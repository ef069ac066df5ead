//! Error types for evo-archipelago
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Error type for snapshot persistence
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// IO error while reading or writing a snapshot
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Snapshot version is newer than this build understands
    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    /// Snapshot file not found
    #[error("Snapshot not found: {0}")]
    NotFound(String),

    /// Snapshot content is inconsistent with the target problem
    #[error("Corrupted snapshot: {0}")]
    Corrupted(String),
}

/// Top-level error type for island and archipelago operations
#[derive(Debug, Error)]
pub enum EvolutionError {
    /// An argument was rejected at construction or mutation time
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Index outside of the addressed sequence
    #[error("Index {index} out of range (size {size})")]
    OutOfRange { index: usize, size: usize },

    /// Access to an island with an evolution that has not been joined yet
    #[error("Busy: {0}")]
    Busy(String),

    /// The algorithm failed (or panicked) while evolving a population
    #[error("Algorithm failure: {0}")]
    AlgorithmFailure(String),

    /// Snapshot persistence error
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

impl EvolutionError {
    /// Returns true for errors caused by an unjoined evolution
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy(_))
    }
}

/// Result type alias for evolution operations
pub type EvoResult<T> = Result<T, EvolutionError>;
