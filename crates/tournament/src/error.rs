//! Errors raised while assembling rosters, loading configuration and running
//! a bracket.

use creature_core::ArenaError;
use std::path::PathBuf;
use thiserror::Error;

use crate::trace::TournamentTrace;

/// A run that did not produce a champion.
///
/// Aborted and cancelled runs carry the trace of the rounds that completed so
/// the caller can show how far the bracket got. The partial trace never has a
/// champion.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("cannot run a tournament with an empty roster")]
    EmptyRoster,

    #[error("tournament aborted in round {round}, pair {pair}: {source}")]
    Aborted {
        round: u32,
        pair: usize,
        source: ArenaError,
        partial: Box<TournamentTrace>,
    },

    #[error("tournament cancelled after {completed_rounds} completed round(s)")]
    Cancelled {
        completed_rounds: u32,
        partial: Box<TournamentTrace>,
    },
}

impl TournamentError {
    /// Trace of the completed rounds, if the run got that far.
    pub fn partial_trace(&self) -> Option<&TournamentTrace> {
        match self {
            TournamentError::EmptyRoster => None,
            TournamentError::Aborted { partial, .. } => Some(partial),
            TournamentError::Cancelled { partial, .. } => Some(partial),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("entity {id} unavailable: {reason}")]
    Unavailable { id: u32, reason: String },

    #[error("only {found} of {requested} entities could be fetched from ids {min}..={max}")]
    Shortfall {
        requested: usize,
        found: usize,
        min: u32,
        max: u32,
    },

    #[error("failed to read fixture {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse fixture {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(#[from] ArenaError),

    #[error("unknown base chart '{0}' (expected \"standard\" or \"empty\")")]
    UnknownChart(String),
}

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("failed to access trace file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode or decode trace: {0}")]
    Json(#[from] serde_json::Error),
}
