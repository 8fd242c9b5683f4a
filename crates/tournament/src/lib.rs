//! Single-elimination creature tournament.
//!
//! This crate provides:
//! - The bracket engine ([`Bracket`], [`run_tournament`]) built on the battle
//!   resolver from `creature_core`
//! - Full tournament traces with JSON persistence and a text report
//! - Entity providers for assembling rosters
//! - TOML arena configuration for weights and matchup overrides
//!
//! # Usage
//!
//! ```bash
//! # Eight random creatures from a fixture file, reproducible
//! cargo run -p tournament -- run --fixture crates/tournament/fixtures/kanto_sample.json --seed 7
//!
//! # Synthetic roster with custom weights, trace saved for later
//! cargo run -p tournament -- run --generate --count 16 --weight attack=3 --out run.json
//! cargo run -p tournament -- report run.json
//! ```

mod bracket;
mod config;
mod control;
mod error;
mod provider;
mod trace;

pub use bracket::*;
pub use config::*;
pub use control::*;
pub use error::*;
pub use provider::*;
pub use trace::*;

pub use creature_core;
