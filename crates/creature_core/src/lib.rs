//! Creature model and battle resolution.
//!
//! The pieces a tournament needs to decide a single contest:
//! - [`Entity`]: an immutable creature with tags and numeric attributes
//! - [`WeightConfig`] / [`Weights`]: per-stat coefficients for the battle score
//! - [`EffectivenessTable`]: tag-vs-tag multipliers
//! - [`resolve`]: scores both sides with randomness and critical hits and
//!   returns a full [`BattleOutcome`]
//!
//! Randomness always comes in through [`RandomSource`], never from a global
//! generator.

pub mod battle;
pub mod effectiveness;
pub mod entity;
pub mod error;
pub mod rng;
pub mod types;
pub mod weights;

pub use battle::*;
pub use effectiveness::{EffectivenessTable, Matchup, STANDARD_TAGS};
pub use entity::{Entity, RawEntityRecord};
pub use error::ArenaError;
pub use rng::{RandomSource, ScriptedRandom};
pub use types::*;
pub use weights::{SharedWeights, WeightConfig, Weights};
