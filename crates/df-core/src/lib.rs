//! df-core: Level synthesis and connectivity guarantees for DungeonForge
//!
//! Turns an arbitrary candidate dungeon layout -- proposed by an external
//! content provider or built by the deterministic procedural fallback --
//! into a tile grid that is guaranteed playable: exactly one entrance, one
//! exit, a fully connected walkable region, and a sealed border.
//!
//! The crate is pure game logic with no I/O of its own; the only external
//! collaborator is the [`provider::CandidateProvider`] trait, which callers
//! implement against whatever transport they use.

pub mod error;
pub mod generation;
pub mod grid;
pub mod heal;
pub mod path;
pub mod provider;
pub mod synth;

mod consts;
mod rng;

pub use consts::*;
pub use rng::GenRng;
