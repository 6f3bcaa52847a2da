//! # EduQuest Common
//!
//! Common types and shared abstractions for the EduQuest combat core.
//!
//! This crate provides foundational types used across the combat subsystems:
//! - ID types (`ActorId`, `ProjectileId`)
//! - 2D math primitives (`Vec2`, `Facing`)
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod ids;
pub mod math;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::math::*;
}

pub use prelude::*;
