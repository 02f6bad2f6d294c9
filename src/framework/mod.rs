//! Generic actor framework for resource management.
//!
//! This module provides the building blocks for the typed actor that owns
//! the order store: the [`ActorEntity`] trait, the [`ResourceActor`]
//! message loop, and the [`ResourceClient`] used by the domain clients.
//!
//! # Testing
//!
//! See [`mock`] for utilities to test clients without spawning full actors.

pub mod core;
pub mod mock;

pub use self::core::*;
