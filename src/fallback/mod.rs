//! Fallback resolution module for remote images.
//!
//! This module provides the `FallbackResolver` for turning one nominal
//! image reference into an ordered list of candidate URLs, and the
//! `FallbackChain` that walks those candidates as each one fails to
//! load. Exhaustion is a normal terminal state, never an error - "no
//! image available" is a displayable outcome.

pub mod resolver;

pub use resolver::{Advance, FallbackChain, FallbackResolver, LoadPhase};
