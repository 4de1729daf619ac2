//! # solvr-core
//!
//! Core types and pure state for the solvr marketplace client.
//!
//! This crate provides the foundational pieces shared across all solvr crates:
//! - Entity structs for chat messages, briefs, assignment payloads, and matched solvers
//! - Status enums with state machine transitions
//! - ID prefix constants and sequence allocation
//! - The cross-cutting error taxonomy
//! - The append-only [`MessageLog`](log::MessageLog)
//! - The replace-only, versioned [`BriefState`](brief::BriefState)
//! - Normalization helpers for deadlines, skills, and prices

pub mod brief;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod log;
pub mod normalize;

pub use errors::CoreError;
