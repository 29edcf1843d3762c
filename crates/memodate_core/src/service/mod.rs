//! Use-case services orchestrating cross-entity operations.
//!
//! # Responsibility
//! - Keep the CLI decoupled from repository wiring.
//! - Own the cross-entity flows: celebration registration and cascade
//!   deletes.
//!
//! # Invariants
//! - Services never bypass repository contracts.
//! - `NotFound` errors pass through to callers unchanged.

pub mod celebration_service;
pub mod event_service;
