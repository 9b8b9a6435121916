//! Knowledge record model shared by the store, controller and API adapters.
//!
//! # Responsibility
//! - Define the wire/domain shape of one knowledge article.
//! - Own draft validation and creation-time stamping rules.
//!
//! # Invariants
//! - `id` is assigned by the remote collection, never invented client-side.
//! - Any payload the client submits has a non-blank title.

pub mod knowledge;
