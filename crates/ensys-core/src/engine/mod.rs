//! # Engine Module
//!
//! The stateful constraint-generation layer. It owns the bookkeeping that
//! guarantees idempotent constraint emission and the algorithms that turn
//! abstract operation declarations into concrete constraints:
//!
//! - **Configuration** ([`config`]) - Model-level names and settings
//! - **Errors** ([`error`]) - The engine error taxonomy
//! - **Program** ([`program`]) - The solver-facing constraint sink and the
//!   `sample(space, time)` variable accessor
//! - **Aspects** ([`aspect`]) - Per-aspect bound, disposition, and domain tables
//! - **Conversions** ([`conversion`]) - Mode coefficient maps and balancing
//! - **Operations** ([`operation`]) - The operation data model and its variants
//! - **Model** ([`model`]) - The single owner of all shared state, and the
//!   attach / bound-check / locate lifecycle
//!
//! All state is process-wide and single-writer: the engine has no internal
//! synchronization, and callers that ever parallelize model construction must
//! serialize access themselves.

pub mod aspect;
pub mod config;
pub mod conversion;
pub mod error;
pub mod model;
pub mod operation;
pub mod program;
