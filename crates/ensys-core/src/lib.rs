//! # ensys Core Library
//!
//! A constraint-generation core for energy system optimization models. Users
//! declare abstract operations (conversion processes that turn one commodity
//! into another) without fixing where or when they run; this library
//! instantiates those declarations into concrete, space- and time-indexed
//! linear-programming constraints while guaranteeing that no bounding or
//! balance constraint is ever emitted twice.
//!
//! ## Architectural Philosophy
//!
//! The library is built as a strict three-layer stack:
//!
//! - **[`core`]: The Foundation.** Stateless data models: typed handles for
//!   commodities, spaces and time periods, and the [`core::models::system::System`]
//!   registry that owns them.
//!
//! - **[`engine`]: The Logic Core.** The stateful constraint-generation layer:
//!   aspects with their bound and disposition bookkeeping, conversions with
//!   their mode-balancing algorithm, the operation lifecycle, and the
//!   [`engine::program::Program`] sink that records every emitted constraint.
//!
//! - **[`workflows`]: The Public API.** A thin, declarative entry point that
//!   drives a complete scenario in a single call: registering commodities,
//!   processes and domains, then locating every operation.
//!
//! The library never solves anything: it produces a structured constraint
//! program for an external solver backend to consume.

pub mod core;
pub mod engine;
pub mod workflows;
