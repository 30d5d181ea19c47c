//! # Workflows Module
//!
//! High-level entry points that drive a complete constraint-generation pass.
//!
//! ## Overview
//!
//! Workflows are the top-level API for users of ensys. A workflow takes a
//! declarative scenario description, builds the model behind it (commodities,
//! periods, locations, processes), registers and locates every operation, and
//! returns the finished [`Model`](crate::engine::model::Model) with its
//! populated constraint program.
//!
//! - **Build Workflow** ([`build`]) - Scenario construction from a
//!   name-based specification, including domain declarations and locating.

pub mod build;
