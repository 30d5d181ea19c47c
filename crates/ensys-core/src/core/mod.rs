//! # Core Module
//!
//! Fundamental building blocks for describing an energy system as a
//! resource-task network: commodities, spatial nodes and edges, temporal
//! discretizations, and the registry that ties them together.
//!
//! Everything in this layer is plain data. The constraint-generation logic
//! that consumes these models lives in [`crate::engine`].

pub mod models;
