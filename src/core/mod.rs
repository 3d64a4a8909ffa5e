//! Core domain models for docship
//!
//! This module defines the data structures that represent jobs, stages,
//! trigger gates, and their configuration.

pub mod config;
pub mod job;
pub mod stage;
pub mod state;
pub mod trigger;

pub use job::*;
pub use stage::*;
pub use state::*;
pub use trigger::*;
