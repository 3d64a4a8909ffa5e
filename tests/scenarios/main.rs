//! Scenario-based tests for docship

mod helpers;

mod failure_handling;
mod success_chain;
mod trigger_gate;
