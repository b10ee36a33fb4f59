//! Application layer containing the workflow orchestration.
//!
//! This module defines the `WorkflowService` which acts as the primary entry
//! point for submitted actions. It owns the registry, directory and event-bus
//! ports and applies one transition at a time.

pub mod service;
