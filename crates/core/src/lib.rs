//! Domain logic for the document template rendering pipeline.
//!
//! This crate has no internal dependencies so it can be used by the API,
//! the pipeline orchestrator, and any future worker or CLI tooling.

pub mod audit;
pub mod compiler;
pub mod context;
pub mod crypto;
pub mod document;
pub mod error;
pub mod roles;
pub mod sample;
pub mod signature;
pub mod template;
pub mod types;
