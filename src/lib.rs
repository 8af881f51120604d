//! Claims triage pipeline
//!
//! Turns a free-text insurance claim document into a validated structured
//! record plus a grounded generated summary: extract with a generative model,
//! repair/validate the output against a fixed schema, retrieve relevant
//! policy snippets, and generate a summary conditioned on both.

pub mod generation;
pub mod model;
pub mod prompt;
pub mod service;
pub mod store;
