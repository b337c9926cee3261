// core/src/flow/mod.rs

//! A small async step pipeline.
//!
//! A `Pipeline<TData, Err>` is an ordered list of named steps. Each step carries
//! `before`, `on` and `after` handlers that receive a shared [`ContextData<TData>`]
//! and answer with a [`PipelineControl`]. The cart flows are built on it: every
//! stage of an add-to-cart request (validation, product lookup, line upsert,
//! quick-cache refresh) is a named step, so the order of side effects is visible
//! in one place and each stage logs under its own span.

pub mod context_data;
pub mod control;
pub mod definition;
pub mod execution;

pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use definition::{Handler, Pipeline, SkipCondition, StepDef};
