// src/output/mod.rs
//! Output handling with separate planning and execution.
//!
//! A run builds an [`OutputPlan`] of [`DeliveryTarget`]s and hands it to
//! [`deliver`], the only place that touches stdout or the filesystem.

mod types;
mod writer;

pub use types::{
    CompletedOperation, DeliveryTarget, ExecutionStats, FailedOperation, OutputPlan, OutputReport,
};
pub use writer::deliver;
