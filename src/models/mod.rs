//! Per-request domain records.

pub mod job;

pub use job::{ConversionJob, JobStatus};
