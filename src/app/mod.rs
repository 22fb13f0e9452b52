pub mod dashboard;
pub mod pipelines;

pub use dashboard::{Dashboard, RunSummary, View, ViewOutcome};
