pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, ViewCommand};

pub use adapters::LocalStorage;
pub use app::{Dashboard, View};
pub use config::DashboardConfig;
pub use core::etl::EtlEngine;
pub use utils::error::{DashboardError, Result};
