pub mod election;
pub mod etl;
pub mod health;
pub mod sports;
pub mod stock;

pub use crate::domain::ports::{DataSource, Pipeline, Storage};
pub use crate::utils::error::Result;
