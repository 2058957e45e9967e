pub mod etl;
pub mod graph;
pub mod runner;
pub mod transform;

pub use crate::domain::model::{PipelineResult, Record};
pub use crate::domain::ports::{ConfigProvider, Runner, Storage, Warehouse};
pub use crate::utils::error::Result;
