pub mod etl;
pub mod extract;
pub mod pipeline;
pub mod query;
pub mod transform;

pub use crate::domain::model::{GdpTable, RawTable, Record, Table};
pub use crate::domain::ports::{PageSource, Pipeline, Storage};
pub use crate::utils::error::Result;
