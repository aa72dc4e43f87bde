pub mod error;
mod plan;
mod template;

pub use crate::plan::{SummaryEntry, UploadPlan, UploadPlanner, UrlMapping};
pub use crate::template::NameGenerator;
pub use crate::template::{DEFAULT_TEMPLATE_MULTIPLE, DEFAULT_TEMPLATE_SINGLE, EXTENSION};
