pub mod backend;
pub mod error;
mod manifest;
mod name;
mod store;

pub use crate::backend::DestinationBackend;
pub use crate::manifest::Manifest;
pub use crate::name::{validate_folder, validate_name};
pub use crate::store::{CopyEvent, CopyReport, DestinationStore, FolderStatus};
use std::sync::Arc;

pub type BackendHandle = Arc<dyn DestinationBackend + Send + Sync>;
