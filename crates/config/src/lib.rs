//! Configuration loading for albumcopy.
//!
//! Two kinds of configuration exist:
//!
//! - [`Credentials`]: one per remote service, read from a TOML file with a
//!   `[TOKEN]` table (`token`, `user_id`) and overridable per-key from the
//!   environment.
//! - [`RunConfig`]: where to upload, how many files, where to write the
//!   summary, and the file name templates. Every field has a default so a
//!   bare run needs no run config at all.
//!
//! Both are layered with [`figment`]; nothing is global, the loaded structs
//! are passed explicitly into the clients that need them.

mod credentials;
pub mod error;
mod run;

pub use crate::credentials::{Credentials, DESTINATION_ENV_PREFIX, SOURCE_ENV_PREFIX};
pub use crate::run::{NameTemplates, RunConfig};
