pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub mod app;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, Settings};
pub use crate::core::{catalog::Catalog, grid::TrackGrid, session::PlannerSession};
pub use utils::error::{MapError, Result};
