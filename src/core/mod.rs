pub mod catalog;
pub mod export;
pub mod grid;
pub mod profiles;
pub mod session;

pub use crate::domain::levels::LevelId;
pub use crate::domain::model::{CatalogItem, PlacedItem, Profile, ProfileState, Track};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
