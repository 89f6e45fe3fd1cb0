//! Database entities

pub mod app;
pub mod entity;

pub use app::Entity as App;
pub use entity::Entity as ConsoleEntity;
