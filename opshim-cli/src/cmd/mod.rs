pub mod config;
pub mod invoke;
pub mod list;
pub mod resume;
pub mod show;
pub mod validate;
