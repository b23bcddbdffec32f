pub mod api;
pub mod archive;
pub mod config;
pub mod context;
pub mod core;
pub mod logging;
pub mod setup;
