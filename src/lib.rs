pub mod api;
pub mod app;
pub mod audio;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod error;
pub mod history;
pub mod identity;
pub mod models;
pub mod ui;

pub use app::run;
