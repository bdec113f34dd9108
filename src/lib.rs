#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod assets;
pub mod compatibility;
pub mod config;
pub mod connection_manager;
pub mod db;
pub mod error;
pub mod session;
pub mod surface;
pub use app::App;
