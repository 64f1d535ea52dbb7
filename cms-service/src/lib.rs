pub mod bootstrap;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod pages;
pub mod startup;

pub use startup::{AppState, Application};
