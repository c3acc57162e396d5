pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod services;

pub use config::Config;
pub use domain::error::VerifyError;
