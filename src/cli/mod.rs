// Command-line front end for tagscan

pub mod commands;
pub mod config;
pub mod logger;
pub mod output;

pub use commands::run;
pub use config::Config;
