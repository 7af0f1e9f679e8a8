pub mod config;
pub mod recording;
pub mod runner;
