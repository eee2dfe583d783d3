pub mod config;
pub mod exercise;
pub mod run;
pub mod stats;
