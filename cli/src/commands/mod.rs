//! Command implementations

pub mod config;
pub mod regions;
pub mod run;
