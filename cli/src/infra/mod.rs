//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, the
//! `aws`, `packer`, `terraform` and `ssh` CLIs, and config file access.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod aws;
pub mod command_runner;
pub mod config;
pub mod packer;
pub mod ssh;
pub mod terraform;

#[cfg(test)]
pub(crate) mod test_support;
