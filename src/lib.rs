//! Layered configuration resolution library
//!
//! This module exports the resolution engine and its CLI front end for
//! testing and integration.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
