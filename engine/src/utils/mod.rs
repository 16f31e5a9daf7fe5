//! Utility functions for the engine and CLI

pub mod file;
pub mod json;
