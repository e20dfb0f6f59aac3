//! Core implementation: value model, text format and the disk-backed table

pub mod cell;
pub mod config;
pub mod document;
pub mod encoding;
pub mod error;
pub mod escape;
pub mod file_table;
pub mod row;
