//! Configuration sources, lowest precedence first.

pub mod environment;
pub mod global_file;
pub mod working_dir_file;
