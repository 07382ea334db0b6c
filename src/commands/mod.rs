//! Command implementations for the bundlekit CLI

pub mod cache;
pub mod completions;
pub mod list;
pub mod load;
pub mod mentions;
pub mod register;
