//! Vote store adapters

pub mod memory;
