//! Change notification adapters

pub mod broadcast;
