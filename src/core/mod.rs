//! Core abstractions: hardware traits and shared types

pub mod hal;
pub mod types;
