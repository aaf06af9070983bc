//! Device implementations behind the hardware abstraction traits
//!
//! Real hub, motor, and remote access lives in the vendor platform; this
//! crate ships the mock suite used for hardware-free runs and unit tests.

#[cfg(any(test, feature = "mock"))]
pub mod mock;
