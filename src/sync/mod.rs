//! Synchronization primitives used to signal thread completion.

pub mod promise;

pub use promise::Promise;
