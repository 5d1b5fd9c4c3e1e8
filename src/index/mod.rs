//! Prefix index maintenance.

pub mod manager;

pub use manager::IndexManager;
