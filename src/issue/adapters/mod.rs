//! Adapter implementations for issue list ports.

pub mod memory;
pub mod postgres;
