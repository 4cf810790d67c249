//! Todobot: per-user todo lists for a chat platform.
//!
//! Each user owns a queue of short text issues, can add to it, pop from the
//! front, and send an issue to another user. A send links a record in the
//! receiver's queue with a tracking record in the sender's sent list, and both
//! sides stay consistent when the receiver pops it.
//!
//! # Architecture
//!
//! Todobot follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, memory)
//!
//! # Modules
//!
//! - [`issue`]: Issue lists, the `/todo` command layer, and their adapters
//! - [`config`]: Environment and JSON configuration
//! - [`bootstrap`]: Building the shared repository handle at startup
//! - [`telemetry`]: `tracing` subscriber setup

pub mod bootstrap;
pub mod config;
pub mod issue;
pub mod telemetry;
