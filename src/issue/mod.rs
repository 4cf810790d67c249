//! Per-user todo issue lists.
//!
//! Each chat user owns three ordered lists: `my` (the actionable queue),
//! `in` (issues received from other users and still pending), and `out`
//! (issues sent to other users and still pending at the receiver). Sending an
//! issue links a record in the receiver's queue with a tracking record on the
//! sender's side; popping the received issue retires both in one atomic unit.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
