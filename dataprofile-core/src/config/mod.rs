//! Configuration types for the connection core.
//!
//! This module contains the inputs a caller hands to the flavor layer:
//! - `ConnectionParameters`: the connection record for one target database
//! - `PortValue`: a port as stored upstream (integer or fixed-width string)
//! - `EngineSettings`: caller-level defaults merged into every build
//! - `ConnectionRequest`: what the caller's workflow needs from the session
//!
//! # Security
//! `ConnectionParameters` carries the password and key material in zeroizing
//! containers. Neither `Debug` nor `Display` nor serialization exposes them.

mod engine;
mod parameters;

pub use engine::{ConnectArgs, ConnectionRequest, EngineSettings};
pub use parameters::{ConnectionParameters, PortValue};
