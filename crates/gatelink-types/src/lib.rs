//! Shared type definitions for gatelink
//!
//! This crate contains lightweight type definitions describing tunnel
//! forwards, kept dependency-light so they can be reused by CLI parsing,
//! config loaders, and runtimes without pulling in protocol implementations.

pub mod tunnel;

pub use tunnel::{DynamicForward, ForwardSpec, LocalToRemoteForward, RemoteToLocalForward, TunnelConfig};
