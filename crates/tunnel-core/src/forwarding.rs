//! Tunnel forwarding over an established secure session.
//!
//! This module provides functionality for:
//! - Local-to-remote forwarding (listen locally, open channels to a fixed remote target)
//! - Remote-to-local forwarding (the remote side listens, channels connect back locally)
//! - Dynamic forwarding (listen locally, destination negotiated per client by a proxy layer)
//!
//! The main entry point is [`TunnelManager`], which coordinates all
//! forwarding activity for one session and tears everything down when the
//! session closes.

mod dynamic;
mod local;
mod manager;
mod parsing;
mod remote;
mod splice;
mod traits;

// Re-export public API
pub use manager::TunnelManager;
pub use parsing::{parse_dynamic, parse_local_to_remote, parse_remote_to_local};
pub use splice::splice;
pub use traits::{
    ChannelOpener,
    InboundChannel,
    ProxyClient,
    ProxyDestination,
    ProxyListener,
    RemoteRegistrar,
    SharedSession,
    TunnelStream,
    TunnelStreamIo,
};
