//! Tunnel forwarding directives shared across gatelink.
//!
//! Each forwarding mode carries only the fields relevant to it; the
//! direction is encoded in the type rather than in a string-keyed option.

use serde::{Deserialize, Serialize};

/// Collection of forwarding directives to run over one secure session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunnelConfig {
    /// Local-to-remote forwards (listen locally, open channels to a remote target).
    pub local_to_remote: Vec<LocalToRemoteForward>,
    /// Remote-to-local forwards (the remote side listens, channels connect back to a local target).
    pub remote_to_local: Vec<RemoteToLocalForward>,
    /// Dynamic, destination-negotiated forwards.
    pub dynamic: Vec<DynamicForward>,
}

impl TunnelConfig {
    /// Returns true when no forwarding directives are present.
    pub fn is_empty(&self) -> bool {
        self.local_to_remote.is_empty() && self.remote_to_local.is_empty() && self.dynamic.is_empty()
    }

    /// Add a directive to the collection matching its mode.
    pub fn push(&mut self, spec: ForwardSpec) {
        match spec {
            ForwardSpec::LocalToRemote(fwd) => self.local_to_remote.push(fwd),
            ForwardSpec::RemoteToLocal(fwd) => self.remote_to_local.push(fwd),
            ForwardSpec::Dynamic(fwd) => self.dynamic.push(fwd),
        }
    }
}

/// Local-to-remote forward specification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalToRemoteForward {
    /// Optional local bind address; loopback when absent.
    pub bind_address: Option<String>,
    /// Local bind port.
    pub bind_port: u16,
    /// Target host to reach through the tunnel.
    pub target_host: String,
    /// Target port to reach through the tunnel.
    pub target_port: u16,
}

/// Remote-to-local forward specification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteToLocalForward {
    /// Optional remote bind address requested on the server; loopback when absent.
    pub bind_address: Option<String>,
    /// Remote bind port requested on the server.
    pub bind_port: u16,
    /// Local target host to receive connections.
    pub target_host: String,
    /// Local target port to receive connections.
    pub target_port: u16,
}

/// Dynamic forward specification. The destination is negotiated per client,
/// so only the listener endpoint is configured.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicForward {
    /// Optional bind address for the proxy listener; loopback when absent.
    pub bind_address: Option<String>,
    /// Bind port for the proxy listener.
    pub bind_port: u16,
}

/// A single forwarding directive, tagged by direction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForwardSpec {
    /// Listen locally, forward to a fixed remote target.
    LocalToRemote(LocalToRemoteForward),
    /// Remote side listens, connections come back to a fixed local target.
    RemoteToLocal(RemoteToLocalForward),
    /// Listen locally, destination negotiated per client.
    Dynamic(DynamicForward),
}
