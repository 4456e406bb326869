//! Unit tests for the tunnel manager.

use gatelink_types::{DynamicForward, LocalToRemoteForward, RemoteToLocalForward, TunnelConfig};

use super::*;

#[test]
fn descriptors_include_all_forward_modes() {
    let mut config = TunnelConfig::default();
    config.local_to_remote.push(LocalToRemoteForward {
        bind_address: Some("127.0.0.1".into()),
        bind_port: 8080,
        target_host: "internal".into(),
        target_port: 80,
    });
    config.remote_to_local.push(RemoteToLocalForward {
        bind_address: Some("0.0.0.0".into()),
        bind_port: 2222,
        target_host: "127.0.0.1".into(),
        target_port: 3000,
    });
    config.remote_to_local.push(RemoteToLocalForward {
        bind_address: None,
        bind_port: 9090,
        target_host: "127.0.0.1".into(),
        target_port: 9090,
    });
    config.dynamic.push(DynamicForward {
        bind_address: None,
        bind_port: 1080,
    });
    let manager = TunnelManager::new(config);
    let descriptors = manager.descriptors();
    assert!(descriptors.iter().any(|d| d.starts_with("local 127.0.0.1:8080")));
    assert!(descriptors.iter().any(|d| d.contains("remote 0.0.0.0:2222")));
    assert!(descriptors.iter().any(|d| d.contains("remote :9090")));
    assert!(descriptors.iter().any(|d| d.contains("dynamic 127.0.0.1:1080")));
}

#[test]
fn has_requests_reflects_config() {
    assert!(!TunnelManager::default().has_requests());
    let mut config = TunnelConfig::default();
    config.dynamic.push(DynamicForward {
        bind_address: None,
        bind_port: 1080,
    });
    assert!(TunnelManager::new(config).has_requests());
}
