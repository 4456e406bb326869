use gatelink_types::RemoteToLocalForward;
use tokio::net::TcpStream;
use tracing::{info, warn};

use super::{
    splice::splice,
    traits::{InboundChannel, RemoteRegistrar},
};
use crate::TunnelError;

type Result<T> = crate::TunnelResult<T>;

#[derive(Default, Clone)]
pub(super) struct RemoteBinding {
    pub bind_address: Option<String>,
    pub actual_port: u32,
    pub target_host: String,
    pub target_port: u16,
}

/// Register a remote-to-local forward with the remote side.
pub(super) async fn register_remote_forward<R>(
    spec: RemoteToLocalForward,
    session: &mut R,
    bindings: &tokio::sync::Mutex<Vec<RemoteBinding>>,
) -> Result<()>
where
    R: RemoteRegistrar + Send,
{
    let address = spec.bind_address.clone().unwrap_or_else(|| "127.0.0.1".to_string());
    let requested = spec.bind_port;
    let assigned = session
        .register_forward(address.clone(), requested)
        .await
        .map_err(|err| TunnelError::registration(format!("{address}:{requested}"), err))?;
    let actual_port = if assigned != 0 { assigned } else { requested as u32 };
    info!(
        bind = %format!("{}:{}", address, actual_port),
        target = %format!("{}:{}", spec.target_host, spec.target_port),
        "remote-to-local forward registered"
    );
    bindings.lock().await.push(RemoteBinding {
        bind_address: spec.bind_address,
        actual_port,
        target_host: spec.target_host,
        target_port: spec.target_port,
    });
    Ok(())
}

/// Route an inbound channel to the local target recorded for its binding.
pub(super) async fn handle_inbound_channel<C>(
    channel: C,
    bound_address: &str,
    bound_port: u32,
    origin_address: &str,
    origin_port: u32,
    bindings: &tokio::sync::Mutex<Vec<RemoteBinding>>,
) -> Result<()>
where
    C: InboundChannel,
{
    let Some((target_host, target_port)) = resolve_remote_target(bound_address, bound_port, bindings).await else {
        warn!(
            address = bound_address,
            port = bound_port,
            "inbound channel with no matching remote-to-local forward"
        );
        let _ = channel.close().await;
        return Ok(());
    };
    info!(
        remote = %format!("{bound_address}:{bound_port}"),
        target = %format!("{target_host}:{target_port}"),
        origin = %format!("{origin_address}:{origin_port}"),
        "splicing inbound forwarded connection"
    );
    let local = match TcpStream::connect((target_host.as_str(), target_port)).await {
        Ok(local) => local,
        Err(err) => {
            // Abandon only this pair; the registration stays active.
            let _ = channel.close().await;
            return Err(TunnelError::Connect {
                address: format!("{target_host}:{target_port}"),
                source: err,
            });
        }
    };
    splice(channel.into_stream(), local).await
}

/// Resolve the local target for a remote binding.
pub(super) async fn resolve_remote_target(
    bound_address: &str,
    bound_port: u32,
    bindings: &tokio::sync::Mutex<Vec<RemoteBinding>>,
) -> Option<(String, u16)> {
    let bindings = bindings.lock().await;
    bindings.iter().find_map(|entry| {
        if entry.actual_port != bound_port {
            return None;
        }
        let matches_address = match (&entry.bind_address, bound_address) {
            (None, _) => true,
            (Some(addr), _) if addr.is_empty() => true,
            (Some(addr), got) => addr == got,
        };
        if matches_address {
            Some((entry.target_host.clone(), entry.target_port))
        } else {
            None
        }
    })
}
