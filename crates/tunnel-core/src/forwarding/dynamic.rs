use gatelink_types::DynamicForward;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::{
    splice::splice,
    traits::{ChannelOpener, ProxyClient, ProxyListener},
};
use crate::TunnelError;

type Result<T> = crate::TunnelResult<T>;

/// Bind the proxy listener for a dynamic forward and spawn its accept loop.
pub(super) async fn spawn_dynamic_forwarder<P, S>(
    spec: DynamicForward,
    session: S,
    tasks: &tokio::sync::Mutex<Vec<JoinHandle<()>>>,
) -> Result<()>
where
    P: ProxyListener,
    S: ChannelOpener,
{
    let bind_host = spec.bind_address.clone().unwrap_or_else(|| "127.0.0.1".to_string());
    let listener = P::bind(bind_host.clone(), spec.bind_port).await?;
    info!(
        bind = %format!("{}:{}", bind_host, spec.bind_port),
        "dynamic forward listening"
    );
    let task = tokio::spawn(run_proxy_listener(listener, session));
    tasks.lock().await.push(task);
    Ok(())
}

async fn run_proxy_listener<P, S>(mut listener: P, session: S)
where
    P: ProxyListener,
    S: ChannelOpener,
{
    loop {
        match listener.accept().await {
            Ok(client) => {
                let session = session.clone();
                tokio::spawn(async move {
                    if let Err(err) = handle_proxy_client(client, session).await {
                        warn!(?err, "dynamic forward client failed");
                    }
                });
            }
            Err(err) => {
                warn!(?err, "dynamic forward listener accept error");
                break;
            }
        }
    }
}

/// One negotiated proxy client: the channel is opened first, and the client
/// is accepted only once it is up. On open failure the client is denied and
/// never spliced.
async fn handle_proxy_client<C, S>(client: C, session: S) -> Result<()>
where
    C: ProxyClient,
    S: ChannelOpener,
{
    let dest = client.destination().clone();
    let remote = match session
        .open_channel(dest.src_host.clone(), dest.src_port, dest.dst_host.clone(), dest.dst_port)
        .await
    {
        Ok(remote) => remote,
        Err(err) => {
            let target = format!("{}:{}", dest.dst_host, dest.dst_port);
            let _ = client.deny().await;
            return Err(TunnelError::open_channel(target, err));
        }
    };
    let stream = client.accept().await?;
    splice(stream, remote).await
}
