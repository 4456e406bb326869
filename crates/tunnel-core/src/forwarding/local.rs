use gatelink_types::LocalToRemoteForward;
use tokio::{
    io::AsyncWriteExt,
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};
use tracing::{info, warn};

use super::{splice::splice, traits::ChannelOpener};
use crate::TunnelError;

type Result<T> = crate::TunnelResult<T>;

/// Bind the local listener for a local-to-remote forward and spawn its accept loop.
pub(super) async fn spawn_local_forwarder<S>(
    spec: LocalToRemoteForward,
    session: S,
    tasks: &tokio::sync::Mutex<Vec<JoinHandle<()>>>,
) -> Result<()>
where
    S: ChannelOpener,
{
    let bind_host = spec.bind_address.clone().unwrap_or_else(|| "127.0.0.1".to_string());
    let listener = TcpListener::bind((bind_host.as_str(), spec.bind_port))
        .await
        .map_err(|err| TunnelError::Bind {
            address: format!("{}:{}", bind_host, spec.bind_port),
            source: err,
        })?;
    info!(
        bind = %format!("{}:{}", bind_host, spec.bind_port),
        target = %format!("{}:{}", spec.target_host, spec.target_port),
        "local-to-remote forward listening"
    );
    let task = tokio::spawn(run_local_listener(listener, bind_host, spec, session));
    tasks.lock().await.push(task);
    Ok(())
}

async fn run_local_listener<S>(listener: TcpListener, bind_host: String, spec: LocalToRemoteForward, session: S)
where
    S: ChannelOpener,
{
    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let bind_host = bind_host.clone();
                let spec = spec.clone();
                let session = session.clone();
                tokio::spawn(async move {
                    if let Err(err) = handle_local_connection(stream, bind_host, spec, session).await {
                        warn!(?err, "local-to-remote forward connection failed");
                    }
                });
            }
            Err(err) => {
                warn!(?err, "local-to-remote listener accept error");
                break;
            }
        }
    }
}

/// One accepted local connection: open the matching channel and splice.
/// A failed channel open abandons only this pair; the listener keeps accepting.
async fn handle_local_connection<S>(
    mut stream: TcpStream,
    bind_host: String,
    spec: LocalToRemoteForward,
    session: S,
) -> Result<()>
where
    S: ChannelOpener,
{
    stream.set_nodelay(true).ok();
    // The configured bind endpoint is reported as the channel origin.
    let remote = match session
        .open_channel(bind_host, spec.bind_port, spec.target_host.clone(), spec.target_port)
        .await
    {
        Ok(remote) => remote,
        Err(err) => {
            let _ = stream.shutdown().await;
            return Err(TunnelError::open_channel(
                format!("{}:{}", spec.target_host, spec.target_port),
                err,
            ));
        }
    };
    splice(stream, remote).await
}
