use std::{future::Future, sync::Arc};

use gatelink_types::TunnelConfig;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::{
    dynamic::spawn_dynamic_forwarder,
    local::spawn_local_forwarder,
    remote::{RemoteBinding, handle_inbound_channel, register_remote_forward, resolve_remote_target},
    traits::{ChannelOpener, InboundChannel, ProxyListener, RemoteRegistrar},
};

type Result<T> = crate::TunnelResult<T>;

#[derive(Default)]
struct TunnelState {
    config: TunnelConfig,
    tasks: tokio::sync::Mutex<Vec<JoinHandle<()>>>,
    remote_bindings: tokio::sync::Mutex<Vec<RemoteBinding>>,
}

/// Coordinates the three forwarding modes over one secure session.
#[derive(Clone, Default)]
pub struct TunnelManager {
    state: Arc<TunnelState>,
}

impl TunnelManager {
    /// Create a new manager with the given configuration.
    pub fn new(config: TunnelConfig) -> Self {
        Self {
            state: Arc::new(TunnelState {
                config,
                tasks: tokio::sync::Mutex::new(Vec::new()),
                remote_bindings: tokio::sync::Mutex::new(Vec::new()),
            }),
        }
    }

    /// Get a reference to the tunnel configuration.
    pub fn config(&self) -> &TunnelConfig {
        &self.state.config
    }

    /// Check if there are any forwards configured.
    pub fn has_requests(&self) -> bool {
        !self.state.config.is_empty()
    }

    /// Get human-readable descriptors of all configured forwards.
    pub fn descriptors(&self) -> Vec<String> {
        let mut entries = Vec::new();
        for fwd in &self.state.config.local_to_remote {
            let bind = fwd.bind_address.as_deref().unwrap_or("127.0.0.1");
            entries.push(format!("local {bind}:{} -> {}:{}", fwd.bind_port, fwd.target_host, fwd.target_port));
        }
        for fwd in &self.state.config.remote_to_local {
            let bind = fwd.bind_address.as_deref().unwrap_or("");
            let bind_desc = if bind.is_empty() {
                format!("remote :{}", fwd.bind_port)
            } else {
                format!("remote {bind}:{}", fwd.bind_port)
            };
            entries.push(format!("{bind_desc} -> {}:{}", fwd.target_host, fwd.target_port));
        }
        for fwd in &self.state.config.dynamic {
            let bind = fwd.bind_address.as_deref().unwrap_or("127.0.0.1");
            entries.push(format!("dynamic {bind}:{}", fwd.bind_port));
        }
        entries
    }

    /// Start every configured local-to-remote forwarder.
    pub async fn start_local_forwarders<S>(&self, session: S) -> Result<()>
    where
        S: ChannelOpener,
    {
        for spec in &self.state.config.local_to_remote {
            spawn_local_forwarder(spec.clone(), session.clone(), &self.state.tasks).await?;
        }
        Ok(())
    }

    /// Start every configured dynamic forwarder behind the proxy listener `P`.
    pub async fn start_dynamic_forwarders<P, S>(&self, session: S) -> Result<()>
    where
        P: ProxyListener,
        S: ChannelOpener,
    {
        for spec in &self.state.config.dynamic {
            spawn_dynamic_forwarder::<P, S>(spec.clone(), session.clone(), &self.state.tasks).await?;
        }
        Ok(())
    }

    /// Register every configured remote-to-local forward with the remote side.
    pub async fn start_remote_forwarders<R>(&self, session: &mut R) -> Result<()>
    where
        R: RemoteRegistrar + Send,
    {
        for spec in &self.state.config.remote_to_local {
            register_remote_forward(spec.clone(), session, &self.state.remote_bindings).await?;
        }
        Ok(())
    }

    /// Handle an inbound channel routed to this session by the remote side.
    pub async fn handle_inbound_channel<C>(
        &self,
        channel: C,
        bound_address: &str,
        bound_port: u32,
        origin_address: &str,
        origin_port: u32,
    ) -> Result<()>
    where
        C: InboundChannel,
    {
        handle_inbound_channel(
            channel,
            bound_address,
            bound_port,
            origin_address,
            origin_port,
            &self.state.remote_bindings,
        )
        .await
    }

    /// Resolve the local target for a remote binding.
    pub async fn resolve_remote_target(&self, bound_address: &str, bound_port: u32) -> Option<(String, u16)> {
        resolve_remote_target(bound_address, bound_port, &self.state.remote_bindings).await
    }

    /// Tear down every listener owned by this manager once the session's
    /// close notification resolves. The notification fires exactly once.
    pub fn bind_session_close<F>(&self, closed: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let manager = self.clone();
        tokio::spawn(async move {
            closed.await;
            info!("session closed; tearing down tunnel forwarders");
            manager.cancel_tasks().await;
        });
    }

    /// Shut down all forwarding tasks and cancel remote registrations.
    pub async fn shutdown<S>(&self, session: Option<S>) -> Result<()>
    where
        S: ChannelOpener,
    {
        self.cancel_tasks().await;
        if let Some(session) = session {
            let mut bindings = self.state.remote_bindings.lock().await;
            for entry in bindings.drain(..) {
                let address = entry.bind_address.clone().unwrap_or_else(|| "127.0.0.1".to_string());
                if let Err(err) = session.cancel_forward(address.clone(), entry.actual_port).await {
                    warn!(?err, bind = &address, port = entry.actual_port, "failed to cancel remote forward");
                }
            }
        }
        Ok(())
    }

    async fn cancel_tasks(&self) {
        let mut tasks = self.state.tasks.lock().await;
        for handle in tasks.drain(..) {
            handle.abort();
        }
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
