use std::sync::Arc;

use async_trait::async_trait;
use russh::{Channel, ChannelStream, client};
use tokio::io::{AsyncRead, AsyncWrite};

// Internal Result type alias for convenience
type Result<T> = crate::TunnelResult<T>;

/// Trait for streams that can be spliced together.
pub trait TunnelStreamIo: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> TunnelStreamIo for T where T: AsyncRead + AsyncWrite + Unpin + Send {}

/// Type alias for boxed tunnel streams.
pub type TunnelStream = Box<dyn TunnelStreamIo>;

/// An established client session handle shared across forwarders.
pub type SharedSession<H> = Arc<client::Handle<H>>;

/// Transport operations needed to open outbound channels.
#[async_trait]
pub trait ChannelOpener: Clone + Send + Sync + 'static {
    /// Open an outbound channel to `target_host:target_port` on behalf of
    /// `origin_host:origin_port`.
    async fn open_channel(
        &self,
        origin_host: String,
        origin_port: u16,
        target_host: String,
        target_port: u16,
    ) -> Result<TunnelStream>;

    /// Cancel a previously registered remote-side forward.
    async fn cancel_forward(&self, bind_address: String, port: u32) -> Result<()>;
}

/// Transport operations needed to register remote-side forwards.
#[async_trait]
pub trait RemoteRegistrar {
    /// Ask the remote side to listen on `bind_address:bind_port` and route
    /// connections back as inbound channels. Returns the port actually bound;
    /// 0 means the requested port was used.
    async fn register_forward(&mut self, bind_address: String, bind_port: u16) -> Result<u32>;
}

/// An inbound channel-open request routed to this session by the remote side.
#[async_trait]
pub trait InboundChannel: Send {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;
    fn into_stream(self) -> Self::Stream;
    async fn close(self) -> Result<()>;
}

/// Destination negotiated by a proxy client (dynamic forwarding).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxyDestination {
    /// Source address as seen by the proxy.
    pub src_host: String,
    /// Source port as seen by the proxy.
    pub src_port: u16,
    /// Destination host requested by the client.
    pub dst_host: String,
    /// Destination port requested by the client.
    pub dst_port: u16,
}

/// A destination-agnostic proxy listener. The wire protocol negotiation
/// (e.g. SOCKS) is the implementor's concern; the forwarder only consumes
/// the negotiated destination plus accept/deny.
#[async_trait]
pub trait ProxyListener: Send + Sized + 'static {
    type Client: ProxyClient;

    /// Bind the proxy listener on `bind_address:bind_port`.
    async fn bind(bind_address: String, bind_port: u16) -> Result<Self>;

    /// Next client that finished negotiating a destination.
    async fn accept(&mut self) -> Result<Self::Client>;
}

/// A negotiated proxy client awaiting an accept/deny decision.
#[async_trait]
pub trait ProxyClient: Send + Sized + 'static {
    fn destination(&self) -> &ProxyDestination;

    /// Grant the request and take over the client byte stream. The proxy
    /// layer must not pipe any data itself after this point.
    async fn accept(self) -> Result<TunnelStream>;

    /// Refuse the request and close the client out at the proxy layer.
    async fn deny(self) -> Result<()>;
}

// Trait implementations for russh types

#[async_trait]
impl<H> ChannelOpener for SharedSession<H>
where
    H: client::Handler + Send + Sync + 'static,
{
    async fn open_channel(
        &self,
        origin_host: String,
        origin_port: u16,
        target_host: String,
        target_port: u16,
    ) -> Result<TunnelStream> {
        let channel = self
            .as_ref()
            .channel_open_direct_tcpip(target_host, target_port.into(), origin_host, origin_port.into())
            .await?;
        Ok(Box::new(channel.into_stream()))
    }

    async fn cancel_forward(&self, bind_address: String, port: u32) -> Result<()> {
        self.as_ref().cancel_tcpip_forward(bind_address, port).await?;
        Ok(())
    }
}

#[async_trait]
impl<H> RemoteRegistrar for client::Handle<H>
where
    H: client::Handler + Send,
{
    async fn register_forward(&mut self, bind_address: String, bind_port: u16) -> Result<u32> {
        let assigned = self.tcpip_forward(bind_address, bind_port.into()).await?;
        Ok(assigned)
    }
}

#[async_trait]
impl InboundChannel for Channel<client::Msg> {
    type Stream = ChannelStream<client::Msg>;

    fn into_stream(self) -> Self::Stream {
        Channel::into_stream(self)
    }

    async fn close(self) -> Result<()> {
        Channel::close(&self).await?;
        Ok(())
    }
}
