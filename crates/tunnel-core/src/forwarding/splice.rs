use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, copy_bidirectional};

type Result<T> = crate::TunnelResult<T>;

/// Splice two byte streams together bidirectionally.
///
/// Copies in both directions until either side reaches end-of-stream or
/// errors, then shuts down both endpoints so neither outlives the pair.
pub async fn splice<A, B>(mut a: A, mut b: B) -> Result<()>
where
    A: AsyncRead + AsyncWrite + Unpin,
    B: AsyncRead + AsyncWrite + Unpin,
{
    let copy_result = copy_bidirectional(&mut a, &mut b).await;
    let _ = a.shutdown().await;
    let _ = b.shutdown().await;
    match copy_result {
        Ok(_) => Ok(()),
        Err(err)
            if err.kind() == std::io::ErrorKind::BrokenPipe
                || err.kind() == std::io::ErrorKind::NotConnected
                || err.kind() == std::io::ErrorKind::ConnectionReset =>
        {
            // Treat common half-close races as graceful termination.
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
