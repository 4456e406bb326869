pub mod error;
pub mod forwarding;

pub use error::{TunnelError, TunnelResult};
