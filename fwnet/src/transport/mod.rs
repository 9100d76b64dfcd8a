//! Point-to-point channels between the coordinator and its workers.
//!
//! A [`Channel`] is one exclusive, ordered, reliable, bidirectional link.
//! The coordinator holds one per worker; workers never talk to each other.

mod local;
mod tcp;

use crate::error::Result;
use crate::protocol::FwMessage;
use futures::future::BoxFuture;
use std::sync::Arc;

pub use local::{LocalChannel, local_pair};
pub use tcp::TcpChannel;

/// Typed message channel to a single peer.
///
/// Both operations suspend until the transport accepts or yields a message.
/// Messages arrive in the order they were sent; a closed peer surfaces as
/// an error, never as a silently dropped message.
pub trait Channel: Send + Sync {
    fn send<'a>(&'a self, msg: FwMessage) -> BoxFuture<'a, Result<()>>;

    fn recv<'a>(&'a self) -> BoxFuture<'a, Result<FwMessage>>;
}

impl<C: Channel + ?Sized> Channel for Box<C> {
    fn send<'a>(&'a self, msg: FwMessage) -> BoxFuture<'a, Result<()>> {
        (**self).send(msg)
    }

    fn recv<'a>(&'a self) -> BoxFuture<'a, Result<FwMessage>> {
        (**self).recv()
    }
}

impl<C: Channel + ?Sized> Channel for Arc<C> {
    fn send<'a>(&'a self, msg: FwMessage) -> BoxFuture<'a, Result<()>> {
        (**self).send(msg)
    }

    fn recv<'a>(&'a self) -> BoxFuture<'a, Result<FwMessage>> {
        (**self).recv()
    }
}
