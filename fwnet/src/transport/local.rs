use crate::error::{FwError, Result};
use crate::protocol::FwMessage;
use crate::transport::Channel;
use futures::future::BoxFuture;
use tokio::sync::{Mutex, mpsc};

/// In-process channel end backed by a pair of bounded tokio mpsc queues.
///
/// Messages move by value; nothing is serialized.
pub struct LocalChannel {
    tx: mpsc::Sender<FwMessage>,
    rx: Mutex<mpsc::Receiver<FwMessage>>,
}

/// Create both ends of an in-process channel.
///
/// `capacity` is the queue depth in each direction (at least 1).
pub fn local_pair(capacity: usize) -> (LocalChannel, LocalChannel) {
    let capacity = capacity.max(1);
    let (a_tx, b_rx) = mpsc::channel(capacity);
    let (b_tx, a_rx) = mpsc::channel(capacity);
    (
        LocalChannel {
            tx: a_tx,
            rx: Mutex::new(a_rx),
        },
        LocalChannel {
            tx: b_tx,
            rx: Mutex::new(b_rx),
        },
    )
}

impl Channel for LocalChannel {
    fn send<'a>(&'a self, msg: FwMessage) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.tx
                .send(msg)
                .await
                .map_err(|_| FwError::transport("local channel closed"))
        })
    }

    fn recv<'a>(&'a self) -> BoxFuture<'a, Result<FwMessage>> {
        Box::pin(async move {
            self.rx
                .lock()
                .await
                .recv()
                .await
                .ok_or_else(|| FwError::transport("local channel closed"))
        })
    }
}
