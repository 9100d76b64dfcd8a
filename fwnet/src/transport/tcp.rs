use crate::error::{FwError, Result};
use crate::protocol::{
    FwMessage, HEADER_SIZE, Header, MAX_FRAME_SIZE, decode_payload, encode_message,
};
use crate::transport::Channel;
use futures::future::BoxFuture;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;

/// Channel over a single TCP stream (no TLS).
///
/// Every message is one `[header][rkyv payload]` frame. Reads and writes
/// are serialized independently, so one side may send while the other
/// receives.
#[derive(Debug)]
pub struct TcpChannel {
    reader: Mutex<OwnedReadHalf>,
    writer: Mutex<OwnedWriteHalf>,
    peer_addr: SocketAddr,
    local_addr: SocketAddr,
}

impl TcpChannel {
    /// Wrap an already-connected stream.
    pub fn from_stream(stream: TcpStream) -> Result<Self> {
        stream
            .set_nodelay(true)
            .map_err(|e| FwError::transport_with_source("tcp set_nodelay", e))?;
        let peer_addr = stream
            .peer_addr()
            .map_err(|e| FwError::transport_with_source("tcp peer_addr", e))?;
        let local_addr = stream
            .local_addr()
            .map_err(|e| FwError::transport_with_source("tcp local_addr", e))?;
        let (reader, writer) = stream.into_split();
        Ok(Self {
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
            peer_addr,
            local_addr,
        })
    }

    /// Connect to a listening peer.
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| FwError::transport_with_source(format!("tcp connect to {addr}"), e))?;
        Self::from_stream(stream)
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    async fn write_frame(&self, msg: &FwMessage) -> Result<()> {
        let buf = encode_message(msg)?;
        let mut writer = self.writer.lock().await;
        writer
            .write_all(&buf)
            .await
            .map_err(|e| FwError::transport_with_source("tcp write frame", e))?;
        writer
            .flush()
            .await
            .map_err(|e| FwError::transport_with_source("tcp flush", e))?;
        Ok(())
    }

    async fn read_frame(&self) -> Result<FwMessage> {
        let mut reader = self.reader.lock().await;

        let mut header_buf = [0u8; HEADER_SIZE];
        reader
            .read_exact(&mut header_buf)
            .await
            .map_err(|e| FwError::transport_with_source("tcp read header", e))?;
        let header = Header::decode(&header_buf)
            .ok_or_else(|| FwError::DecodeFailed("invalid header: unknown message type".into()))?;

        let len = header.payload_length as usize;
        if len > MAX_FRAME_SIZE {
            tracing::warn!(len, peer = %self.peer_addr, "tcp: frame too large");
            return Err(FwError::DecodeFailed(format!(
                "frame of {len} bytes exceeds limit {MAX_FRAME_SIZE}"
            )));
        }

        let mut payload = vec![0u8; len];
        reader
            .read_exact(&mut payload)
            .await
            .map_err(|e| FwError::transport_with_source("tcp read payload", e))?;
        decode_payload(&payload)
    }
}

impl Channel for TcpChannel {
    fn send<'a>(&'a self, msg: FwMessage) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move { self.write_frame(&msg).await })
    }

    fn recv<'a>(&'a self) -> BoxFuture<'a, Result<FwMessage>> {
        Box::pin(self.read_frame())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Weight;
    use tokio::net::TcpListener;

    async fn connected_pair() -> (TcpChannel, TcpChannel) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (client, accepted) = tokio::join!(TcpChannel::connect(addr), listener.accept());
        let (stream, _) = accepted.unwrap();
        (client.unwrap(), TcpChannel::from_stream(stream).unwrap())
    }

    #[tokio::test]
    async fn test_frames_cross_the_wire_in_order() {
        let (a, b) = connected_pair().await;
        let row = vec![Weight::Finite(1), Weight::Unreachable, Weight::Finite(3)];
        a.send(FwMessage::Partition { id: 7 }).await.unwrap();
        a.send(FwMessage::pivot(0, row.clone())).await.unwrap();

        assert_eq!(b.recv().await.unwrap().into_partition().unwrap(), 7);
        assert_eq!(b.recv().await.unwrap().into_pivot(0).unwrap(), row);
    }

    #[tokio::test]
    async fn test_recv_fails_when_peer_closes() {
        let (a, b) = connected_pair().await;
        drop(a);
        assert!(b.recv().await.is_err());
    }

    #[tokio::test]
    async fn test_oversized_frame_is_rejected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (raw, accepted) = tokio::join!(TcpStream::connect(addr), listener.accept());
        let mut raw = raw.unwrap();
        let channel = TcpChannel::from_stream(accepted.unwrap().0).unwrap();

        let mut header = [0u8; HEADER_SIZE];
        header[0..4].copy_from_slice(&u32::MAX.to_le_bytes());
        raw.write_all(&header).await.unwrap();

        let err = channel.recv().await.unwrap_err();
        assert!(err.to_string().contains("exceeds limit"), "got: {err}");
    }
}
