//! Server side of a WebSocket session on top of an accepted TCP socket.

use embassy_net::tcp::TcpSocket;
use embassy_time::Duration;
use embedded_io_async::{Read as _, Write as _};
use log::debug;
use myrtio_strip_core::ws::{
    FrameAction,
    FrameHeader,
    MAX_CONTROL_PAYLOAD,
    MAX_HEADER_LEN,
    Opcode,
    encode_control,
    unmask,
};

use super::http::Error;

/// Largest text message accepted from a client.
pub(crate) const MAX_MESSAGE_LEN: usize = 512;

pub(crate) enum Message<'a> {
    /// Unmasked payload of a complete text frame.
    Text(&'a [u8]),
    /// A frame that was consumed without producing a message.
    Skipped,
    /// The client closed the session.
    Close,
}

pub(crate) struct WebSocket<'a> {
    socket: TcpSocket<'a>,
    payload: [u8; MAX_MESSAGE_LEN],
}

impl<'a> WebSocket<'a> {
    pub(crate) fn new(socket: TcpSocket<'a>) -> Self {
        Self {
            socket,
            payload: [0u8; MAX_MESSAGE_LEN],
        }
    }

    /// Keep an idle session open, probing the peer instead of timing out.
    pub(crate) fn set_keep_alive(&mut self, interval: Duration) {
        self.socket.set_timeout(None);
        self.socket.set_keep_alive(Some(interval));
    }

    /// Read the next frame, answering control frames on the way.
    pub(crate) async fn read_message(&mut self) -> Result<Message<'_>, Error> {
        let header = self.read_header().await?;
        let action = header.action(MAX_MESSAGE_LEN);
        match action {
            FrameAction::Deliver | FrameAction::Pong => {
                // Both fit the payload buffer, checked by `action`.
                let len = usize::try_from(header.payload_len).map_err(|_| Error::Parse)?;
                self.read_exact(len).await?;
                if let Some(mask) = header.mask {
                    unmask(&mut self.payload[..len], mask);
                }
                if action == FrameAction::Pong {
                    self.write_control(Opcode::Pong, len).await?;
                    return Ok(Message::Skipped);
                }
                Ok(Message::Text(&self.payload[..len]))
            }
            FrameAction::Close => {
                self.skip(header.payload_len).await?;
                self.write_control(Opcode::Close, 0).await?;
                self.socket.close();
                Ok(Message::Close)
            }
            FrameAction::Drop => {
                debug!(
                    "ws: dropping {:?} frame (fin {}, {} bytes)",
                    header.opcode, header.fin, header.payload_len
                );
                self.skip(header.payload_len).await?;
                Ok(Message::Skipped)
            }
        }
    }

    async fn read_header(&mut self) -> Result<FrameHeader, Error> {
        let mut head = [0u8; 2];
        self.socket
            .read_exact(&mut head)
            .await
            .map_err(|_| Error::Closed)?;
        let extra_len = FrameHeader::extra_len(head);
        let mut extra = [0u8; MAX_HEADER_LEN];
        self.socket
            .read_exact(&mut extra[..extra_len])
            .await
            .map_err(|_| Error::Closed)?;
        FrameHeader::decode(head, &extra[..extra_len]).ok_or(Error::Parse)
    }

    async fn read_exact(&mut self, len: usize) -> Result<(), Error> {
        let buf = self.payload.get_mut(..len).ok_or(Error::TooLarge)?;
        self.socket.read_exact(buf).await.map_err(|_| Error::Closed)
    }

    async fn skip(&mut self, mut remaining: u64) -> Result<(), Error> {
        while remaining > 0 {
            let chunk = usize::try_from(remaining).map_or(MAX_MESSAGE_LEN, |n| n.min(MAX_MESSAGE_LEN));
            self.read_exact(chunk).await?;
            remaining -= chunk as u64;
        }
        Ok(())
    }

    /// Send a control frame echoing the first `len` payload bytes.
    async fn write_control(&mut self, opcode: Opcode, len: usize) -> Result<(), Error> {
        let mut frame = [0u8; MAX_CONTROL_PAYLOAD + 2];
        let n = encode_control(opcode, &self.payload[..len], &mut frame).ok_or(Error::TooLarge)?;
        self.socket.write_all(&frame[..n]).await?;
        self.socket.flush().await?;
        Ok(())
    }
}
