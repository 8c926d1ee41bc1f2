//! WebSocket (RFC 6455) framing for the push channel.
//!
//! Only what a server receiving short text messages needs: the opening
//! handshake key, frame header decoding, unmasking and unmasked control
//! frames for replies. Socket I/O stays with the caller.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use heapless::String;
use sha1::{Digest, Sha1};

const HANDSHAKE_GUID: &[u8] = b"258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// Length of a `Sec-WebSocket-Accept` value.
pub const ACCEPT_KEY_LEN: usize = 28;

/// Largest payload a control frame may carry.
pub const MAX_CONTROL_PAYLOAD: usize = 125;

/// Largest header: two leading bytes, 8 bytes of length, 4 bytes of mask.
pub const MAX_HEADER_LEN: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Continuation,
    Text,
    Binary,
    Close,
    Ping,
    Pong,
    Reserved(u8),
}

impl Opcode {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x0F {
            0x0 => Opcode::Continuation,
            0x1 => Opcode::Text,
            0x2 => Opcode::Binary,
            0x8 => Opcode::Close,
            0x9 => Opcode::Ping,
            0xA => Opcode::Pong,
            other => Opcode::Reserved(other),
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            Opcode::Continuation => 0x0,
            Opcode::Text => 0x1,
            Opcode::Binary => 0x2,
            Opcode::Close => 0x8,
            Opcode::Ping => 0x9,
            Opcode::Pong => 0xA,
            Opcode::Reserved(bits) => bits & 0x0F,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub fin: bool,
    pub opcode: Opcode,
    pub mask: Option<[u8; 4]>,
    pub payload_len: u64,
}

impl FrameHeader {
    /// Number of header bytes that follow the two leading ones.
    pub fn extra_len(head: [u8; 2]) -> usize {
        let length = match head[1] & 0x7F {
            126 => 2,
            127 => 8,
            _ => 0,
        };
        let mask = if head[1] & 0x80 == 0 { 0 } else { 4 };
        length + mask
    }

    /// Decode a header from its two leading bytes and the
    /// [`extra_len`](Self::extra_len) bytes after them.
    pub fn decode(head: [u8; 2], extra: &[u8]) -> Option<Self> {
        if extra.len() != Self::extra_len(head) {
            return None;
        }
        let (payload_len, rest) = match head[1] & 0x7F {
            126 => {
                let (len, rest) = extra.split_at(2);
                (u64::from(u16::from_be_bytes([len[0], len[1]])), rest)
            }
            127 => {
                let (len, rest) = extra.split_at(8);
                let mut bytes = [0u8; 8];
                bytes.copy_from_slice(len);
                (u64::from_be_bytes(bytes), rest)
            }
            len => (u64::from(len), extra),
        };
        let mask = match rest {
            [a, b, c, d] => Some([*a, *b, *c, *d]),
            _ => None,
        };

        Some(Self {
            fin: head[0] & 0x80 != 0,
            opcode: Opcode::from_bits(head[0]),
            mask,
            payload_len,
        })
    }

    pub fn action(&self, max_payload: usize) -> FrameAction {
        let fits = |limit: usize| usize::try_from(self.payload_len).is_ok_and(|len| len <= limit);
        match self.opcode {
            Opcode::Text if self.fin && self.mask.is_some() && fits(max_payload) => {
                FrameAction::Deliver
            }
            Opcode::Ping if fits(MAX_CONTROL_PAYLOAD) => FrameAction::Pong,
            Opcode::Close => FrameAction::Close,
            _ => FrameAction::Drop,
        }
    }
}

/// What the session does with a received frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameAction {
    /// A complete, masked text message that fits the payload buffer.
    Deliver,
    /// Answer with a pong carrying the same payload.
    Pong,
    /// Answer with a close frame and end the session.
    Close,
    /// Read and discard the payload.
    Drop,
}

/// `Sec-WebSocket-Accept` value for a client's `Sec-WebSocket-Key`.
pub fn accept_key(key: &str) -> Option<String<ACCEPT_KEY_LEN>> {
    let mut hasher = Sha1::new();
    hasher.update(key.trim().as_bytes());
    hasher.update(HANDSHAKE_GUID);
    let digest = hasher.finalize();

    let mut encoded = [0u8; ACCEPT_KEY_LEN];
    let n = STANDARD.encode_slice(digest, &mut encoded).ok()?;
    let mut accept = String::new();
    accept
        .push_str(core::str::from_utf8(&encoded[..n]).ok()?)
        .ok()?;
    Some(accept)
}

pub fn unmask(payload: &mut [u8], mask: [u8; 4]) {
    for (i, byte) in payload.iter_mut().enumerate() {
        *byte ^= mask[i % 4];
    }
}

/// Encode an unmasked, final control frame into `out`.
///
/// Returns the frame length, or `None` if the payload is too long for a
/// control frame or `out` is too small.
pub fn encode_control(opcode: Opcode, payload: &[u8], out: &mut [u8]) -> Option<usize> {
    if payload.len() > MAX_CONTROL_PAYLOAD {
        return None;
    }
    let len = payload.len() + 2;
    let frame = out.get_mut(..len)?;
    frame[0] = 0x80 | opcode.bits();
    frame[1] = u8::try_from(payload.len()).ok()?;
    frame[2..].copy_from_slice(payload);
    Some(len)
}
