//! Push-channel messages.
//!
//! A message is one JSON object carrying any of:
//!
//! - `manual: bool` sets the global manual flag,
//! - `led: int` with `state: bool` sets a pixel mask bit; with `strip: int`
//!   only that strip is addressed, otherwise every strip long enough is,
//! - `brightness: int` sets the brightness of every strip.
//!
//! Messages that fail to parse or pair the fields incorrectly are dropped
//! as a whole.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct PushMessage {
    pub manual: Option<bool>,
    pub led: Option<u16>,
    pub state: Option<bool>,
    pub strip: Option<u8>,
    pub brightness: Option<u8>,
}

impl PushMessage {
    /// Parse a text frame payload. Returns `None` for anything malformed.
    pub fn parse(payload: &[u8]) -> Option<Self> {
        let (message, _) = serde_json_core::from_slice::<Self>(payload).ok()?;
        message.is_well_formed().then_some(message)
    }

    fn is_well_formed(&self) -> bool {
        self.led.is_some() == self.state.is_some() && (self.strip.is_none() || self.led.is_some())
    }

    /// Pixel write carried by the message, if any.
    pub fn pixel(&self) -> Option<PixelWrite> {
        let (led, active) = self.led.zip(self.state)?;
        Some(PixelWrite {
            target: match self.strip {
                Some(strip) => PixelTarget::Strip(usize::from(strip)),
                None => PixelTarget::Broadcast,
            },
            index: usize::from(led),
            active,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelTarget {
    /// Every strip whose pixel count exceeds the index.
    Broadcast,
    Strip(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelWrite {
    pub target: PixelTarget,
    pub index: usize,
    pub active: bool,
}

/// Result of handling one push message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// At least one field changed the configuration.
    Applied,
    /// The message was dropped or changed nothing.
    Ignored,
}
