//! Typed control requests parsed from form-encoded query strings.

use core::{fmt, str::FromStr};

use heapless::{String, Vec};

use crate::{
    error::RequestError,
    limits::{MAX_GROUP_SPEC_LEN, SPEED_RANGE},
    strip::{StripId, StripMode},
};

const MAX_VALUE_LEN: usize = 32;

/// A validated mutation request.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Toggle { strip: StripId, led: usize },
    SetBrightness { strip: StripId, value: u8 },
    SetSpeed { strip: StripId, value: f32 },
    SetMode { strip: StripId, mode: StripMode },
    DefineGroup { strip: StripId, spec: String<MAX_GROUP_SPEC_LEN> },
    AddStrip { pin: u8, leds: usize },
    RemoveStrip { strip: StripId },
    SetManual { value: bool },
    SetOptions(Options),
}

/// Partial update of the global flags. At least one field is set.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Options {
    pub randomize: Option<bool>,
    pub randomize_interval: Option<u16>,
    pub status_led_brightness: Option<u8>,
    pub selected_mode: Option<StripMode>,
}

impl Request {
    /// Parse an action name (the path below `/api/`) and its query string.
    pub fn parse(action: &str, query: &str) -> Result<Self, RequestError> {
        let query = Query::new(query);
        let request = match action {
            "toggle" => Request::Toggle {
                strip: query.parse("strip")?,
                led: query.parse("led")?,
            },
            "brightness" => Request::SetBrightness {
                strip: query.parse("strip")?,
                value: query.parse("value")?,
            },
            "speed" => Request::SetSpeed {
                strip: query.parse("strip")?,
                value: parse_speed(&query)?,
            },
            "mode" => Request::SetMode {
                strip: query.parse("strip")?,
                mode: parse_mode(&query, "mode")?,
            },
            "group" => Request::DefineGroup {
                strip: query.parse("strip")?,
                spec: query.text("spec")?,
            },
            "strip/add" => Request::AddStrip {
                pin: query.parse("pin")?,
                leds: query.parse("leds")?,
            },
            "strip/remove" => Request::RemoveStrip {
                strip: query.parse("strip")?,
            },
            "manual" => Request::SetManual {
                value: parse_bool(&query, "value")?,
            },
            "options" => Request::SetOptions(parse_options(&query)?),
            _ => return Err(RequestError::UnknownAction),
        };
        Ok(request)
    }
}

/// Successful outcome of a request, rendered as the plain-text reply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reply {
    Pixel(bool),
    Brightness(u8),
    Speed(f32),
    Mode(StripMode),
    Group { index: usize, size: usize },
    Added(StripId),
    Removed(StripId),
    Manual(bool),
    Saved,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Pixel(true) => f.write_str("ON"),
            Reply::Pixel(false) => f.write_str("OFF"),
            Reply::Brightness(value) => write!(f, "{value}"),
            Reply::Speed(value) => write!(f, "{value}"),
            Reply::Mode(mode) => write!(f, "{mode}"),
            Reply::Group { index, size } => write!(f, "group {index}: {size} leds"),
            Reply::Added(id) | Reply::Removed(id) => write!(f, "{id}"),
            Reply::Manual(value) => write!(f, "{value}"),
            Reply::Saved => f.write_str("saved"),
        }
    }
}

fn parse_speed(query: &Query<'_>) -> Result<f32, RequestError> {
    let value: f32 = query.parse("value")?;
    if SPEED_RANGE.contains(&value) {
        Ok(value)
    } else {
        Err(RequestError::Invalid("value"))
    }
}

fn parse_mode(query: &Query<'_>, key: &'static str) -> Result<StripMode, RequestError> {
    let value: String<MAX_VALUE_LEN> = query.text(key)?;
    StripMode::parse(value.trim()).ok_or(RequestError::Invalid(key))
}

fn parse_bool(query: &Query<'_>, key: &'static str) -> Result<bool, RequestError> {
    let value: String<MAX_VALUE_LEN> = query.text(key)?;
    match value.trim() {
        "true" | "1" | "on" => Ok(true),
        "false" | "0" | "off" => Ok(false),
        _ => Err(RequestError::Invalid(key)),
    }
}

fn parse_options(query: &Query<'_>) -> Result<Options, RequestError> {
    let options = Options {
        randomize: optional(query, "randomize", parse_bool)?,
        randomize_interval: optional(query, "interval", |q, key| q.parse(key))?,
        status_led_brightness: optional(query, "statusBrightness", |q, key| q.parse(key))?,
        selected_mode: optional(query, "mode", parse_mode)?,
    };
    if options == Options::default() {
        return Err(RequestError::Missing("option"));
    }
    Ok(options)
}

fn optional<T>(
    query: &Query<'_>,
    key: &'static str,
    parse: impl FnOnce(&Query<'_>, &'static str) -> Result<T, RequestError>,
) -> Result<Option<T>, RequestError> {
    if query.raw(key).is_some() {
        parse(query, key).map(Some)
    } else {
        Ok(None)
    }
}

/// `application/x-www-form-urlencoded` query string.
struct Query<'a> {
    raw: &'a str,
}

impl<'a> Query<'a> {
    fn new(raw: &'a str) -> Self {
        Self {
            raw: raw.strip_prefix('?').unwrap_or(raw),
        }
    }

    /// Raw (still encoded) value of the first pair named `key`.
    fn raw(&self, key: &str) -> Option<&'a str> {
        self.raw
            .split('&')
            .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value)
    }

    fn text<const N: usize>(&self, key: &'static str) -> Result<String<N>, RequestError> {
        let raw = self.raw(key).ok_or(RequestError::Missing(key))?;
        percent_decode(raw).ok_or(RequestError::Invalid(key))
    }

    fn parse<T: FromStr>(&self, key: &'static str) -> Result<T, RequestError> {
        let value: String<MAX_VALUE_LEN> = self.text(key)?;
        let value = value.trim();
        if value.is_empty() {
            return Err(RequestError::Missing(key));
        }
        value.parse().map_err(|_| RequestError::Invalid(key))
    }
}

fn percent_decode<const N: usize>(raw: &str) -> Option<String<N>> {
    let mut bytes = Vec::<u8, N>::new();
    let mut input = raw.bytes();
    while let Some(byte) = input.next() {
        let decoded = match byte {
            b'+' => b' ',
            b'%' => {
                let high = hex_digit(input.next()?)?;
                let low = hex_digit(input.next()?)?;
                (high << 4) | low
            }
            other => other,
        };
        bytes.push(decoded).ok()?;
    }
    let mut text = String::new();
    text.push_str(core::str::from_utf8(&bytes).ok()?).ok()?;
    Some(text)
}

fn hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
