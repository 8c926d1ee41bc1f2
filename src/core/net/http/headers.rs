use core::fmt::Write;

use embassy_net::tcp::{Error as TcpError, TcpSocket};
use heapless::String;
use myrtio_strip_core::ws::ACCEPT_KEY_LEN;

pub(crate) type StatusCode = u16;

fn reason_phrase(code: StatusCode) -> &'static str {
    match code {
        101 => "Switching Protocols",
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        413 => "Request Entity Too Large",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// HTTP Content Type.
#[derive(Debug)]
pub(crate) enum ContentType {
    Json,
    TextPlain,
}

impl ContentType {
    /// Convert the content type to a string.
    pub(super) fn as_str(&self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
            ContentType::TextPlain => "text/plain",
        }
    }
}

/// Text Encoding.
#[derive(Debug)]
pub(crate) enum TextEncoding {
    Utf8,
}

impl TextEncoding {
    /// Convert the text encoding to a string.
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
        }
    }
}

/// HTTP socket connection policy.
#[derive(Debug)]
pub(super) enum ConnectionPolicy {
    Close,
    Upgrade,
}

impl ConnectionPolicy {
    /// Convert the connection type to a string.
    pub(super) fn as_str(&self) -> &'static str {
        match self {
            ConnectionPolicy::Close => "close",
            ConnectionPolicy::Upgrade => "Upgrade",
        }
    }
}

pub(super) trait TargetWriter {
    fn write_to(&self, writer: &mut impl Write) -> Result<(), core::fmt::Error>;
}

/// HTTP Content Headers.
pub(crate) struct ContentHeaders {
    content_type: ContentType,
    content_length: Option<usize>,
    text_encoding: Option<TextEncoding>,
}

impl ContentHeaders {
    /// Create a new content headers with a content type.
    pub(crate) const fn new(content_type: ContentType) -> Self {
        Self {
            content_type,
            content_length: None,
            text_encoding: None,
        }
    }

    /// Set the content length.
    #[must_use]
    pub(crate) const fn with_length(mut self, length: usize) -> Self {
        self.content_length = Some(length);
        self
    }

    /// Set the text encoding.
    #[must_use]
    pub(crate) const fn with_text_encoding(mut self, text_encoding: TextEncoding) -> Self {
        self.text_encoding = Some(text_encoding);
        self
    }
}

impl TargetWriter for ContentHeaders {
    fn write_to(&self, writer: &mut impl Write) -> Result<(), core::fmt::Error> {
        write!(writer, "Content-Type: {}", self.content_type.as_str())?;
        if let Some(text_encoding) = &self.text_encoding {
            write!(writer, "; charset={}", text_encoding.as_str())?;
        }
        write!(writer, "\r\n")?;
        if let Some(content_length) = self.content_length {
            write!(writer, "Content-Length: {}\r\n", content_length)?;
        }
        Ok(())
    }
}

/// Response Headers.
pub(crate) struct ResponseHeaders {
    status: StatusCode,
    connection: ConnectionPolicy,
    content: Option<ContentHeaders>,
    accept_key: Option<String<ACCEPT_KEY_LEN>>,
}

impl ResponseHeaders {
    /// Create empty response headers.
    pub(crate) const fn empty() -> Self {
        Self {
            status: 0,
            content: None,
            connection: ConnectionPolicy::Close,
            accept_key: None,
        }
    }

    /// Create empty response headers with a status code.
    pub(crate) const fn from_code(code: StatusCode) -> Self {
        Self::empty().with_code(code)
    }

    /// Set the success status code.
    pub(crate) const fn success() -> Self {
        Self::from_code(200)
    }

    /// Set the not found status code.
    pub(crate) const fn not_found() -> Self {
        Self::from_code(404)
    }

    /// Set the bad request status code.
    pub(crate) const fn bad_request() -> Self {
        Self::from_code(400)
    }

    /// WebSocket handshake response.
    pub(crate) fn switching_protocols(accept_key: String<ACCEPT_KEY_LEN>) -> Self {
        Self {
            status: 101,
            connection: ConnectionPolicy::Upgrade,
            content: None,
            accept_key: Some(accept_key),
        }
    }

    /// Set the content headers.
    #[must_use]
    pub(crate) const fn with_content(mut self, content: ContentHeaders) -> Self {
        self.content = Some(content);
        self
    }

    /// Set the status code.
    #[must_use]
    pub(crate) const fn with_code(mut self, code: StatusCode) -> Self {
        self.status = code;
        self
    }
}

impl TargetWriter for ResponseHeaders {
    /// Write the response headers to a writer.
    fn write_to(&self, writer: &mut impl Write) -> Result<(), core::fmt::Error> {
        let reason = reason_phrase(self.status);
        write!(writer, "HTTP/1.1 {} {}\r\n", self.status, reason)?;
        if let Some(content) = &self.content {
            content.write_to(writer)?;
        }
        if let Some(accept_key) = &self.accept_key {
            write!(writer, "Upgrade: websocket\r\n")?;
            write!(writer, "Sec-WebSocket-Accept: {}\r\n", accept_key)?;
        }

        write!(writer, "Connection: {}\r\n", self.connection.as_str())?;
        write!(writer, "\r\n")?;
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Options,
    Head,
}

impl HttpMethod {
    pub(super) fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            "OPTIONS" => HttpMethod::Options,
            "HEAD" => HttpMethod::Head,
            _ => return None,
        })
    }
}

/// Parse the request line from the header string.
///
/// Returns the method, request target, and rest of the header string.
pub(super) fn parse_request_line(header_str: &str) -> Option<(HttpMethod, &str, &str)> {
    let line_end = header_str.find("\r\n").unwrap_or(header_str.len());
    let first_line = &header_str[..line_end];
    let mut parts = first_line.split_whitespace();
    let method = parts.next().and_then(HttpMethod::parse)?;
    let target = parts.next()?;
    let rest = header_str.get(line_end + 2..).unwrap_or("");

    Some((method, target, rest))
}

/// Read the start line and headers from the socket.
///
/// Returns the position of the end of the headers and the number of bytes
/// read. If the peer closed before sending anything, returns (0, 0).
pub(super) async fn read_heading(
    buf: &mut [u8],
    socket: &mut TcpSocket<'_>,
) -> Result<(usize, usize), TcpError> {
    let mut header_len = 0;
    let mut header_end = None;
    loop {
        let n = socket.read(&mut buf[header_len..]).await?;
        if n == 0 {
            return Ok((0, 0));
        }
        header_len += n;
        if let Some(pos) = buf[..header_len].windows(4).position(|w| w == b"\r\n\r\n") {
            header_end = Some(pos + 4);
            break;
        }
        if header_len >= buf.len() {
            break;
        }
    }

    let header_end = header_end.unwrap_or(header_len);

    Ok((header_end, header_len))
}

/// Find a header value by case-insensitive name.
pub(super) fn find_header<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim()
            .eq_ignore_ascii_case(name)
            .then(|| value.trim())
    })
}

/// Find the content length in the header string.
pub(super) fn find_content_length(header: &str) -> Option<usize> {
    find_header(header, "content-length")?.parse().ok()
}

/// Whether the request asks for a WebSocket upgrade.
pub(super) fn is_websocket_upgrade(header: &str) -> bool {
    let upgrade = find_header(header, "upgrade")
        .is_some_and(|value| value.eq_ignore_ascii_case("websocket"));
    let connection = find_header(header, "connection").is_some_and(|value| {
        value
            .split(',')
            .any(|token| token.trim().eq_ignore_ascii_case("upgrade"))
    });
    upgrade && connection
}
