use alloc::{vec, vec::Vec};

use embassy_net::tcp::TcpSocket;
use embedded_io_async::Write as _;
use heapless::String;
use log::debug;
use serde::Serialize;

use super::{
    Error,
    HttpResult,
    headers::{
        ContentHeaders,
        ContentType,
        HttpMethod,
        ResponseHeaders,
        TargetWriter as _,
        TextEncoding,
        find_content_length,
        find_header,
        is_websocket_upgrade,
        parse_request_line,
        read_heading,
    },
};
use crate::core::net::ws::WebSocket;

const HEADER_BUFFER_SIZE: usize = 1024;
const BODY_RX_CHUNK_SIZE: usize = 256;
const STREAM_CHUNK_SIZE: usize = 1024;

pub(crate) const MAX_PATH_LEN: usize = 64;
pub(crate) const MAX_QUERY_LEN: usize = 512;
const MAX_KEY_LEN: usize = 32;

/// Serialize `data` as JSON into a heap buffer of at most `capacity` bytes.
pub(crate) fn to_json<T: Serialize>(data: &T, capacity: usize) -> Result<Vec<u8>, Error> {
    let mut body = vec![0u8; capacity];
    let n = serde_json_core::to_slice(data, body.as_mut_slice()).map_err(|_| Error::TooLarge)?;
    body.truncate(n);
    Ok(body)
}

/// HTTP connection context
pub(crate) struct HttpConnection<'a> {
    pub method: HttpMethod,
    pub path: String<MAX_PATH_LEN>,
    pub query: String<MAX_QUERY_LEN>,

    socket: TcpSocket<'a>,
    websocket_key: Option<String<MAX_KEY_LEN>>,
    content_length: usize,
    header_end: usize,
    header_len: usize,
    header_buf: [u8; HEADER_BUFFER_SIZE],
}

impl<'a> HttpConnection<'a> {
    /// Create a new HTTP connection from a socket.
    pub(crate) async fn from_socket(mut socket: TcpSocket<'a>) -> Result<Self, Error> {
        let mut header_buf = [0u8; HEADER_BUFFER_SIZE];
        let (header_end, header_len) = read_heading(&mut header_buf, &mut socket).await?;
        if header_len == 0 {
            return Err(Error::Closed);
        }

        // Only parse the headers portion (before body data) to avoid UB with binary
        // data
        let header_str =
            core::str::from_utf8(&header_buf[..header_end]).map_err(|_| Error::Parse)?;
        let (method, target, rest_headers) = parse_request_line(header_str).ok_or(Error::Parse)?;
        let content_length = find_content_length(rest_headers).unwrap_or(0);

        let (raw_path, raw_query) = target.split_once('?').unwrap_or((target, ""));
        let mut path = String::new();
        path.push_str(raw_path).map_err(|()| Error::TooLarge)?;
        let mut query = String::new();
        query.push_str(raw_query).map_err(|()| Error::TooLarge)?;

        let websocket_key = if is_websocket_upgrade(rest_headers) {
            find_header(rest_headers, "sec-websocket-key").and_then(|key| {
                let mut value = String::new();
                value.push_str(key).ok().map(|()| value)
            })
        } else {
            None
        };

        debug!("http: {:?} {} ({} byte body)", method, path, content_length);
        Ok(Self {
            method,
            path,
            query,
            socket,
            websocket_key,
            content_length,
            header_end,
            header_len,
            header_buf,
        })
    }

    /// Get request method and path
    pub(crate) fn route(&self) -> (HttpMethod, &'_ str) {
        (self.method, self.path.as_str())
    }

    /// `Sec-WebSocket-Key` of an upgrade request.
    pub(crate) fn websocket_key(&self) -> Option<&str> {
        self.websocket_key.as_deref()
    }

    /// Write the headers to the connection
    pub(crate) async fn write_headers(&mut self, headers: &ResponseHeaders) -> HttpResult {
        let mut buf = String::<HEADER_BUFFER_SIZE>::new();
        headers.write_to(&mut buf)?;
        self.write_all(buf.as_bytes()).await
    }

    /// Write the body to the connection
    pub(crate) async fn write_body(&mut self, body: &[u8]) -> HttpResult {
        for chunk in body.chunks(STREAM_CHUNK_SIZE) {
            self.write_all(chunk).await?;
        }
        Ok(())
    }

    /// Write a serialized JSON body with a success status.
    pub(crate) async fn write_json(&mut self, body: &[u8]) -> HttpResult {
        let headers = ResponseHeaders::success()
            .with_content(ContentHeaders::new(ContentType::Json).with_length(body.len()));
        self.write_headers(&headers).await?;
        self.write_body(body).await
    }

    /// Write a plain-text reply.
    pub(crate) async fn write_text(&mut self, headers: ResponseHeaders, text: &str) -> HttpResult {
        let content = ContentHeaders::new(ContentType::TextPlain)
            .with_text_encoding(TextEncoding::Utf8)
            .with_length(text.len());
        self.write_headers(&headers.with_content(content)).await?;
        self.write_body(text.as_bytes()).await
    }

    /// Read the request body, refusing bodies larger than `limit`.
    pub(crate) async fn read_body(&mut self, limit: usize) -> Result<Vec<u8>, Error> {
        if self.content_length == 0 {
            return Err(Error::NoData);
        }
        if self.content_length > limit {
            return Err(Error::TooLarge);
        }

        let mut body = Vec::with_capacity(self.content_length);
        let tail = &self.header_buf[self.header_end..self.header_len];
        body.extend_from_slice(&tail[..tail.len().min(self.content_length)]);

        let mut buf = [0u8; BODY_RX_CHUNK_SIZE];
        while body.len() < self.content_length {
            let wanted = (self.content_length - body.len()).min(BODY_RX_CHUNK_SIZE);
            let n = self.socket.read(&mut buf[..wanted]).await?;
            if n == 0 {
                return Err(Error::Closed);
            }
            body.extend_from_slice(&buf[..n]);
        }

        Ok(body)
    }

    /// Complete the WebSocket handshake and hand the socket over.
    pub(crate) async fn into_websocket(
        mut self,
        headers: ResponseHeaders,
    ) -> Result<WebSocket<'a>, Error> {
        self.write_headers(&headers).await?;
        Ok(WebSocket::new(self.socket))
    }

    async fn write_all(&mut self, buf: &[u8]) -> HttpResult {
        self.socket.write_all(buf).await?;
        self.socket.flush().await?;
        Ok(())
    }
}
