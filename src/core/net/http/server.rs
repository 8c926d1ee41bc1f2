use embassy_net::{Stack, tcp::TcpSocket};
use embassy_time::Duration;
use log::{debug, warn};

use super::{Error, HttpResult, connection::HttpConnection};

pub(crate) trait HttpHandler {
    async fn handle_request(&self, conn: HttpConnection<'_>) -> HttpResult;
}

pub(crate) struct HttpServer<'a, T: HttpHandler> {
    handler: &'a T,
    timeout: Duration,
}

impl<'a, T: HttpHandler> HttpServer<'a, T> {
    pub(crate) fn new(handler: &'a T, timeout: Duration) -> Self {
        Self { handler, timeout }
    }
}

impl<T: HttpHandler> HttpServer<'_, T> {
    pub(crate) async fn listen_and_serve(
        &self,
        stack: Stack<'static>,
        port: u16,
        rx_buffer: &mut [u8],
        tx_buffer: &mut [u8],
    ) -> ! {
        loop {
            let mut socket = TcpSocket::new(stack, rx_buffer, tx_buffer);
            socket.set_timeout(Some(self.timeout));

            if socket.accept(port).await.is_err() {
                continue;
            }

            let conn = match HttpConnection::from_socket(socket).await {
                Ok(connection) => connection,
                Err(Error::Closed) => continue,
                Err(e) => {
                    warn!("http: connection startup error: {:?}", e);
                    continue;
                }
            };

            if let Err(e) = self.handler.handle_request(conn).await {
                debug!("http: connection error: {:?}", e);
            }
        }
    }
}
