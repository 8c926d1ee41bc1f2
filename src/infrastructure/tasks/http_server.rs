//! HTTP Server Task
//!
//! Serves the request/response API and upgrades `/ws` to push sessions. A
//! push session keeps its worker, so several workers share the port.

use embassy_net::Stack;
use embassy_time::Duration;

use crate::{
    config,
    controllers::StripHttpController,
    core::net::http::HttpServer,
};

pub const HTTP_WORKERS: usize = 3;

const RX_BUFFER_SIZE: usize = 2048;
const TX_BUFFER_SIZE: usize = 2048;

#[embassy_executor::task(pool_size = HTTP_WORKERS)]
pub async fn http_server_task(stack: Stack<'static>, handler: &'static StripHttpController) {
    let mut rx_buffer = [0u8; RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TX_BUFFER_SIZE];

    let server = HttpServer::new(
        handler,
        Duration::from_secs(config::HTTP.socket_timeout_secs),
    );
    server
        .listen_and_serve(stack, config::HTTP.port, &mut rx_buffer, &mut tx_buffer)
        .await
}
