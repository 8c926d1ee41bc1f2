use log::{debug, info};
use myrtio_strip_core::push::PushOutcome;

use super::dependencies::STRIP_CONTROLLER;
use crate::core::net::{
    http::HttpResult,
    ws::{Message, WebSocket},
};

/// Apply push messages until the client closes the session.
pub(crate) async fn run_push_session(mut socket: WebSocket<'_>) -> HttpResult {
    info!("push: session opened");
    loop {
        match socket.read_message().await? {
            Message::Text(payload) => {
                let outcome = STRIP_CONTROLLER
                    .with(|controller| controller.handle_push(payload))
                    .await;
                if outcome != Some(PushOutcome::Applied) {
                    debug!("push: message had no effect");
                }
            }
            Message::Skipped => {}
            Message::Close => {
                info!("push: session closed");
                return Ok(());
            }
        }
    }
}
