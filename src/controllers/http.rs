use core::fmt::Write as _;

use heapless::String;
use log::{info, warn};
use myrtio_strip_core::{
    ControlError,
    StripError,
    document::RecordDocument,
    limits::{MAX_RECORD_SIZE, MAX_STATE_SIZE},
    record::ConfigRecord,
    request::Request,
    ws::accept_key,
};

use super::{
    dependencies::{STRIP_CONTROLLER, network_degraded},
    push::run_push_session,
};
use crate::{
    config,
    core::net::http::{
        Error as HttpError,
        HttpConnection,
        HttpHandler,
        HttpMethod,
        HttpResult,
        ResponseHeaders,
        to_json,
    },
};

const MAX_ACTION_LEN: usize = 32;
const MAX_REPLY_LEN: usize = 64;

enum Route {
    State,
    Record,
    Push,
    Config,
    Action(String<MAX_ACTION_LEN>),
    NotFound,
}

impl Route {
    fn resolve(method: HttpMethod, path: &str) -> Self {
        match (method, path) {
            (HttpMethod::Get, "/api/state") => Route::State,
            (HttpMethod::Get, "/config.json") => Route::Record,
            (HttpMethod::Get, "/ws") => Route::Push,
            (HttpMethod::Post, "/api/config" | "/save") => Route::Config,
            (HttpMethod::Post, path) => path
                .strip_prefix("/api/")
                .and_then(|action| {
                    let mut name = String::new();
                    name.push_str(action).ok().map(|()| name)
                })
                .map_or(Route::NotFound, Route::Action),
            _ => Route::NotFound,
        }
    }
}

#[derive(Debug, Default)]
pub struct StripHttpController;

impl HttpHandler for StripHttpController {
    async fn handle_request(&self, conn: HttpConnection<'_>) -> HttpResult {
        let mut conn = conn;
        let (method, path) = conn.route();
        match Route::resolve(method, path) {
            Route::State => handle_get_state(&mut conn).await,
            Route::Record => handle_get_record(&mut conn).await,
            Route::Push => handle_push_channel(conn).await,
            Route::Config => handle_set_config(&mut conn).await,
            Route::Action(action) => handle_action(&mut conn, &action).await,
            Route::NotFound => serve_404(&mut conn).await,
        }
    }
}

async fn handle_get_state(conn: &mut HttpConnection<'_>) -> HttpResult {
    let body = STRIP_CONTROLLER
        .with(|controller| {
            let state = controller.state(config::BUILD_VERSION, network_degraded());
            to_json(&state, MAX_STATE_SIZE)
        })
        .await
        .ok_or(HttpError::Unavailable);

    match body {
        Ok(Ok(body)) => conn.write_json(&body).await,
        Ok(Err(e)) | Err(e) => serve_error(conn, &e).await,
    }
}

async fn handle_get_record(conn: &mut HttpConnection<'_>) -> HttpResult {
    let body = STRIP_CONTROLLER
        .with(|controller| to_json(&RecordDocument::new(controller.config()), MAX_RECORD_SIZE))
        .await
        .ok_or(HttpError::Unavailable);

    match body {
        Ok(Ok(body)) => conn.write_json(&body).await,
        Ok(Err(e)) | Err(e) => serve_error(conn, &e).await,
    }
}

async fn handle_action(conn: &mut HttpConnection<'_>, action: &str) -> HttpResult {
    let result = match Request::parse(action, conn.query.as_str()) {
        Ok(request) => STRIP_CONTROLLER
            .with(|controller| controller.execute(request))
            .await,
        Err(e) => Some(Err(ControlError::from(e))),
    };

    let mut text = String::<MAX_REPLY_LEN>::new();
    match result {
        Some(Ok(reply)) => {
            write!(text, "{reply}")?;
            conn.write_text(ResponseHeaders::success(), &text).await
        }
        Some(Err(e)) => {
            info!("http: {} rejected: {}", action, e);
            write!(text, "{e}")?;
            conn.write_text(ResponseHeaders::from_code(status_for(e)), &text)
                .await
        }
        None => serve_error(conn, &HttpError::Unavailable).await,
    }
}

async fn handle_set_config(conn: &mut HttpConnection<'_>) -> HttpResult {
    let body = match conn.read_body(MAX_RECORD_SIZE).await {
        Ok(body) => body,
        Err(e @ (HttpError::TooLarge | HttpError::NoData)) => return serve_error(conn, &e).await,
        Err(e) => return Err(e),
    };
    let record = match serde_json_core::from_slice::<ConfigRecord>(&body) {
        Ok((record, _)) => record,
        Err(e) => {
            warn!("http: config body rejected: {:?}", e);
            return conn
                .write_text(ResponseHeaders::bad_request(), "invalid config")
                .await;
        }
    };

    match STRIP_CONTROLLER
        .with(|controller| controller.replace(&record))
        .await
    {
        Some(()) => conn.write_text(ResponseHeaders::success(), "saved").await,
        None => serve_error(conn, &HttpError::Unavailable).await,
    }
}

async fn handle_push_channel(mut conn: HttpConnection<'_>) -> HttpResult {
    let Some(accept) = conn.websocket_key().and_then(accept_key) else {
        return conn
            .write_text(ResponseHeaders::bad_request(), "websocket upgrade required")
            .await;
    };
    let mut socket = conn
        .into_websocket(ResponseHeaders::switching_protocols(accept))
        .await?;
    socket.set_keep_alive(embassy_time::Duration::from_secs(
        config::HTTP.push_keep_alive_secs,
    ));
    run_push_session(socket).await
}

fn status_for(error: ControlError) -> u16 {
    match error {
        ControlError::Strip(StripError::NotFound) => 404,
        ControlError::Strip(StripError::CapacityExceeded | StripError::GroupCapacityExceeded) => {
            409
        }
        _ => 400,
    }
}

async fn serve_error(conn: &mut HttpConnection<'_>, error: &HttpError) -> HttpResult {
    let (code, text) = match error {
        HttpError::NoData => (400, "missing body"),
        HttpError::TooLarge => (413, "too large"),
        HttpError::Unavailable => (503, "starting"),
        _ => (500, "internal error"),
    };
    conn.write_text(ResponseHeaders::from_code(code), text)
        .await
}

async fn serve_404(conn: &mut HttpConnection<'_>) -> HttpResult {
    conn.write_text(ResponseHeaders::not_found(), "not found")
        .await
}
