use std::net::SocketAddr;

use http::StatusCode;
use tracing::{info, warn};

use crate::error::PlaybackError;
use crate::playback::{StartOutcome, StopOutcome};
use crate::volume::Volume;

use super::App;
use super::gate::{GateDecision, authorize};
use super::http::{HttpRequest, HttpResponse};
use super::page::{ICON_PNG, render_index};

enum Route {
    Index,
    Start,
    Stop,
    Volume,
    Icon,
}

/// Resolves the route, applies the access gate and runs the handler.
pub(crate) async fn handle_request(
    app: &App,
    request: &HttpRequest,
    origin: Option<SocketAddr>,
) -> HttpResponse {
    let route = match resolve(request.method.as_str(), request.path.as_str()) {
        Ok(route) => route,
        Err(response) => return response,
    };

    if !matches!(route, Route::Icon) {
        match authorize(origin, request.header("authorization"), &app.credentials) {
            GateDecision::Allow => {}
            GateDecision::Reject { challenge } => {
                let response = HttpResponse::text(StatusCode::UNAUTHORIZED, "Unauthorized");
                return if challenge {
                    response.with_header("WWW-Authenticate", "Basic realm=\"Restricted\"")
                } else {
                    response
                };
            }
        }
    }

    match route {
        Route::Index => index(app).await,
        Route::Start => start(app).await,
        Route::Stop => stop(app).await,
        Route::Volume => update_volume(app, request).await,
        Route::Icon => HttpResponse::png(ICON_PNG),
    }
}

fn resolve(method: &str, path: &str) -> Result<Route, HttpResponse> {
    let (route, allowed) = match path {
        "/" => (Route::Index, "GET"),
        "/start" => (Route::Start, "POST"),
        "/stop" => (Route::Stop, "POST"),
        "/volume" => (Route::Volume, "POST"),
        "/icon.png" => (Route::Icon, "GET"),
        _ => return Err(HttpResponse::text(StatusCode::NOT_FOUND, "Not found")),
    };
    if method == allowed {
        Ok(route)
    } else {
        Err(
            HttpResponse::text(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
                .with_header("Allow", allowed),
        )
    }
}

async fn index(app: &App) -> HttpResponse {
    let status = app.playback.status().await;
    let volume = app.volume.get().await;
    HttpResponse::html(render_index(status, &volume))
}

async fn start(app: &App) -> HttpResponse {
    match app.playback.start().await {
        Ok(StartOutcome::Started { pid }) => {
            HttpResponse::text(StatusCode::OK, format!("Process started with PID {}", pid))
        }
        Ok(StartOutcome::AlreadyRunning { .. }) => {
            HttpResponse::text(StatusCode::OK, "Process is already running")
        }
        Err(err) => {
            warn!("Start failed: {}", err);
            HttpResponse::text(StatusCode::INTERNAL_SERVER_ERROR, start_failure_message(&err))
        }
    }
}

fn start_failure_message(err: &PlaybackError) -> String {
    match err {
        PlaybackError::Download(source) => format!("Failed to download file: {}", source),
        PlaybackError::Volume(source) => format!("Failed to set volume: {}", source),
        PlaybackError::WriteMarker { .. } => format!("Failed to record process: {}", err),
        PlaybackError::Spawn { .. }
        | PlaybackError::MissingPid { .. }
        | PlaybackError::CreateBaseDir { .. }
        | PlaybackError::ReadMarker { .. }
        | PlaybackError::InvalidMarker { .. }
        | PlaybackError::RemoveMarker { .. }
        | PlaybackError::ProcessNotFound { .. }
        | PlaybackError::Signal { .. } => format!("Failed to start process: {}", err),
    }
}

async fn stop(app: &App) -> HttpResponse {
    match app.playback.stop().await {
        Ok(StopOutcome::Stopped { .. } | StopOutcome::NotRunning) => {
            HttpResponse::text(StatusCode::OK, "Process stopped")
        }
        Err(err) => {
            warn!("Stop failed: {}", err);
            HttpResponse::text(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to stop process: {}", err),
            )
        }
    }
}

async fn update_volume(app: &App, request: &HttpRequest) -> HttpResponse {
    let level = request
        .query_param("volume")
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .and_then(|value| Volume::new(value).ok());
    let Some(level) = level else {
        return HttpResponse::text(StatusCode::BAD_REQUEST, "Invalid volume parameter");
    };

    match app.volume.set(level).await {
        Ok(()) => {
            info!("Volume set to {}", level);
            HttpResponse::text(StatusCode::OK, format!("Volume set to {}", level))
        }
        Err(err) => {
            warn!("Setting volume to {} failed: {}", level, err);
            HttpResponse::text(StatusCode::INTERNAL_SERVER_ERROR, "Error setting volume")
        }
    }
}
