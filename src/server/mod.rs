//! HTTP front end: one listener, one task per connection, `Connection: close`.
mod gate;
mod http;
mod page;
mod routes;

#[cfg(test)]
mod tests;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult, ServerError};
use crate::playback::Playback;
use crate::shutdown::ShutdownReceiver;
use crate::volume::VolumeBackend;

pub use gate::{CredentialSource, Credentials, constant_time_eq, parse_basic_auth, requires_auth};

use self::http::{HttpResponse, read_http_request, write_response};

/// Shared state handed to every connection.
pub struct App {
    pub playback: Arc<Playback>,
    pub volume: Arc<dyn VolumeBackend>,
    pub credentials: CredentialSource,
}

/// Binds the listener.
///
/// # Errors
///
/// Returns an error when the address cannot be bound.
pub async fn bind(addr: &str) -> AppResult<TcpListener> {
    TcpListener::bind(addr).await.map_err(|err| {
        AppError::server(ServerError::Bind {
            addr: addr.to_owned(),
            source: err,
        })
    })
}

/// Accepts connections until shutdown fires, then stops any running player.
///
/// # Errors
///
/// Returns an error when the listener address cannot be read.
pub async fn serve(
    listener: TcpListener,
    app: Arc<App>,
    mut shutdown_rx: ShutdownReceiver,
) -> AppResult<()> {
    let local = listener
        .local_addr()
        .map_err(|err| AppError::server(ServerError::LocalAddr { source: err }))?;
    info!("Server running on {}", local);

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(result) => result,
                    Err(err) => {
                        warn!("Failed to accept connection: {}", err);
                        continue;
                    }
                };
                let app = Arc::clone(&app);
                tokio::spawn(async move {
                    handle_connection(stream, Some(peer), &app).await;
                });
            }
        }
    }

    info!("Shutting down");
    app.playback.shutdown().await;
    Ok(())
}

async fn handle_connection(mut socket: TcpStream, origin: Option<SocketAddr>, app: &App) {
    let response = match read_http_request(&mut socket).await {
        Ok(request) => {
            debug!(
                "{} {} ({} byte body) from {:?}",
                request.method,
                request.path,
                request.body.len(),
                origin
            );
            routes::handle_request(app, &request, origin).await
        }
        Err(err) => {
            debug!("Malformed request from {:?}: {}", origin, err.message);
            HttpResponse::from(err)
        }
    };
    if let Err(err) = write_response(&mut socket, &response).await {
        debug!("{}", err);
    }
}
