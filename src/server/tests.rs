use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use ::http::StatusCode;
use base64::Engine as _;

use super::http::{HttpRequest, HttpResponse};
use super::routes::handle_request;
use super::{App, CredentialSource, Credentials};
use crate::playback::test_support::{Harness, harness, read_marker};
use crate::volume::Volume;

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn app_for(h: &Harness, credentials: CredentialSource) -> App {
    App {
        playback: Arc::clone(&h.playback),
        volume: h.mixer.clone(),
        credentials,
    }
}

fn request(method: &str, target: &str, headers: &[(&str, &str)]) -> HttpRequest {
    let (path, raw_query) = target.split_once('?').unwrap_or((target, ""));
    HttpRequest {
        method: method.to_owned(),
        path: path.to_owned(),
        query: url::form_urlencoded::parse(raw_query.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect(),
        headers: headers
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect::<HashMap<_, _>>(),
        body: Vec::new(),
    }
}

fn local() -> Option<SocketAddr> {
    Some(SocketAddr::from(([192, 168, 1, 50], 40000)))
}

fn public() -> Option<SocketAddr> {
    Some(SocketAddr::from(([203, 0, 113, 7], 40000)))
}

fn expect(response: &HttpResponse, status: StatusCode, body: &str) -> Result<(), String> {
    if response.status != status || response.body_text() != body {
        return Err(format!(
            "Expected {} {:?}, got {} {:?}",
            status,
            body,
            response.status,
            response.body_text()
        ));
    }
    Ok(())
}

#[test]
fn start_status_stop_scenario() -> Result<(), String> {
    run_async_test(async {
        let h = harness()?;
        let app = app_for(&h, CredentialSource::Fixed(None));

        let page = handle_request(&app, &request("GET", "/", &[]), local()).await;
        if page.status != StatusCode::OK || !page.body_text().contains(">not running</span>") {
            return Err("Expected not running page".to_owned());
        }

        let started = handle_request(&app, &request("POST", "/start", &[]), local()).await;
        let pid = read_marker(&h.settings.pid_file()).ok_or_else(|| "Missing marker".to_owned())?;
        expect(
            &started,
            StatusCode::OK,
            &format!("Process started with PID {}", pid),
        )?;
        if h.mixer.set_calls() != vec![Volume::from_percent(50)] {
            return Err("Expected default volume 50".to_owned());
        }

        let again = handle_request(&app, &request("POST", "/start", &[]), local()).await;
        expect(&again, StatusCode::OK, "Process is already running")?;

        let page = handle_request(&app, &request("GET", "/", &[]), local()).await;
        if !page.body_text().contains(">running</span>") {
            return Err("Expected running page".to_owned());
        }

        let stopped = handle_request(&app, &request("POST", "/stop", &[]), local()).await;
        expect(&stopped, StatusCode::OK, "Process stopped")?;
        if h.settings.pid_file().exists() {
            return Err("Marker should be gone".to_owned());
        }

        let stopped_again = handle_request(&app, &request("POST", "/stop", &[]), local()).await;
        expect(&stopped_again, StatusCode::OK, "Process stopped")
    })
}

#[test]
fn volume_out_of_range_is_rejected_without_mixer() -> Result<(), String> {
    run_async_test(async {
        let h = harness()?;
        let app = app_for(&h, CredentialSource::Fixed(None));
        for target in [
            "/volume?volume=150",
            "/volume?volume=-3",
            "/volume?volume=loud",
            "/volume",
        ] {
            let response = handle_request(&app, &request("POST", target, &[]), local()).await;
            expect(&response, StatusCode::BAD_REQUEST, "Invalid volume parameter")?;
        }
        if !h.mixer.set_calls().is_empty() {
            return Err("Mixer must not be touched".to_owned());
        }
        Ok(())
    })
}

#[test]
fn volume_in_range_is_applied() -> Result<(), String> {
    run_async_test(async {
        let h = harness()?;
        let app = app_for(&h, CredentialSource::Fixed(None));
        let response =
            handle_request(&app, &request("POST", "/volume?volume=35", &[]), local()).await;
        expect(&response, StatusCode::OK, "Volume set to 35")?;
        if h.mixer.set_calls() != vec![Volume::from_percent(35)] {
            return Err("Expected mixer set to 35".to_owned());
        }
        Ok(())
    })
}

#[test]
fn volume_backend_failure_is_500() -> Result<(), String> {
    run_async_test(async {
        let h = harness()?;
        h.mixer
            .fail
            .store(true, std::sync::atomic::Ordering::SeqCst);
        let app = app_for(&h, CredentialSource::Fixed(None));
        let response =
            handle_request(&app, &request("POST", "/volume?volume=35", &[]), local()).await;
        expect(&response, StatusCode::INTERNAL_SERVER_ERROR, "Error setting volume")?;

        let page = handle_request(&app, &request("GET", "/", &[]), local()).await;
        if !page.body_text().contains("Error getting volume") {
            return Err("Expected volume error on page".to_owned());
        }
        Ok(())
    })
}

#[test]
fn start_download_failure_is_500() -> Result<(), String> {
    run_async_test(async {
        let h = harness()?;
        std::fs::remove_file(h.settings.asset_path())
            .map_err(|err| format!("remove failed: {}", err))?;
        let app = app_for(&h, CredentialSource::Fixed(None));
        let response = handle_request(&app, &request("POST", "/start", &[]), local()).await;
        if response.status != StatusCode::INTERNAL_SERVER_ERROR
            || !response.body_text().starts_with("Failed to download file: ")
        {
            return Err(format!("Unexpected response: {:?}", response.body_text()));
        }
        Ok(())
    })
}

#[test]
fn start_marker_failure_is_500() -> Result<(), String> {
    run_async_test(async {
        let h = harness()?;
        std::fs::create_dir(h.settings.pid_file())
            .map_err(|err| format!("create dir failed: {}", err))?;
        let app = app_for(&h, CredentialSource::Fixed(None));
        let response = handle_request(&app, &request("POST", "/start", &[]), local()).await;
        if response.status != StatusCode::INTERNAL_SERVER_ERROR
            || !response.body_text().starts_with("Failed to record process: ")
        {
            return Err(format!("Unexpected response: {:?}", response.body_text()));
        }
        Ok(())
    })
}

#[test]
fn stop_with_unresolvable_pid_is_500() -> Result<(), String> {
    run_async_test(async {
        let h = harness()?;
        let app = app_for(&h, CredentialSource::Fixed(None));
        let started = handle_request(&app, &request("POST", "/start", &[]), local()).await;
        expect(&started, StatusCode::OK, "Process started with PID 4000")?;
        h.supervisor
            .vanish_on_signal
            .store(true, std::sync::atomic::Ordering::SeqCst);

        let response = handle_request(&app, &request("POST", "/stop", &[]), local()).await;
        expect(
            &response,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to stop process: process 4000 could not be found",
        )?;
        if read_marker(&h.settings.pid_file()).is_some() {
            return Err("Marker should be cleared".to_owned());
        }
        Ok(())
    })
}

#[test]
fn public_origin_requires_credentials() -> Result<(), String> {
    run_async_test(async {
        let h = harness()?;
        let app = app_for(
            &h,
            CredentialSource::Fixed(Some(Credentials {
                user: "alice".to_owned(),
                password: "s3cret".to_owned(),
            })),
        );

        let denied = handle_request(&app, &request("GET", "/", &[]), public()).await;
        expect(&denied, StatusCode::UNAUTHORIZED, "Unauthorized")?;
        if !denied
            .headers
            .iter()
            .any(|(name, value)| *name == "WWW-Authenticate" && value.contains("Basic"))
        {
            return Err("Expected Basic challenge".to_owned());
        }

        let token = base64::engine::general_purpose::STANDARD.encode("alice:s3cret");
        let header = format!("Basic {}", token);
        let allowed = handle_request(
            &app,
            &request("GET", "/", &[("authorization", header.as_str())]),
            public(),
        )
        .await;
        if allowed.status != StatusCode::OK {
            return Err(format!("Expected 200, got {}", allowed.status));
        }
        Ok(())
    })
}

#[test]
fn public_origin_blocked_without_configured_credentials() -> Result<(), String> {
    run_async_test(async {
        let h = harness()?;
        let app = app_for(&h, CredentialSource::Fixed(None));
        let denied = handle_request(&app, &request("POST", "/start", &[]), public()).await;
        expect(&denied, StatusCode::UNAUTHORIZED, "Unauthorized")?;
        if h.supervisor.spawn_count() != 0 {
            return Err("Handler must not run".to_owned());
        }
        let unknown = handle_request(&app, &request("GET", "/", &[]), None).await;
        expect(&unknown, StatusCode::UNAUTHORIZED, "Unauthorized")
    })
}

#[test]
fn icon_is_served_without_gate() -> Result<(), String> {
    run_async_test(async {
        let h = harness()?;
        let app = app_for(&h, CredentialSource::Fixed(None));
        let response = handle_request(&app, &request("GET", "/icon.png", &[]), public()).await;
        if response.status != StatusCode::OK || response.content_type != "image/png" {
            return Err(format!("Unexpected icon response: {}", response.status));
        }
        Ok(())
    })
}

#[test]
fn unknown_routes_and_methods() -> Result<(), String> {
    run_async_test(async {
        let h = harness()?;
        let app = app_for(&h, CredentialSource::Fixed(None));
        let missing = handle_request(&app, &request("GET", "/nope", &[]), local()).await;
        expect(&missing, StatusCode::NOT_FOUND, "Not found")?;
        let wrong = handle_request(&app, &request("GET", "/start", &[]), local()).await;
        expect(&wrong, StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")?;
        if h.supervisor.spawn_count() != 0 {
            return Err("GET /start must not spawn".to_owned());
        }
        Ok(())
    })
}
