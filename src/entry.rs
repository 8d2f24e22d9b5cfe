use std::path::Path;
use std::sync::Arc;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::{error, info, warn};

use crate::args::ServerArgs;
use crate::config::{Settings, load_config};
use crate::download::build_client;
use crate::error::{AppError, AppResult, PlaybackError};
use crate::playback::{OsSupervisor, Playback};
use crate::server::{self, App, CredentialSource};
use crate::shutdown_handlers::{setup_signal_shutdown_handler, shutdown_channel};
use crate::volume::{AmixerBackend, VolumeBackend};

pub(crate) fn run() -> AppResult<()> {
    let (args, matches) = parse_args()?;

    crate::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args, &matches))
}

/// Creates the directory holding the marker and the cached asset.
async fn ensure_base_dir(path: &Path) -> Result<(), PlaybackError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|err| PlaybackError::CreateBaseDir {
            path: path.to_path_buf(),
            source: err,
        })
}

fn parse_args() -> AppResult<(ServerArgs, ArgMatches)> {
    let matches = ServerArgs::command().get_matches();
    let args = ServerArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

async fn run_async(args: ServerArgs, matches: &ArgMatches) -> AppResult<()> {
    let file = load_config(args.config.as_deref())?;
    let settings = Settings::resolve(&args, matches, file)?;

    if let Err(err) = ensure_base_dir(&settings.base_dir).await {
        error!("{}", err);
        return Err(AppError::playback(err));
    }

    let client = build_client()?;
    let volume: Arc<dyn VolumeBackend> = Arc::new(AmixerBackend::new(&settings.mixer));
    let playback = Arc::new(Playback::new(
        &settings,
        client,
        Arc::new(OsSupervisor),
        Arc::clone(&volume),
    ));

    // A previous run may have left its player behind.
    if playback.status().await.is_running() {
        info!("Stopping playback left over from a previous run");
        playback.shutdown().await;
    }

    let credentials = CredentialSource::Environment;
    if credentials.load().is_none() {
        warn!("AUTH_USER and AUTH_PASSWORD are not set; only private-network clients are served");
    }

    let listener = server::bind(&settings.listen).await?;
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let app = Arc::new(App {
        playback,
        volume,
        credentials,
    });
    let result = server::serve(listener, app, shutdown_rx).await;

    signal_handle.abort();
    result
}
