mod args;
mod config;
mod download;
mod entry;
mod error;
mod logger;
mod playback;
mod server;
mod shutdown;
mod shutdown_handlers;
mod volume;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
