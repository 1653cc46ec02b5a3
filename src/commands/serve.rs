use std::{error::Error, path::PathBuf};

use clap::Args;
use rustyoptions::{
    config::{manager::ConfigManager, resolver::get_config_path_cwd},
    filewatcher::watcher,
    http::server,
};
use tracing::info;

/// Run the HTTP server (with optional file-watcher).
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Config file to watch and serve
    #[arg(short, long, value_name = "FILE")]
    pub config: PathBuf,

    /// Disable file-watching
    #[arg(long)]
    pub no_watch: bool,
}

pub async fn run(args: ServeArgs) -> Result<(), Box<dyn Error>> {
    let cfg = get_config_path_cwd(&args.config)?;
    info!(cfg = %cfg.display(), watch_enabled = !args.no_watch, "serving configuration");

    let manager = ConfigManager::new(cfg)?;

    if !args.no_watch {
        watcher::spawn_watcher(manager.clone())?;
    }

    let addr = format!("127.0.0.1:{}", manager.port());
    info!(%addr, "starting HTTP server");

    server::run(&addr, manager.api_handle()).await?;

    Ok(())
}
