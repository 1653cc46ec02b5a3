use notify::{recommended_watcher, Event, RecursiveMode, Watcher};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::config::manager::ConfigManager;

/// Watch the configuration folder and reload the manager on every change.
pub fn spawn_watcher(manager: ConfigManager) -> notify::Result<()> {
    let rt_handle = Handle::current();
    let (tx, mut rx) = mpsc::channel::<notify::Result<Event>>(100);

    let mut watcher = recommended_watcher(move |res| {
        let tx_clone = tx.clone();
        rt_handle.spawn(async move {
            if tx_clone.send(res).await.is_err() {
                info!("File watcher event channel closed");
            }
        });
    })?;
    watcher.watch(manager.root_folder(), RecursiveMode::Recursive)?;
    info!(folder = %manager.root_folder().display(), "Watching configuration files for changes");

    tokio::spawn(async move {
        // The watcher stops when dropped, so it lives as long as this task.
        let _watcher = watcher;
        while let Some(res) = rx.recv().await {
            match res {
                Ok(event) if event.kind.is_access() => {}
                Ok(event) => {
                    info!(paths = ?event.paths, "File change detected");
                    match manager.reload() {
                        Ok(()) => info!("Configuration reloaded"),
                        Err(err) => error!(error = %err, "Configuration reload error"),
                    }
                }
                Err(err) => error!(error = ?err, "Watch error"),
            }
        }
    });
    Ok(())
}
