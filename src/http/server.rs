use tokio::io;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::handler::handle_client;
use crate::config::manager::{current, SharedApi};

pub async fn run(address: &str, api: SharedApi) -> io::Result<()> {
    let listener = TcpListener::bind(address).await?;
    info!("Server listening on {}", address);
    serve(listener, api).await
}

/// Accept connections forever, answering each against the snapshot current
/// at accept time.
pub async fn serve(listener: TcpListener, api: SharedApi) -> io::Result<()> {
    loop {
        let (stream, _) = listener.accept().await?;
        let snapshot = current(&api);
        tokio::spawn(async move {
            if let Err(e) = handle_client(stream, snapshot).await {
                error!("Error handling client: {}", e);
            }
        });
    }
}
