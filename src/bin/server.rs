//! Broadcast server binary: serves one raw PCM file to every client that
//! connects, up to the fixed admission capacity.

use std::process::ExitCode;

use pcmcast::{BroadcastServer, CastResult, FilePcmSource, ServerConfig};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "pcmcast-server".into());
    let (Some(path), None) = (args.next(), args.next()) else {
        eprintln!("usage: {program} <audio-file>");
        return ExitCode::FAILURE;
    };

    // The accept loop never returns on its own; reaching here is an error.
    if let Err(error) = serve(path).await {
        tracing::error!(%error, "fatal");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn serve(path: String) -> CastResult<()> {
    // Fail fast on an unreadable source; workers re-open it per connection.
    FilePcmSource::open(&path)?;

    let server = BroadcastServer::bind(ServerConfig::default(), FilePcmSource::factory(path)).await?;
    server.run().await
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
