//! Playback client binary: connects to a broadcast server and renders its
//! stream on the default output device.

use std::net::{IpAddr, Ipv4Addr};
use std::process::ExitCode;

use pcmcast::playback::{CpalSink, PlaybackSink, SinkConfig};
use pcmcast::{Receiver, ReceiverConfig};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "pcmcast-client".into());
    let (Some(addr), None) = (args.next(), args.next()) else {
        eprintln!("usage: {program} <server-ipv4-address>");
        return ExitCode::FAILURE;
    };
    let server: Ipv4Addr = match addr.parse() {
        Ok(server) => server,
        Err(_) => {
            eprintln!("invalid IPv4 address: {addr}");
            return ExitCode::FAILURE;
        }
    };

    let mut sink = match CpalSink::open(SinkConfig::default()) {
        Ok(sink) => sink,
        Err(error) => {
            tracing::error!(%error, "could not acquire playback device");
            return ExitCode::FAILURE;
        }
    };

    let receiver = Receiver::new(ReceiverConfig::new(IpAddr::V4(server)));
    let result = receiver.run(&mut sink).await;
    sink.close();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "fatal");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
