//! `ntp-mode6`: send one mode 6 control query and print the reply.

mod cli;

use std::{process::ExitCode, sync::Arc, time::Duration};

use clap::Parser;
use ntp_mode6::{
    auth::Md5Key,
    client::{Mode6Client, Query, QueryConfig},
    protocol::{Opcode, ProtocolVersion},
};
use tokio_util::sync::CancellationToken;
use tracing::Level;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    let level = match cli.debug {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ntp-mode6: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: cli::Cli) -> Result<(), Box<dyn std::error::Error>> {
    let opcode: Opcode = cli.opcode.parse()?;
    let version = ProtocolVersion::new(cli.ntp_version)
        .ok_or_else(|| format!("unsupported protocol version {}", cli.ntp_version))?;
    let config = QueryConfig::default()
        .with_primary_timeout(Duration::from_millis(cli.timeout_ms))
        .with_secondary_timeout(Duration::from_millis(cli.secondary_timeout_ms))
        .with_version(version);

    let mut client = Mode6Client::connect((cli.host.as_str(), cli.port), config)
        .await
        .map_err(|e| format!("{}: {e}", cli.host))?;
    if let (Some(key_id), Some(secret)) = (cli.key_id, cli.key) {
        client = client.with_auth(Arc::new(Md5Key::new(key_id, secret.into_bytes())?));
    }

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    let data = cli.data.unwrap_or_default();
    let query = Query::new(opcode)
        .association(cli.association)
        .payload(data.as_bytes())
        .authenticated(cli.authenticate);
    let response = client
        .query_with_cancel(query, &cancel)
        .await
        .map_err(|e| format!("{}: {e}", cli.host))?;

    println!("status={:#06x}", response.status());
    println!("{}", String::from_utf8_lossy(response.data()));
    Ok(())
}
