//! Withdrawal relayer.
//!
//! Wires the Bitcoin RPC client, the shared chain-status view and the
//! withdrawal broadcast engine together and runs them until interrupted.

mod args;

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use args::Args;
use garnet_btcio::{rpc::BitcoinClient, status_task::l1_status_task};
use garnet_common::logging;
use garnet_config::Config;
use garnet_db::stubs::StubWithdrawalDb;
use garnet_primitives::RelayerId;
use garnet_status::StatusChannel;
use garnet_wallet::{
    broadcast::{withdrawal_task, WithdrawalBroadcaster},
    custody::LocalKeyCustody,
    leader::LeaderGate,
};
use tokio::sync::watch;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init(logging::LoggerConfig::with_base_name("garnet-relayer"));

    let args: Args = argh::from_env();
    let config = load_configuration(&args)?;

    info!(datadir = %config.client.datadir.display(), "starting relayer");

    let client = Arc::new(BitcoinClient::new(
        config.bitcoind.rpc_url.clone(),
        config.bitcoind.rpc_user.clone(),
        config.bitcoind.rpc_password.clone(),
    )?);

    let status = StatusChannel::default();
    let store = Arc::new(StubWithdrawalDb::new());
    let custody = Arc::new(LocalKeyCustody::resolve(config.withdrawal.key_path.clone())?);
    let gate = LeaderGate::new(RelayerId::new(config.withdrawal.relayer_id.clone()));

    let broadcaster = Arc::new(WithdrawalBroadcaster::new(
        store,
        client.clone(),
        custody,
        status.clone(),
        config.withdrawal.clone(),
        gate,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let poll = Duration::from_secs(config.withdrawal.poll_interval_secs);
    let status_handle = tokio::spawn(l1_status_task(
        client,
        status,
        poll,
        shutdown_rx.clone(),
    ));
    let broadcast_handle = tokio::spawn(withdrawal_task(broadcaster, shutdown_rx));

    tokio::signal::ctrl_c()
        .await
        .context("listening for shutdown signal")?;
    info!("shutdown requested");

    let _ = shutdown_tx.send(true);
    let _ = tokio::join!(status_handle, broadcast_handle);

    logging::finalize();
    Ok(())
}

fn load_configuration(args: &Args) -> anyhow::Result<Config> {
    let raw = std::fs::read_to_string(&args.config)
        .with_context(|| format!("reading config {}", args.config.display()))?;
    let mut config: Config =
        toml::from_str(&raw).context("parsing config")?;
    if let Some(datadir) = &args.datadir {
        config.client.datadir = datadir.clone();
    }
    Ok(config)
}
