use anyhow::Result;
use clap::Parser;
use core_logic::{setup_logger, EventSink, ProxyPool, StepStatus, TracingSink, WalletManager};
use dotenv::dotenv;
use layeredge_bot::api::{LayerEdgeClient, NodeApi};
use layeredge_bot::config::LayerEdgeConfig;
use layeredge_bot::identity::WalletIdentity;
use layeredge_bot::sweep::SweepScheduler;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.toml")]
    config: String,
    /// Run the one-time invite verification and wallet registration,
    /// then exit.
    #[arg(long)]
    register: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = setup_logger();
    // Keep guard alive for file logging
    std::mem::forget(_log_guard);
    dotenv().ok();

    let args = Args::parse();
    info!("Starting LayerEdge node keeper");
    info!("Loading config from: {}", args.config);

    let config = match LayerEdgeConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {}", e);
            return Ok(());
        }
    };

    let wallets = match WalletManager::load(&config.wallet_file) {
        Ok(w) => w,
        Err(e) => {
            error!("Missing wallet configuration: {:#}", e);
            error!(
                "Ensure {} exists and is correctly formatted",
                config.wallet_file
            );
            return Ok(());
        }
    };
    info!("Processing wallets. Total wallets: {}", wallets.count());

    let proxies = ProxyPool::load(&config.proxy_file)?;
    if !proxies.is_empty() {
        info!("Loaded {} proxies for rotation.", proxies.len());
    }

    let sink: Arc<dyn EventSink> = Arc::new(TracingSink);

    if args.register {
        return register_wallets(&config, &wallets, &proxies, sink).await;
    }

    // Graceful shutdown on Ctrl+C
    let token = CancellationToken::new();
    let cloned_token = token.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C. Initiating graceful shutdown...");
                cloned_token.cancel();
            }
            Err(err) => {
                error!("Unable to listen for shutdown signal: {}", err);
            }
        }
    });

    let scheduler = SweepScheduler::new(wallets.count(), config.sweep_interval());
    let records = wallets.records();

    let connect = |index: usize| -> Result<Box<dyn NodeApi>> {
        let record = &records[index];
        let identity = WalletIdentity::from_private_key(&record.private_key)?;
        if !record.address.eq_ignore_ascii_case(identity.address()) {
            warn!(
                "Configured address {} does not match key-derived {}",
                record.address,
                identity.address()
            );
        }

        let proxy = proxies.assign(index);
        let client = LayerEdgeClient::new(&config, identity, proxy, Arc::clone(&sink))?;
        info!(
            "Wallet details. Address: {}, Proxy: {}",
            client.identity().address(),
            client.proxy_url().unwrap_or("No proxy")
        );
        Ok(Box::new(client) as Box<dyn NodeApi>)
    };

    let stats = scheduler.run(token, sink.as_ref(), connect).await;

    info!(
        "Shutdown complete. Sweeps: {} | Wallets OK: {} | Wallets failed: {}",
        stats.sweeps, stats.success, stats.failed
    );
    Ok(())
}

/// One-time setup flow: verify the invite code and register each wallet
/// under it. Not part of the recurring sweep.
async fn register_wallets(
    config: &LayerEdgeConfig,
    wallets: &WalletManager,
    proxies: &ProxyPool,
    sink: Arc<dyn EventSink>,
) -> Result<()> {
    for (index, record) in wallets.records().iter().enumerate() {
        let identity = match WalletIdentity::from_private_key(&record.private_key) {
            Ok(i) => i,
            Err(e) => {
                error!("Wallet {}: {:#}", index, e);
                continue;
            }
        };
        let address = identity.address().to_string();

        let client = match LayerEdgeClient::new(config, identity, proxies.assign(index), Arc::clone(&sink)) {
            Ok(c) => c,
            Err(e) => {
                error!("{}: {:#}", address, e);
                continue;
            }
        };

        sink.progress(&address, "Verifying invite code", StepStatus::Processing);
        let invite = client.verify_invite().await;
        let valid = invite
            .data_field("valid")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        if !valid {
            sink.progress(&address, "Invite code rejected", StepStatus::Failed);
            continue;
        }

        sink.progress(&address, "Registering wallet", StepStatus::Processing);
        let registered = client.register_wallet().await;
        let registered_ok = registered.succeeded && registered.payload.is_some();
        sink.progress(
            &address,
            "Wallet registration",
            if registered_ok {
                StepStatus::Success
            } else {
                StepStatus::Failed
            },
        );
    }

    Ok(())
}
