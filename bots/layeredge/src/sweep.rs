use crate::api::NodeApi;
use crate::lifecycle::{NodeLifecycleOrchestrator, SweepStatus, WalletSweepResult};
use anyhow::Result;
use core_logic::{EventSink, StepStatus};
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Debug, Default, Clone)]
pub struct SweepStats {
    pub sweeps: u64,
    pub success: u64,
    pub failed: u64,
}

/// Runs full sequential passes over every wallet, back-to-back with a
/// fixed suspension in between, until cancelled. No checkpointing: a
/// process restart begins a fresh first sweep over every wallet.
pub struct SweepScheduler {
    wallet_count: usize,
    interval: Duration,
}

impl SweepScheduler {
    pub fn new(wallet_count: usize, interval: Duration) -> Self {
        Self {
            wallet_count,
            interval,
        }
    }

    /// One full pass, wallets in input order, one in flight at a time.
    /// Each wallet's API handle is built fresh by `connect` and dropped
    /// when its slot finishes. Any error inside one wallet's processing is
    /// caught here and marked failed; the pass moves on to the next wallet.
    pub async fn sweep_once<F>(&self, sink: &dyn EventSink, connect: &F) -> Vec<WalletSweepResult>
    where
        F: Fn(usize) -> Result<Box<dyn NodeApi>>,
    {
        let mut results = Vec::with_capacity(self.wallet_count);

        for index in 0..self.wallet_count {
            let api = match connect(index) {
                Ok(api) => api,
                Err(e) => {
                    error!("Wallet {} setup error: {:#}", index, e);
                    results.push(WalletSweepResult::failed(format!("wallet #{}", index)));
                    continue;
                }
            };

            let address = api.address().to_string();
            sink.progress(&address, "Wallet processing started", StepStatus::Started);

            let orchestrator = NodeLifecycleOrchestrator::new(api.as_ref(), sink);
            match orchestrator.run().await {
                Ok(result) => {
                    sink.progress(&address, "Wallet processing complete", StepStatus::Success);
                    results.push(result);
                }
                Err(e) => {
                    sink.progress(&address, "Wallet processing failed", StepStatus::Failed);
                    error!("Wallet processing error: {:#}", e);
                    results.push(WalletSweepResult::failed(address));
                }
            }
        }

        results
    }

    /// Sweeps forever until `token` is cancelled, either between wallets'
    /// sweeps or during the inter-sweep wait.
    pub async fn run<F>(
        &self,
        token: CancellationToken,
        sink: &dyn EventSink,
        connect: F,
    ) -> SweepStats
    where
        F: Fn(usize) -> Result<Box<dyn NodeApi>>,
    {
        let mut stats = SweepStats::default();

        loop {
            if token.is_cancelled() {
                info!("Sweep scheduler stopping (cancelled).");
                break;
            }

            let results = self.sweep_once(sink, &connect).await;
            stats.sweeps += 1;
            for result in &results {
                match result.overall {
                    SweepStatus::Success => stats.success += 1,
                    SweepStatus::Failed => stats.failed += 1,
                }
            }

            warn!(
                "Sweep complete. Waiting {}s before next run...",
                self.interval.as_secs()
            );
            tokio::select! {
                _ = token.cancelled() => {
                    info!("Sweep scheduler stopping (cancelled during wait).");
                    break;
                }
                _ = sleep(self.interval) => {}
            }
        }

        stats
    }
}
