use crate::api::NodeApi;
use crate::identity::NodeAction;
use anyhow::Result;
use core_logic::{EventSink, RequestOutcome, StepStatus};
use std::fmt;
use tracing::{info, warn};

/// Exact confirmation the start endpoint returns on success.
pub const CONNECT_CONFIRMATION: &str = "node action executed successfully";

/// Node liveness as reported by the status endpoint. Derived fresh every
/// sweep, never cached between sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeState {
    #[default]
    Unknown,
    Running,
    NotRunning,
}

impl NodeState {
    /// Non-null `data.startTimestamp` means running. Any other outcome,
    /// including a failed request, reads as not running so the sweep goes
    /// on to (re)start the node.
    pub fn from_status(outcome: &RequestOutcome) -> Self {
        let started = outcome.succeeded
            && outcome
                .data_field("startTimestamp")
                .map(|v| !v.is_null())
                .unwrap_or(false);

        if started {
            NodeState::Running
        } else {
            NodeState::NotRunning
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepStep {
    CheckStatus,
    StopAndClaim,
    Connect,
    CheckPoints,
}

impl fmt::Display for SweepStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SweepStep::CheckStatus => "check status",
            SweepStep::StopAndClaim => "stop and claim",
            SweepStep::Connect => "connect",
            SweepStep::CheckPoints => "check points",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub step: SweepStep,
    pub outcome: RequestOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepStatus {
    Success,
    Failed,
}

/// Ephemeral record of one wallet's pass, kept only for observability.
#[derive(Debug, Clone)]
pub struct WalletSweepResult {
    pub address: String,
    pub steps: Vec<StepOutcome>,
    pub overall: SweepStatus,
}

impl WalletSweepResult {
    pub fn failed(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            steps: Vec::new(),
            overall: SweepStatus::Failed,
        }
    }
}

/// Drives the fixed check / stop / connect / points sequence for one wallet.
pub struct NodeLifecycleOrchestrator<'a> {
    api: &'a dyn NodeApi,
    sink: &'a dyn EventSink,
}

impl<'a> NodeLifecycleOrchestrator<'a> {
    pub fn new(api: &'a dyn NodeApi, sink: &'a dyn EventSink) -> Self {
        Self { api, sink }
    }

    /// Runs the four-step sequence. Step-level failures are recorded and
    /// the sequence keeps going; only an unexpected error (e.g. signing)
    /// bubbles up for the scheduler to catch at the wallet boundary.
    pub async fn run(&self) -> Result<WalletSweepResult> {
        let address = self.api.address().to_string();
        let mut steps = Vec::with_capacity(4);

        self.sink
            .progress(&address, "Checking node status", StepStatus::Processing);
        let status = self.api.node_status().await;
        let state = NodeState::from_status(&status);
        if !status.succeeded {
            warn!(
                "{}: status check failed, assuming node not running",
                address
            );
        }
        steps.push(StepOutcome {
            step: SweepStep::CheckStatus,
            outcome: status,
        });

        if state == NodeState::Running {
            self.sink
                .progress(&address, "Claiming node points", StepStatus::Processing);
            let stop = self.api.node_action(NodeAction::Stop).await?;
            let stop_ok = stop.succeeded && stop.payload.is_some();
            self.sink.progress(
                &address,
                "Stop and claim",
                if stop_ok {
                    StepStatus::Success
                } else {
                    StepStatus::Failed
                },
            );
            steps.push(StepOutcome {
                step: SweepStep::StopAndClaim,
                outcome: stop,
            });
        }

        self.sink
            .progress(&address, "Reconnecting node", StepStatus::Processing);
        let connect = self.api.node_action(NodeAction::Start).await?;
        let confirmed = connect
            .payload
            .as_ref()
            .and_then(|p| p.get("message"))
            .and_then(|m| m.as_str())
            == Some(CONNECT_CONFIRMATION);
        self.sink.progress(
            &address,
            "Connect node",
            if confirmed {
                StepStatus::Success
            } else {
                StepStatus::Failed
            },
        );
        steps.push(StepOutcome {
            step: SweepStep::Connect,
            outcome: connect,
        });

        self.sink
            .progress(&address, "Checking node points", StepStatus::Processing);
        let points = self.api.node_points().await;
        let total = points
            .data_field("nodePoints")
            .and_then(|v| v.as_u64())
            .unwrap_or(0);
        info!("{} Total Points: {}", address, total);
        steps.push(StepOutcome {
            step: SweepStep::CheckPoints,
            outcome: points,
        });

        Ok(WalletSweepResult {
            address,
            steps,
            overall: SweepStatus::Success,
        })
    }
}
