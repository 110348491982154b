use anyhow::Result;
use async_trait::async_trait;
use core_logic::{EventSink, ProxyPool, RequestOutcome, StepStatus};
use layeredge_bot::api::NodeApi;
use layeredge_bot::identity::NodeAction;
use layeredge_bot::lifecycle::{
    NodeLifecycleOrchestrator, NodeState, SweepStatus, SweepStep, WalletSweepResult,
};
use layeredge_bot::sweep::SweepScheduler;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

struct NullSink;

impl EventSink for NullSink {
    fn attempt_failed(&self, _operation: &str, _attempt: u32, _max: u32, _error: &str) {}
    fn progress(&self, _address: &str, _step: &str, _status: StepStatus) {}
}

type CallLog = Arc<Mutex<Vec<(String, &'static str)>>>;

struct MockApi {
    address: String,
    running: bool,
    fail_status: bool,
    fail_stop: bool,
    fail_signing: bool,
    calls: CallLog,
}

impl MockApi {
    fn new(address: &str, running: bool, calls: CallLog) -> Self {
        Self {
            address: address.to_string(),
            running,
            fail_status: false,
            fail_stop: false,
            fail_signing: false,
            calls,
        }
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push((self.address.clone(), call));
    }
}

fn ok_outcome(payload: Value) -> RequestOutcome {
    RequestOutcome {
        succeeded: true,
        payload: Some(payload),
        error: None,
        attempts_used: 1,
    }
}

fn failed_outcome() -> RequestOutcome {
    RequestOutcome {
        succeeded: false,
        payload: None,
        error: Some("connection refused".to_string()),
        attempts_used: 30,
    }
}

#[async_trait]
impl NodeApi for MockApi {
    fn address(&self) -> &str {
        &self.address
    }

    async fn node_status(&self) -> RequestOutcome {
        self.record("status");
        if self.fail_status {
            failed_outcome()
        } else if self.running {
            ok_outcome(json!({"data": {"startTimestamp": 1736899200}}))
        } else {
            ok_outcome(json!({"data": {"startTimestamp": null}}))
        }
    }

    async fn node_action(&self, action: NodeAction) -> Result<RequestOutcome> {
        if self.fail_signing {
            anyhow::bail!("signing failure");
        }
        match action {
            NodeAction::Stop => {
                self.record("stop");
                if self.fail_stop {
                    Ok(failed_outcome())
                } else {
                    Ok(ok_outcome(json!({"message": "points claimed"})))
                }
            }
            NodeAction::Start => {
                self.record("connect");
                Ok(ok_outcome(
                    json!({"message": "node action executed successfully"}),
                ))
            }
        }
    }

    async fn node_points(&self) -> RequestOutcome {
        self.record("points");
        ok_outcome(json!({"data": {"nodePoints": 42}}))
    }
}

fn calls_for<'a>(log: &'a [(String, &'static str)], address: &str) -> Vec<&'static str> {
    log.iter()
        .filter(|(a, _)| a == address)
        .map(|(_, c)| *c)
        .collect()
}

#[tokio::test]
async fn test_running_wallet_stops_before_connecting() {
    let calls: CallLog = Arc::default();
    let api = MockApi::new("0xA", true, calls.clone());

    let result = NodeLifecycleOrchestrator::new(&api, &NullSink)
        .run()
        .await
        .unwrap();

    assert_eq!(result.overall, SweepStatus::Success);
    assert_eq!(
        calls_for(&calls.lock().unwrap(), "0xA"),
        vec!["status", "stop", "connect", "points"]
    );
    let steps: Vec<SweepStep> = result.steps.iter().map(|s| s.step).collect();
    assert_eq!(
        steps,
        vec![
            SweepStep::CheckStatus,
            SweepStep::StopAndClaim,
            SweepStep::Connect,
            SweepStep::CheckPoints
        ]
    );
}

#[tokio::test]
async fn test_idle_wallet_skips_stop() {
    let calls: CallLog = Arc::default();
    let api = MockApi::new("0xA", false, calls.clone());

    let result = NodeLifecycleOrchestrator::new(&api, &NullSink)
        .run()
        .await
        .unwrap();

    assert_eq!(
        calls_for(&calls.lock().unwrap(), "0xA"),
        vec!["status", "connect", "points"]
    );
    assert_eq!(result.steps.len(), 3);
    assert!(result
        .steps
        .iter()
        .all(|s| s.step != SweepStep::StopAndClaim));
}

#[tokio::test]
async fn test_failed_status_check_reads_as_not_running() {
    let calls: CallLog = Arc::default();
    let mut api = MockApi::new("0xA", true, calls.clone());
    api.fail_status = true;

    let result = NodeLifecycleOrchestrator::new(&api, &NullSink)
        .run()
        .await
        .unwrap();

    // No stop request; the pipeline still completes
    assert_eq!(
        calls_for(&calls.lock().unwrap(), "0xA"),
        vec!["status", "connect", "points"]
    );
    assert_eq!(result.overall, SweepStatus::Success);
}

#[tokio::test]
async fn test_stop_failure_does_not_block_connect() {
    let calls: CallLog = Arc::default();
    let mut api = MockApi::new("0xA", true, calls.clone());
    api.fail_stop = true;

    let result = NodeLifecycleOrchestrator::new(&api, &NullSink)
        .run()
        .await
        .unwrap();

    assert_eq!(
        calls_for(&calls.lock().unwrap(), "0xA"),
        vec!["status", "stop", "connect", "points"]
    );
    let stop = result
        .steps
        .iter()
        .find(|s| s.step == SweepStep::StopAndClaim)
        .unwrap();
    assert!(!stop.outcome.succeeded);
    assert_eq!(result.overall, SweepStatus::Success);
}

#[test]
fn test_node_state_derivation() {
    let running = ok_outcome(json!({"data": {"startTimestamp": 1736899200}}));
    assert_eq!(NodeState::from_status(&running), NodeState::Running);

    let idle = ok_outcome(json!({"data": {"startTimestamp": null}}));
    assert_eq!(NodeState::from_status(&idle), NodeState::NotRunning);

    let missing = ok_outcome(json!({"data": {}}));
    assert_eq!(NodeState::from_status(&missing), NodeState::NotRunning);

    assert_eq!(
        NodeState::from_status(&failed_outcome()),
        NodeState::NotRunning
    );
}

#[tokio::test]
async fn test_failure_in_one_wallet_does_not_stop_the_sweep() {
    let calls: CallLog = Arc::default();
    let scheduler = SweepScheduler::new(3, Duration::from_secs(3600));

    let build_calls = calls.clone();
    let connect = move |index: usize| -> Result<Box<dyn NodeApi>> {
        let mut api = MockApi::new(
            ["0xW0", "0xW1", "0xW2"][index],
            false,
            build_calls.clone(),
        );
        if index == 1 {
            api.fail_signing = true;
        }
        Ok(Box::new(api) as Box<dyn NodeApi>)
    };

    let results = scheduler.sweep_once(&NullSink, &connect).await;

    let overall: Vec<SweepStatus> = results.iter().map(|r| r.overall).collect();
    assert_eq!(
        overall,
        vec![SweepStatus::Success, SweepStatus::Failed, SweepStatus::Success]
    );

    // Wallets after the failed one still run their full sequence
    let log = calls.lock().unwrap();
    assert_eq!(calls_for(&log, "0xW2"), vec!["status", "connect", "points"]);
}

#[tokio::test]
async fn test_setup_error_is_isolated_too() {
    let calls: CallLog = Arc::default();
    let scheduler = SweepScheduler::new(2, Duration::from_secs(3600));

    let build_calls = calls.clone();
    let connect = move |index: usize| -> Result<Box<dyn NodeApi>> {
        if index == 0 {
            anyhow::bail!("bad key material");
        }
        Ok(Box::new(MockApi::new("0xW1", false, build_calls.clone())) as Box<dyn NodeApi>)
    };

    let results = scheduler.sweep_once(&NullSink, &connect).await;
    assert_eq!(results[0].overall, SweepStatus::Failed);
    assert_eq!(results[1].overall, SweepStatus::Success);
}

#[tokio::test]
async fn test_scheduler_stops_when_cancelled() {
    let calls: CallLog = Arc::default();
    let scheduler = SweepScheduler::new(1, Duration::from_secs(3600));

    let token = CancellationToken::new();
    let cancel = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();
    });

    let build_calls = calls.clone();
    let stats = scheduler
        .run(token, &NullSink, move |_| {
            Ok(Box::new(MockApi::new("0xA", false, build_calls.clone())) as Box<dyn NodeApi>)
        })
        .await;

    // One sweep ran, then the inter-sweep wait was interrupted
    assert_eq!(stats.sweeps, 1);
    assert_eq!(stats.success, 1);
    assert_eq!(stats.failed, 0);
}

#[tokio::test]
async fn test_pre_cancelled_scheduler_runs_no_sweep() {
    let token = CancellationToken::new();
    token.cancel();

    let scheduler = SweepScheduler::new(1, Duration::from_secs(3600));
    let stats = scheduler
        .run(token, &NullSink, move |_| -> Result<Box<dyn NodeApi>> {
            anyhow::bail!("never called")
        })
        .await;

    assert_eq!(stats.sweeps, 0);
}

#[tokio::test]
async fn test_hourly_scenario_two_wallets_one_proxy() {
    // Wallet 0 is running, wallet 1 is not; a single proxy serves both.
    let pool = ProxyPool::from_lines(["http://10.0.0.1:8080"]);
    assert_eq!(
        pool.assign(0).unwrap().url,
        pool.assign(1).unwrap().url
    );

    let calls: CallLog = Arc::default();
    let scheduler = SweepScheduler::new(2, Duration::from_secs(3600));

    let build_calls = calls.clone();
    let connect = move |index: usize| -> Result<Box<dyn NodeApi>> {
        let api = MockApi::new(["0xW0", "0xW1"][index], index == 0, build_calls.clone());
        Ok(Box::new(api) as Box<dyn NodeApi>)
    };

    let results = scheduler.sweep_once(&NullSink, &connect).await;
    assert!(results.iter().all(|r: &WalletSweepResult| r.overall == SweepStatus::Success));

    let log = calls.lock().unwrap();
    assert_eq!(
        calls_for(&log, "0xW0"),
        vec!["status", "stop", "connect", "points"]
    );
    assert_eq!(calls_for(&log, "0xW1"), vec!["status", "connect", "points"]);

    // Wallet 0 finished before wallet 1 started
    let first_w1 = log.iter().position(|(a, _)| a == "0xW1").unwrap();
    let last_w0 = log.iter().rposition(|(a, _)| a == "0xW0").unwrap();
    assert!(last_w0 < first_w1);
}
