use crate::config::LayerEdgeConfig;
use crate::identity::{NodeAction, WalletIdentity};
use anyhow::Result;
use async_trait::async_trait;
use core_logic::{EventSink, ProxyEndpoint, RequestOutcome, RequestSpec, ResilientHttpClient};
use serde_json::json;
use std::sync::Arc;

/// Sweep-facing surface of the remote service, one instance per wallet.
/// The seam the lifecycle orchestrator (and its tests) runs against.
#[async_trait]
pub trait NodeApi: Send + Sync {
    fn address(&self) -> &str;

    /// GET node-status.
    async fn node_status(&self) -> RequestOutcome;

    /// Signed POST start/stop. Signing happens inside, so the error path
    /// covers key failures as well as the network.
    async fn node_action(&self, action: NodeAction) -> Result<RequestOutcome>;

    /// GET wallet-details.
    async fn node_points(&self) -> RequestOutcome;
}

/// Remote client bound to one wallet and its assigned proxy.
pub struct LayerEdgeClient {
    identity: WalletIdentity,
    http: ResilientHttpClient,
    base_url: String,
    ref_code: String,
    sink: Arc<dyn EventSink>,
}

impl LayerEdgeClient {
    pub fn new(
        config: &LayerEdgeConfig,
        identity: WalletIdentity,
        proxy: Option<&ProxyEndpoint>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self> {
        let http =
            ResilientHttpClient::new(proxy, config.request_timeout(), config.retry_policy())?;

        Ok(Self {
            identity,
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            ref_code: config.ref_code.clone(),
            sink,
        })
    }

    pub fn identity(&self) -> &WalletIdentity {
        &self.identity
    }

    pub fn proxy_url(&self) -> Option<&str> {
        self.http.proxy_url()
    }

    /// One-time referral check; the caller reads `data.valid` from the
    /// payload.
    pub async fn verify_invite(&self) -> RequestOutcome {
        let spec = RequestSpec::post(
            format!("{}/api/referral/verify-referral-code", self.base_url),
            json!({ "invite_code": self.ref_code }),
        );
        self.http
            .execute("verify invite", &spec, self.sink.as_ref())
            .await
    }

    /// One-time wallet registration under the referral code; any non-empty
    /// response body counts as success.
    pub async fn register_wallet(&self) -> RequestOutcome {
        let spec = RequestSpec::post(
            format!(
                "{}/api/referral/register-wallet/{}",
                self.base_url, self.ref_code
            ),
            json!({ "walletAddress": self.identity.address() }),
        );
        self.http
            .execute("register wallet", &spec, self.sink.as_ref())
            .await
    }
}

#[async_trait]
impl NodeApi for LayerEdgeClient {
    fn address(&self) -> &str {
        self.identity.address()
    }

    async fn node_status(&self) -> RequestOutcome {
        let spec = RequestSpec::get(format!(
            "{}/api/light-node/node-status/{}",
            self.base_url,
            self.identity.address()
        ));
        self.http
            .execute("node status", &spec, self.sink.as_ref())
            .await
    }

    async fn node_action(&self, action: NodeAction) -> Result<RequestOutcome> {
        let signed = self.identity.sign_action(action)?;
        let spec = RequestSpec::post(
            format!(
                "{}/api/light-node/node-action/{}/{}",
                self.base_url,
                self.identity.address(),
                action.path_segment()
            ),
            serde_json::to_value(&signed)?,
        );

        let operation = match action {
            NodeAction::Start => "connect node",
            NodeAction::Stop => "stop node",
        };
        Ok(self.http.execute(operation, &spec, self.sink.as_ref()).await)
    }

    async fn node_points(&self) -> RequestOutcome {
        let spec = RequestSpec::get(format!(
            "{}/api/referral/wallet-details/{}",
            self.base_url,
            self.identity.address()
        ));
        self.http
            .execute("wallet points", &spec, self.sink.as_ref())
            .await
    }
}
