use anyhow::{Context, Result};
use ethers::signers::{LocalWallet, Signer};
use ethers::utils::{hash_message, to_checksum};
use hex::encode as hex_encode;
use serde::Serialize;

/// Lifecycle action whose verb is baked into the signed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeAction {
    Start,
    Stop,
}

impl NodeAction {
    pub fn verb(&self) -> &'static str {
        match self {
            NodeAction::Start => "activation",
            NodeAction::Stop => "deactivation",
        }
    }

    pub fn path_segment(&self) -> &'static str {
        match self {
            NodeAction::Start => "start",
            NodeAction::Stop => "stop",
        }
    }
}

/// Signed request body for a node action.
#[derive(Debug, Clone, Serialize)]
pub struct SignedAction {
    pub sign: String,
    pub timestamp: i64,
}

/// Signing key plus its derived EIP-55 address.
pub struct WalletIdentity {
    wallet: LocalWallet,
    address: String,
}

impl WalletIdentity {
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let wallet = private_key
            .trim()
            .parse::<LocalWallet>()
            .context("Invalid private key")?;
        let address = to_checksum(&wallet.address(), None);
        Ok(Self { wallet, address })
    }

    /// Checksummed address derived from the key. The remote verifier
    /// recovers the signer against this exact form, so the message below
    /// must embed it verbatim.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn action_message(&self, action: NodeAction, timestamp_ms: i64) -> String {
        format!(
            "Node {} request for {} at {}",
            action.verb(),
            self.address,
            timestamp_ms
        )
    }

    /// Signs `action` with a fresh wall-clock timestamp.
    pub fn sign_action(&self, action: NodeAction) -> Result<SignedAction> {
        self.sign_action_at(action, chrono::Utc::now().timestamp_millis())
    }

    /// EIP-191 personal-message hash over the action message; the
    /// signature is address-recoverable and hex-encoded with a 0x prefix.
    pub fn sign_action_at(&self, action: NodeAction, timestamp_ms: i64) -> Result<SignedAction> {
        let message = self.action_message(action, timestamp_ms);
        let signature = self
            .wallet
            .sign_hash(hash_message(&message))
            .context("Failed to sign message")?;

        Ok(SignedAction {
            sign: format!("0x{}", hex_encode(signature.to_vec())),
            timestamp: timestamp_ms,
        })
    }
}
