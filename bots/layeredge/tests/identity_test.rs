use ethers::types::{Address, Signature};
use layeredge_bot::identity::{NodeAction, WalletIdentity};

// Well-known throwaway devnet key
const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

#[test]
fn test_address_derivation_is_deterministic() {
    let identity = WalletIdentity::from_private_key(KEY).unwrap();
    assert_eq!(identity.address(), ADDRESS);

    // 0x prefix and surrounding whitespace are tolerated
    let prefixed = WalletIdentity::from_private_key(&format!(" 0x{} ", KEY)).unwrap();
    assert_eq!(prefixed.address(), ADDRESS);
}

#[test]
fn test_invalid_key_is_rejected() {
    assert!(WalletIdentity::from_private_key("not-a-key").is_err());
    assert!(WalletIdentity::from_private_key("abcd").is_err());
}

#[test]
fn test_action_message_format() {
    let identity = WalletIdentity::from_private_key(KEY).unwrap();

    assert_eq!(
        identity.action_message(NodeAction::Start, 1736899200000),
        format!("Node activation request for {} at 1736899200000", ADDRESS)
    );
    assert_eq!(
        identity.action_message(NodeAction::Stop, 1736899200000),
        format!("Node deactivation request for {} at 1736899200000", ADDRESS)
    );
}

#[test]
fn test_action_paths() {
    assert_eq!(NodeAction::Start.path_segment(), "start");
    assert_eq!(NodeAction::Stop.path_segment(), "stop");
}

#[test]
fn test_signature_recovers_to_the_wallet_address() {
    let identity = WalletIdentity::from_private_key(KEY).unwrap();
    let timestamp = 1736899200000;
    let signed = identity.sign_action_at(NodeAction::Start, timestamp).unwrap();

    assert_eq!(signed.timestamp, timestamp);
    // 0x + 65 bytes of hex
    assert!(signed.sign.starts_with("0x"));
    assert_eq!(signed.sign.len(), 132);

    let signature: Signature = signed.sign.strip_prefix("0x").unwrap().parse().unwrap();
    let message = identity.action_message(NodeAction::Start, timestamp);
    let recovered = signature.recover(message).unwrap();
    assert_eq!(recovered, ADDRESS.parse::<Address>().unwrap());
}

#[test]
fn test_signatures_differ_per_action() {
    let identity = WalletIdentity::from_private_key(KEY).unwrap();
    let start = identity.sign_action_at(NodeAction::Start, 1736899200000).unwrap();
    let stop = identity.sign_action_at(NodeAction::Stop, 1736899200000).unwrap();
    assert_ne!(start.sign, stop.sign);
}
