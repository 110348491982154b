use core_logic::WalletManager;

const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

#[test]
fn test_load_wallet_list() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wallets.txt");
    std::fs::write(
        &path,
        format!(
            "# farm wallets\n0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266,{}\n\n 0xAbc0000000000000000000000000000000000001 , {} \n",
            KEY, KEY
        ),
    )
    .unwrap();

    let manager = WalletManager::load(&path).unwrap();
    assert_eq!(manager.count(), 2);

    let first = &manager.records()[0];
    assert_eq!(first.address, "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    assert_eq!(first.private_key, KEY);

    // Surrounding whitespace is trimmed
    let second = &manager.records()[1];
    assert_eq!(second.address, "0xAbc0000000000000000000000000000000000001");
}

#[test]
fn test_missing_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    assert!(WalletManager::load(dir.path().join("wallets.txt")).is_err());
}

#[test]
fn test_empty_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wallets.txt");
    std::fs::write(&path, "# nothing here\n\n").unwrap();
    assert!(WalletManager::load(&path).is_err());
}

#[test]
fn test_malformed_lines_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wallets.txt");
    std::fs::write(
        &path,
        format!("not-a-wallet-line\n0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266,{}\n", KEY),
    )
    .unwrap();

    let manager = WalletManager::load(&path).unwrap();
    assert_eq!(manager.count(), 1);
}

#[test]
fn test_debug_redacts_private_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wallets.txt");
    std::fs::write(
        &path,
        format!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266,{}\n", KEY),
    )
    .unwrap();

    let manager = WalletManager::load(&path).unwrap();
    let printed = format!("{:?}", manager.records()[0]);
    assert!(printed.contains("***REDACTED***"));
    assert!(!printed.contains(KEY));
}
