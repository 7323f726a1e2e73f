//! Integration tests for the vault-ami-test CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! `vault_ami` needs AWS credentials plus packer, terraform and ssh, so its
//! tests are `#[ignore]`d; run them with `cargo test -- --ignored`.

mod cli_tests;
