//! Integration tests for the revenue claim orchestrator

use mintmatrix_domain::{
    Address, ClaimRequest, ClaimResult, ClaimedToken, RoyaltyToken, TokenAmount, TokenRegistry,
};
use mintmatrix_royalty::{MockRoyaltyClient, RevenueOrchestrator, RoyaltyError, SignerKey};
use std::sync::Arc;

fn addr(n: u8) -> Address {
    Address::parse(&format!("{:040x}", n)).unwrap()
}

fn setup() -> (MockRoyaltyClient, RevenueOrchestrator) {
    let mock = MockRoyaltyClient::new();
    let orchestrator = RevenueOrchestrator::new(Arc::new(mock.clone()), TokenRegistry::default());
    (mock, orchestrator)
}

fn signer() -> SignerKey {
    SignerKey::new("0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d").unwrap()
}

#[tokio::test]
async fn test_batch_of_three_uses_fixed_options() {
    let (mock, orchestrator) = setup();
    let tokens = TokenRegistry::default();
    let wip = tokens.wip.clone();
    mock.set_claim_outcome(Ok(ClaimResult {
        tx_hashes: vec!["0xtx".to_string()],
        claimed_tokens: Some(vec![ClaimedToken {
            ip_id: Some(addr(1)),
            token: wip.clone(),
            amount: TokenAmount::from_base_units(42),
        }]),
        receipt: None,
    }));

    let requests = vec![
        ClaimRequest::own_revenue(addr(1), addr(9), RoyaltyToken::Wip),
        ClaimRequest::own_revenue(addr(2), addr(9), RoyaltyToken::Merc20)
            .with_child(addr(3), addr(4)),
        ClaimRequest::own_revenue(addr(5), addr(9), RoyaltyToken::Wip),
    ];

    let result = orchestrator
        .batch_claim_all_revenue(&signer(), &requests)
        .await
        .unwrap();
    assert!(result.is_success());
    assert_eq!(result.total_claimed(&wip).base_units(), 42);

    let recorded = mock.recorded_claims();
    assert_eq!(recorded.len(), 1);
    assert!(recorded[0].batched);
    assert_eq!(recorded[0].claims.len(), 3);
    assert!(recorded[0].options.auto_transfer_all_claimed_tokens_from_ip);
    assert!(recorded[0].options.auto_unwrap_ip_tokens);
    assert_eq!(recorded[0].claims[1].currency_tokens, vec![tokens.merc20.clone()]);
    assert_eq!(recorded[0].claims[1].child_ip_ids, vec![addr(3)]);
}

#[tokio::test]
async fn test_failed_batch_yields_empty_result_once() {
    let (mock, orchestrator) = setup();
    mock.set_claim_outcome(Err(RoyaltyError::Status {
        status: 500,
        body: "execution reverted".to_string(),
    }));

    let requests = vec![ClaimRequest::own_revenue(addr(1), addr(9), RoyaltyToken::Wip)];
    let result = orchestrator
        .batch_claim_all_revenue(&signer(), &requests)
        .await
        .unwrap();

    assert!(result.tx_hashes.is_empty());
    assert!(result.claimed_tokens.is_none());
    assert!(!result.is_success());
    // never retried
    assert_eq!(mock.recorded_claims().len(), 1);
}

#[tokio::test]
async fn test_mismatched_request_rejected_before_submission() {
    let (mock, orchestrator) = setup();
    let mut bad = ClaimRequest::own_revenue(addr(1), addr(9), RoyaltyToken::Wip);
    bad.royalty_policies.push(addr(4));

    let err = orchestrator
        .batch_claim_all_revenue(&signer(), &[bad])
        .await
        .unwrap_err();
    assert!(matches!(err, RoyaltyError::Validation(_)));
    assert!(mock.recorded_claims().is_empty());
}

#[tokio::test]
async fn test_total_over_many_ips() {
    let (mock, orchestrator) = setup();
    let ips: Vec<Address> = (1..=10).map(addr).collect();
    for ip in &ips {
        mock.set_claimable(ip.clone(), TokenAmount::from_base_units(100_000_000_000_000_000));
    }

    let total: mintmatrix_royalty::orchestrator::ClaimableTotal = orchestrator
        .total_claimable_revenue(&ips, &addr(99), RoyaltyToken::Wip)
        .await;

    assert_eq!(total.per_ip.len(), 10);
    assert_eq!(total.total_display, "1.0");
    assert!(total.failed.is_empty());
    assert_eq!(mock.claimable_queries(), 10);
}

#[tokio::test]
async fn test_vault_lookup() {
    let (mock, orchestrator) = setup();
    mock.set_vault(addr(1), addr(77));

    assert_eq!(orchestrator.royalty_vault_address(&addr(1)).await.unwrap(), addr(77));
    assert!(orchestrator.royalty_vault_address(&addr(2)).await.is_err());
}

#[test]
fn test_modules_are_addressable() {
    use mintmatrix_royalty::config::RoyaltyConfig;
    use mintmatrix_royalty::gateway::SIGNER_KEY_HEADER;

    let registry = RoyaltyConfig::default().token_registry().unwrap();
    assert_eq!(registry, TokenRegistry::default());
    assert_eq!(SIGNER_KEY_HEADER, "X-Signer-Key");
}
