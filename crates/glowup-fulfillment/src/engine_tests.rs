use chrono::TimeZone;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::model::{OrderItem, ShippingAddress};
use crate::testing::{BAG, CHECKOUT, CONFIRMATION, FakeSite, HOME, LIPSTICK, SERUM, storefront};

struct Harness {
    site: FakeSite,
    engine: FulfillmentEngine,
    tmp: tempfile::TempDir,
}

impl Harness {
    fn new(site: FakeSite) -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.session.dir = tmp.path().join("browser-session");
        config.diagnostics.dir = tmp.path().join("diagnostics");
        config.timing = TimingConfig::immediate();
        let engine = FulfillmentEngine::new(&config, site.driver());
        Self { site, engine, tmp }
    }

    async fn with_session(site: FakeSite) -> Self {
        let harness = Self::new(site);
        harness.engine.store().mark_ready("Ulta").await.unwrap();
        harness
    }

    async fn order(&self, items: Vec<OrderItem>) -> OrderResult {
        self.engine.process_order(&request(items)).await
    }
}

fn item(name: &str, url: &str, quantity: u32, price: Decimal) -> OrderItem {
    OrderItem {
        product_id: name.to_lowercase().replace(' ', "-"),
        name: name.to_string(),
        brand: "Glow Lab".to_string(),
        url: url.to_string(),
        quantity,
        price,
    }
}

fn request(items: Vec<OrderItem>) -> OrderRequest {
    OrderRequest {
        user_id: "user-42".to_string(),
        items,
        shipping_address: ShippingAddress {
            full_name: "Jane Doe".to_string(),
            line1: "1 Main St".to_string(),
            line2: Some("Apt 4".to_string()),
            city: "Austin".to_string(),
            state: "TX".to_string(),
            zip: "78701".to_string(),
            country: None,
        },
    }
}

fn logged(result: &OrderResult, line: &str) -> bool {
    result.logs.iter().any(|l| l == line)
}

#[tokio::test]
async fn test_no_session_short_circuits() {
    let harness = Harness::new(storefront());

    let result = harness
        .order(vec![
            item("Matte Lipstick", LIPSTICK, 1, dec!(20.00)),
            item("Vitamin C Serum", SERUM, 1, dec!(10.00)),
        ])
        .await;

    assert!(!result.success);
    assert_eq!(result.failure_kind, Some(FailureKind::SessionMissing));
    assert!(result.error.as_deref().unwrap().contains("session"));
    assert_eq!(result.total_cost, Decimal::ZERO);
    assert!(logged(&result, "No browser session found. Run setup first."));
    assert!(harness.site.launches().is_empty());
}

#[tokio::test]
async fn test_single_item_order_placed() {
    let site = storefront();
    site.page(CONFIRMATION, "Thank you! Order number: GU-123");
    let harness = Harness::with_session(site).await;

    let result = harness
        .order(vec![item("Matte Lipstick", LIPSTICK, 1, dec!(40.00))])
        .await;

    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.order_id.as_deref(), Some("GU-123"));
    assert_eq!(result.shipping_cost, Decimal::ZERO);
    assert_eq!(result.markup, dec!(6.00));
    assert_eq!(result.total_cost, dec!(46.00));
    assert!(result.error.is_none());
    assert!(result.failure_kind.is_none());

    assert!(logged(&result, "Agent initialized for user user-42"));
    assert!(logged(&result, "Subtotal: $40.00"));
    assert!(logged(&result, "Shipping: FREE"));
    assert!(logged(&result, "Service fee: $6.00"));
    assert!(logged(&result, "Total: $46.00"));

    let launches = harness.site.launches();
    assert_eq!(launches.len(), 1);
    assert!(launches[0].headless);
    assert_eq!(launches[0].profile_dir, harness.engine.store().profile_dir());
    assert_eq!(harness.site.close_count(), 1);
}

#[tokio::test]
async fn test_out_of_stock_item_is_excluded_from_subtotal() {
    let site = storefront();
    site.page(SERUM, "Sold out");
    let harness = Harness::with_session(site).await;

    let result = harness
        .order(vec![
            item("Matte Lipstick", LIPSTICK, 1, dec!(20.00)),
            item("Vitamin C Serum", SERUM, 1, dec!(10.00)),
        ])
        .await;

    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.shipping_cost, dec!(5.95));
    assert_eq!(result.markup, dec!(3.00));
    assert_eq!(result.total_cost, dec!(28.95));
    assert!(logged(&result, "\"Vitamin C Serum\" is out of stock, skipping"));
    assert!(logged(&result, "1/2 items added to Ulta bag"));
}

#[tokio::test]
async fn test_unclickable_place_order_needs_manual_review() {
    let site = storefront();
    site.clear_page(CHECKOUT)
        .page(CHECKOUT, "Ship to this address  Visa ending in 4242");
    let harness = Harness::with_session(site).await;

    let result = harness
        .order(vec![
            item("Matte Lipstick", LIPSTICK, 1, dec!(20.00)),
            item("Vitamin C Serum", SERUM, 1, dec!(10.00)),
        ])
        .await;

    assert!(!result.success);
    assert_eq!(result.failure_kind, Some(FailureKind::ManualReview));
    assert!(result.error.as_deref().unwrap().starts_with("Manual review required"));
    assert_eq!(result.total_cost, dec!(30.00));
    assert_eq!(result.shipping_cost, Decimal::ZERO);
    assert_eq!(result.markup, Decimal::ZERO);
    let screenshot = result.screenshot_path.clone().unwrap();
    assert_eq!(screenshot, harness.tmp.path().join("diagnostics/checkout-debug.png"));

    for line in [
        "Logged into Ulta",
        "Cart cleared (2 item(s) removed)",
        "2/2 items added to Ulta bag",
        "  Proceeding to checkout...",
        "  Using saved shipping address",
        "  Using saved payment method",
    ] {
        assert!(logged(&result, line), "missing log line {line:?}");
    }
    assert_eq!(harness.site.close_count(), 1);
}

#[tokio::test]
async fn test_nothing_added_is_a_failure() {
    let site = storefront();
    site.page(LIPSTICK, "Out of stock").page(SERUM, "Out of stock");
    let harness = Harness::with_session(site).await;

    let result = harness
        .order(vec![
            item("Matte Lipstick", LIPSTICK, 1, dec!(20.00)),
            item("Vitamin C Serum", SERUM, 1, dec!(10.00)),
        ])
        .await;

    assert!(!result.success);
    assert_eq!(result.failure_kind, Some(FailureKind::NothingAdded));
    assert_eq!(result.error.as_deref(), Some("Failed to add products to cart"));
    assert_eq!(result.total_cost, Decimal::ZERO);
    assert!(result.order_id.is_none());
    assert_eq!(harness.site.close_count(), 1);
}

#[tokio::test]
async fn test_expired_session() {
    let site = storefront();
    site.page(HOME, "Sign In  Create an Account");
    let harness = Harness::with_session(site).await;

    let result = harness
        .order(vec![item("Matte Lipstick", LIPSTICK, 1, dec!(20.00))])
        .await;

    assert!(!result.success);
    assert_eq!(result.failure_kind, Some(FailureKind::SessionExpired));
    assert_eq!(result.error.as_deref(), Some("Session expired. Please re-authenticate."));
    assert!(logged(&result, "Session expired. Run session setup to re-login."));
    assert_eq!(harness.site.close_count(), 1);
}

#[tokio::test]
async fn test_browser_error_aborts_with_screenshot() {
    let site = storefront();
    site.fail_navigation(BAG);
    let harness = Harness::with_session(site).await;

    let result = harness
        .order(vec![item("Matte Lipstick", LIPSTICK, 1, dec!(20.00))])
        .await;

    assert!(!result.success);
    assert_eq!(result.failure_kind, Some(FailureKind::Aborted));
    assert!(
        result
            .error
            .as_deref()
            .unwrap()
            .starts_with("Agent failed: Navigation failed")
    );
    assert!(
        result
            .logs
            .iter()
            .any(|l| l.starts_with("Fatal error during cart clear: "))
    );
    let expected = harness.tmp.path().join("diagnostics/checkout-error.png");
    assert_eq!(result.screenshot_path, Some(expected.clone()));
    assert_eq!(harness.site.screenshots(), [expected]);
    assert_eq!(harness.site.close_count(), 1);
}

#[tokio::test]
async fn test_launch_failure() {
    let site = storefront();
    site.fail_launch();
    let harness = Harness::with_session(site).await;

    let result = harness
        .order(vec![item("Matte Lipstick", LIPSTICK, 1, dec!(20.00))])
        .await;

    assert_eq!(result.failure_kind, Some(FailureKind::Aborted));
    assert!(result.error.as_deref().unwrap().starts_with("Agent failed: "));
    assert_eq!(harness.site.close_count(), 0);
}

#[tokio::test]
async fn test_missing_order_number_uses_local_reference() {
    let site = storefront();
    site.page(CONFIRMATION, "Thanks for your purchase!");
    let harness = Harness::with_session(site).await;

    let result = harness
        .order(vec![item("Matte Lipstick", LIPSTICK, 1, dec!(20.00))])
        .await;

    assert!(result.success);
    let order_id = result.order_id.unwrap();
    assert!(order_id.starts_with("GLOWUP-"), "{order_id}");
    assert_eq!(order_id.split('-').count(), 3);
}

#[tokio::test]
async fn test_fault_after_submit_is_not_an_abort() {
    let site = storefront();
    site.fail_snapshots_after_click("button[data-test=\"place-order\"]", usize::MAX);
    let harness = Harness::with_session(site).await;

    let result = harness
        .order(vec![item("Matte Lipstick", LIPSTICK, 1, dec!(20.00))])
        .await;

    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.failure_kind, None);
    let order_id = result.order_id.unwrap();
    assert!(order_id.starts_with("GLOWUP-"), "{order_id}");
    assert_eq!(harness.site.close_count(), 1);
}

#[test]
fn test_fallback_order_id_format() {
    let attempt = Uuid::parse_str("9f1c2e3d-4b5a-4c6d-8e7f-0a1b2c3d4e5f").unwrap();
    let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
    assert_eq!(fallback_order_id(&attempt, at), "GLOWUP-1700000000123-9f1c2e3d");
}

#[tokio::test]
async fn test_every_fault_closes_browser_once() {
    let order = || {
        vec![
            item("Matte Lipstick", LIPSTICK, 2, dec!(20.00)),
            item("Vitamin C Serum", SERUM, 1, dec!(10.00)),
        ]
    };

    let baseline = Harness::with_session(storefront()).await;
    let result = baseline.order(order()).await;
    assert!(result.success);
    let ops = baseline.site.ops();
    assert!(ops > 10, "happy path should exercise many page operations");

    let mut aborted = 0;
    for fault in 0..ops {
        let site = storefront();
        site.fail_at_op(fault);
        let harness = Harness::with_session(site).await;

        let result = harness.order(order()).await;

        assert_eq!(
            harness.site.close_count(),
            1,
            "fault at op {fault} closed the browser {} times",
            harness.site.close_count()
        );
        assert_eq!(result.success, result.error.is_none());
        if result.failure_kind == Some(FailureKind::Aborted) {
            aborted += 1;
            assert!(result.screenshot_path.is_some());
        }
    }
    assert!(aborted > 0);
}

/// Hosts that must and must not count as the retailer.
const HOSTS: [(&str, bool); 8] = [
    ("https://www.ulta.com", true),
    ("https://ulta.com", true),
    ("http://m.ulta.com", true),
    ("https://WWW.ULTA.COM", true),
    ("https://www.sephora.com", false),
    ("https://ulta.com.evil.net", false),
    ("https://notulta.com", false),
    ("ftp://ulta.com", false),
];

#[tokio::test]
async fn test_only_retailer_items_are_attempted() {
    // Small LCG so the mixes are reproducible.
    let mut seed: u64 = 0x5eed;
    let mut next = move |bound: u64| {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (seed >> 33) % bound
    };

    for case in 0..24 {
        let count = 1 + next(5) as usize;
        let mut items = Vec::new();
        let mut eligible = Vec::new();
        for i in 0..count {
            let (host, ok) = HOSTS[next(HOSTS.len() as u64) as usize];
            let url = format!("{}/p/case{}-item{}", host, case, i);
            let name = format!("Item {}-{}", case, i);
            items.push(item(&name, &url, 1, dec!(12.00)));
            eligible.push(ok);
        }

        let harness = Harness::with_session(storefront()).await;
        let result = harness.order(items.clone()).await;
        let navigations = harness.site.navigations();

        let ineligible: Vec<&OrderItem> = items
            .iter()
            .zip(&eligible)
            .filter(|(_, ok)| !**ok)
            .map(|(i, _)| i)
            .collect();

        for (item, ok) in items.iter().zip(&eligible) {
            assert_eq!(
                navigations.contains(&item.url),
                *ok,
                "case {case}: {} navigated={} eligible={}",
                item.url,
                navigations.contains(&item.url),
                ok
            );
        }

        if ineligible.is_empty() {
            assert!(!result.logs.iter().any(|l| l.contains("are not from")));
        } else {
            let line = result
                .logs
                .iter()
                .find(|l| l.starts_with(&format!("{} item(s) are not from Ulta", ineligible.len())))
                .unwrap_or_else(|| panic!("case {case}: no ineligible line in {:?}", result.logs));
            for item in &ineligible {
                assert!(line.contains(&item.name));
            }
        }

        if !eligible.contains(&true) {
            assert_eq!(result.failure_kind, Some(FailureKind::NoEligibleItems));
            assert_eq!(result.error.as_deref(), Some("No Ulta products in cart"));
            assert!(harness.site.launches().is_empty());
        }
    }
}

#[tokio::test]
async fn test_session_operations_without_store() {
    let harness = Harness::new(storefront());
    assert!(!harness.engine.is_session_valid().await);
    assert!(harness.site.launches().is_empty());
}
