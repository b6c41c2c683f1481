//! E2E tests for Stripe checkout.

use mockito::Matcher;
use pcosreset_core::integrations::checkout::idempotency_key;
use pcosreset_core::integrations::{CheckoutClient, CheckoutError, CheckoutRequest};
use pcosreset_core::storage::CheckoutConfig;

fn client(server: &mockito::ServerGuard, key: Option<&str>) -> CheckoutClient {
    let config = CheckoutConfig {
        api_base: server.url(),
        site_url: "https://pcosreset.test".into(),
        timeout_secs: 5,
    };
    CheckoutClient::new(&config, key.map(str::to_string)).unwrap()
}

fn request(plan_id: &str, session_id: Option<&str>) -> CheckoutRequest {
    CheckoutRequest {
        plan_id: plan_id.into(),
        session_id: session_id.map(str::to_string),
        email: Some("jane@example.com".into()),
    }
}

/// Test: a valid request creates a session and returns its URL.
#[tokio::test]
async fn test_checkout_creates_session() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/checkout/sessions")
        .match_header("authorization", "Bearer sk_test_123")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("mode".into(), "subscription".into()),
            Matcher::UrlEncoded(
                "line_items[0][price_data][unit_amount]".into(),
                "1519".into(),
            ),
            Matcher::UrlEncoded(
                "line_items[0][price_data][recurring][interval]".into(),
                "month".into(),
            ),
            Matcher::UrlEncoded("metadata[planId]".into(), "1month".into()),
            Matcher::UrlEncoded("customer_email".into(), "jane@example.com".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "cs_test_abc", "url": "https://checkout.stripe.com/c/pay/cs_test_abc"}"#)
        .create_async()
        .await;

    let session = client(&server, Some("sk_test_123"))
        .create_session(&request("1month", None))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(session.success);
    assert_eq!(session.session_id, "cs_test_abc");
    assert_eq!(
        session.url.as_deref(),
        Some("https://checkout.stripe.com/c/pay/cs_test_abc")
    );
}

/// Test: requests for the same funnel session reuse one idempotency key.
#[tokio::test]
async fn test_checkout_sends_idempotency_key() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/checkout/sessions")
        .match_header(
            "idempotency-key",
            idempotency_key("3month_74", "funnel-42").as_str(),
        )
        .with_status(200)
        .with_body(r#"{"id": "cs_test_idem", "url": null}"#)
        .expect(2)
        .create_async()
        .await;

    let client = client(&server, Some("sk_test_123"));
    let req = request("3month_74", Some("funnel-42"));
    let first = client.create_session(&req).await.unwrap();
    let second = client.create_session(&req).await.unwrap();

    mock.assert_async().await;
    assert_eq!(first, second);
    assert!(first.url.is_none());
}

/// Test: Stripe's error message and status are surfaced.
#[tokio::test]
async fn test_checkout_provider_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/checkout/sessions")
        .with_status(402)
        .with_body(r#"{"error": {"message": "Your card was declined.", "type": "card_error"}}"#)
        .create_async()
        .await;

    let err = client(&server, Some("sk_test_123"))
        .create_session(&request("7day", None))
        .await
        .unwrap_err();

    assert_eq!(err.status(), 402);
    match err {
        CheckoutError::Provider { message, .. } => assert_eq!(message, "Your card was declined."),
        other => panic!("expected provider error, got {other:?}"),
    }
}

/// Test: nothing is sent without a key or for an unknown plan.
#[tokio::test]
async fn test_checkout_rejects_before_network() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/checkout/sessions")
        .expect(0)
        .create_async()
        .await;

    let err = client(&server, None)
        .create_session(&request("1month", None))
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::NotConfigured));
    assert_eq!(err.status(), 503);

    let err = client(&server, Some("sk_test_123"))
        .create_session(&request("lifetime", None))
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::UnknownPlan(_)));
    assert_eq!(err.status(), 400);

    mock.assert_async().await;
}
