//! E2E tests for lead submission.

use std::sync::Arc;
use std::time::Duration;

use mockito::Matcher;
use pcosreset_core::funnel::{FunnelController, FunnelSettings};
use pcosreset_core::integrations::submission::spawn_submission;
use pcosreset_core::integrations::SupabaseSink;
use pcosreset_core::storage::Database;

use super::test_helpers::answered_state;

fn sink(server: &mockito::ServerGuard) -> SupabaseSink {
    SupabaseSink::new(
        &server.url(),
        "funnel_submissions",
        "service-role".into(),
        Duration::from_secs(5),
    )
    .unwrap()
}

/// Test: a submission posts one row with lbs shadows and returns its id.
#[tokio::test]
async fn test_supabase_submission_succeeds() {
    let mut server = mockito::Server::new_async().await;
    let state = answered_state();
    let mock = server
        .mock("POST", "/rest/v1/funnel_submissions")
        .match_header("apikey", "service-role")
        .match_header("authorization", "Bearer service-role")
        .match_header("prefer", "return=representation")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(format!(r#"^\[\{{"session_id":"{}""#, state.session_id)),
            Matcher::Regex(r#""current-weight-lbs":185\.0"#.into()),
            Matcher::Regex(r#""target-weight-lbs":154\.0"#.into()),
            Matcher::Regex(r#""bmi":29\.8"#.into()),
            Matcher::Regex(r#""gender":"female""#.into()),
        ]))
        .with_status(201)
        .with_body(r#"[{"id": 17}]"#)
        .create_async()
        .await;

    let outcome = spawn_submission(Arc::new(sink(&server)), &state, Duration::from_secs(5))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(outcome.success);
    assert_eq!(outcome.id.as_deref(), Some("17"));
}

/// Test: a server error becomes a failed outcome and is logged locally.
#[tokio::test]
async fn test_supabase_failure_is_recorded() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/rest/v1/funnel_submissions")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let state = answered_state();
    let outcome = spawn_submission(Arc::new(sink(&server)), &state, Duration::from_secs(5))
        .await
        .unwrap();
    assert!(!outcome.success);
    assert!(outcome.error.as_deref().unwrap().contains("500"));

    let db = Database::open_memory().unwrap();
    db.record_submission(&state.session_id, &outcome).unwrap();
    let log = db.submissions(&state.session_id).unwrap();
    assert_eq!(log.len(), 1);
    assert!(!log[0].success);
}

/// Test: starting a funnel submits it, and a failing backend leaves the
/// command and the stored answers untouched.
#[tokio::test]
async fn test_funnel_start_submits_in_background() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/rest/v1/funnel_submissions")
        .match_body(Matcher::Regex(r#""gender":"female""#.into()))
        .with_status(503)
        .with_body("unavailable")
        .expect(1)
        .create_async()
        .await;

    let funnel = FunnelController::new(Database::open_memory().unwrap(), FunnelSettings::default())
        .with_submission(Arc::new(sink(&server)), Duration::from_secs(5));

    let started = funnel.start(None).unwrap();
    let answered = funnel.answer_raw(&["18-27".into()]).unwrap();
    assert_eq!(answered.page.step, 2);

    for (session_id, outcome) in funnel.drain_submissions().await {
        funnel.repository().record_submission(&session_id, &outcome).unwrap();
    }
    mock.assert_async().await;

    let session_id = started.page.session_id;
    let log = funnel.repository().submissions(&session_id).unwrap();
    assert_eq!(log.len(), 1);
    assert!(!log[0].success);
    assert_eq!(funnel.state().unwrap().responses.len(), 1);
}
