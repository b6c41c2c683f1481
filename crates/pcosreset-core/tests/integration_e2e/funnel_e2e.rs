//! E2E tests for the funnel against an on-disk database.

use chrono::NaiveDate;
use pcosreset_core::events::Event;
use pcosreset_core::funnel::{FunnelController, FunnelSettings};
use pcosreset_core::storage::Database;
use pcosreset_core::views::StepDetail;

fn raw(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn controller(db: Database) -> FunnelController<Database> {
    FunnelController::new(db, FunnelSettings::default())
        .with_today(NaiveDate::from_ymd_opt(2026, 5, 1).unwrap())
}

/// Test: a whole funnel run survives reopening the database between steps.
#[test]
fn test_funnel_walkthrough_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pcosreset.db");
    let open = || controller(Database::open_at(&path).unwrap());

    let session = open().start(None).unwrap().page.session_id;

    open().answer_raw(&raw(&["27-40"])).unwrap();
    open().answer_raw(&raw(&["acne", "fatigue"])).unwrap();
    open().next().unwrap();
    for answer in ["irregular", "sometimes", "comes-back", "afternoon-crashes"] {
        open().answer_raw(&raw(&[answer])).unwrap();
    }
    assert_eq!(open().view().unwrap().step, 7);
    open().next().unwrap();
    open().answer_raw(&raw(&["lose-weight"])).unwrap();
    open().next().unwrap();
    open().answer_raw(&raw(&["plump"])).unwrap();
    open().next().unwrap();
    for value in ["165", "80", "68", "34"] {
        open().answer_raw(&raw(&[value])).unwrap();
        open().next().unwrap();
    }

    let habits = open().view().unwrap();
    assert_eq!(habits.step, 15);
    assert!(habits.description.unwrap().contains("68kg to 80kg"));
    open().next().unwrap();

    for answer in ["desk-job", "occasionally", "2-6-glasses"] {
        open().answer_raw(&raw(&[answer])).unwrap();
    }
    open().answer_raw(&raw(&["sweets"])).unwrap();
    open().next().unwrap();
    open().answer_raw(&raw(&["walking"])).unwrap();
    open().next().unwrap();
    open().next().unwrap();

    let projection = open().view().unwrap();
    assert_eq!(projection.step, 22);
    match projection.detail {
        Some(StepDetail::GoalProjection(view)) => {
            assert_eq!(view.current_kg, 80.0);
            assert_eq!(view.target_kg, 68.0);
            assert_eq!(view.weeks_to_goal, 16);
        }
        other => panic!("expected goal projection, got {other:?}"),
    }
    open().next().unwrap();

    let response = open().next().unwrap();
    assert!(matches!(
        response.events.as_slice(),
        [Event::FunnelCompleted { .. }]
    ));
    assert!(response.page.completed);

    let state = open().state().unwrap();
    assert_eq!(state.session_id, session);
    let profile = open().user_profile().unwrap().unwrap();
    assert_eq!(profile.age, 34.0);
    assert_eq!(profile.exercise_preference, "occasionally");
}

/// Test: a required question blocks "continue" until it is answered.
#[test]
fn test_required_question_blocks_continue() {
    let dir = tempfile::tempdir().unwrap();
    let funnel = controller(Database::open_at(&dir.path().join("db.sqlite")).unwrap());

    let response = funnel.go_to(2).unwrap();
    assert!(!response.page.can_continue);
    let blocked = funnel.next().unwrap();
    assert!(matches!(blocked.events[0], Event::AdvanceBlocked { .. }));
    assert_eq!(blocked.page.step, 2);
}

/// Test: unknown steps redirect to the start without losing answers.
#[test]
fn test_out_of_range_step_redirects_to_start() {
    let dir = tempfile::tempdir().unwrap();
    let funnel = controller(Database::open_at(&dir.path().join("db.sqlite")).unwrap());
    funnel.answer_raw(&raw(&["41-50"])).unwrap();

    for requested in [0, 24, -3] {
        let response = funnel.go_to(requested).unwrap();
        assert_eq!(response.page.step, 1);
        assert!(matches!(
            response.events[0],
            Event::Redirected { to_step: 1, .. }
        ));
    }
    assert_eq!(funnel.state().unwrap().choice("age-range"), Some("41-50"));
}
