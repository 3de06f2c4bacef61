//! Domain-focused tests for task construction, ownership, and activity.

use super::support::{FixedClock, user};
use crate::task::domain::{
    ActingIdentity, BlockerEdge, DependencyViolation, Recurrence, RecurrencePattern, Task,
    TaskComment, TaskDomainError, TaskDraft, TaskId, TaskKind, TaskPriority, TaskStatus, TeamId,
    TimeLog, UserId,
};
use chrono::{NaiveDate, TimeZone, Utc};
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> FixedClock {
    FixedClock::default()
}

#[rstest]
#[case("")]
#[case("   ")]
fn user_id_rejects_blank_values(#[case] raw: &str) {
    assert_eq!(
        UserId::new(raw),
        Err(TaskDomainError::InvalidUserId(raw.to_owned()))
    );
}

#[rstest]
fn team_id_rejects_empty_value() {
    assert!(matches!(TeamId::new(""), Err(TaskDomainError::InvalidTeamId(_))));
}

#[rstest]
#[case(None)]
#[case(Some(""))]
#[case(Some("  "))]
fn acting_identity_requires_a_session_user(#[case] session_user: Option<&str>) {
    assert_eq!(
        ActingIdentity::authenticated(session_user),
        Err(TaskDomainError::AuthenticationRequired)
    );
}

#[rstest]
fn acting_identity_trims_session_user() {
    let identity = ActingIdentity::authenticated(Some(" alice ")).expect("authenticated");
    assert_eq!(identity.user_id().as_str(), "alice");
}

#[rstest]
fn create_applies_defaults(clock: FixedClock) {
    let owner = user("alice");
    let task = Task::create(TaskDraft::new("  Write report  "), &owner, &clock)
        .expect("task creation should succeed");

    assert_eq!(task.title(), "Write report");
    assert_eq!(task.status(), TaskStatus::Todo);
    assert_eq!(task.priority(), TaskPriority::Medium);
    assert_eq!(task.kind(), TaskKind::Task);
    assert_eq!(task.owner(), &owner);
    assert_eq!(task.created_at(), task.updated_at());
    assert!(task.completed_at().is_none());
    assert!(task.archived_at().is_none());
    assert!(task.deleted_at().is_none());
}

#[rstest]
fn create_keeps_explicit_owner_and_status(clock: FixedClock) {
    let draft = TaskDraft::new("Delegated")
        .with_owner(user("bob"))
        .with_status(TaskStatus::Done);
    let task = Task::create(draft, &user("alice"), &clock).expect("task creation");

    assert_eq!(task.owner().as_str(), "bob");
    assert_eq!(task.completed_at(), Some(task.created_at()));
}

#[rstest]
fn create_rejects_blank_title(clock: FixedClock) {
    let result = Task::create(TaskDraft::new(" \t "), &user("alice"), &clock);
    assert_eq!(result, Err(TaskDomainError::EmptyTitle));
}

#[rstest]
fn create_deduplicates_tags(clock: FixedClock) {
    let draft = TaskDraft::new("Tagged").with_tags(vec![
        "work".to_owned(),
        " work ".to_owned(),
        "home".to_owned(),
    ]);
    let task = Task::create(draft, &user("alice"), &clock).expect("task creation");
    assert_eq!(task.tags(), ["work".to_owned(), "home".to_owned()]);
}

#[rstest]
fn create_rejects_blank_tag(clock: FixedClock) {
    let draft = TaskDraft::new("Tagged").with_tags(vec![String::new()]);
    let result = Task::create(draft, &user("alice"), &clock);
    assert_eq!(result, Err(TaskDomainError::EmptyTag));
}

#[rstest]
fn meeting_draft_carries_meeting_fields(clock: FixedClock) {
    let start = Utc.with_ymd_and_hms(2024, 6, 3, 14, 0, 0).single().expect("start");
    let end = Utc.with_ymd_and_hms(2024, 6, 3, 15, 0, 0).single().expect("end");
    let draft = TaskDraft::new("Sync")
        .as_meeting(start, end)
        .with_location("Room 4")
        .with_meeting_url("https://meet.example/sync");
    let task = Task::create(draft, &user("alice"), &clock).expect("task creation");

    assert_eq!(task.kind(), TaskKind::Meeting);
    assert_eq!(task.start_time(), Some(start));
    assert_eq!(task.end_time(), Some(end));
    assert_eq!(task.location(), Some("Room 4"));
    assert_eq!(task.meeting_url(), Some("https://meet.example/sync"));
}

#[rstest]
#[case("alice", true)]
#[case("bob", true)]
#[case("carol", false)]
fn accessibility_follows_owner_and_assignee(
    clock: FixedClock,
    #[case] candidate: &str,
    #[case] expected: bool,
) {
    let draft = TaskDraft::new("Shared").with_assignee(user("bob"));
    let task = Task::create(draft, &user("alice"), &clock).expect("task creation");

    assert_eq!(task.is_accessible_by(&user(candidate)), expected);
}

#[rstest]
fn ensure_accessible_reports_unauthorized(clock: FixedClock) {
    let task = Task::create(TaskDraft::new("Private"), &user("alice"), &clock)
        .expect("task creation");
    let result = task.ensure_accessible_by(&user("mallory"));

    assert_eq!(
        result,
        Err(TaskDomainError::Unauthorized {
            task_id: task.id(),
            user_id: user("mallory"),
        })
    );
}

#[rstest]
fn add_tag_is_idempotent(clock: FixedClock) {
    let mut task =
        Task::create(TaskDraft::new("Tag me"), &user("alice"), &clock).expect("task creation");

    assert_eq!(task.add_tag("urgent", &clock), Ok(true));
    assert_eq!(task.add_tag(" urgent ", &clock), Ok(false));
    assert_eq!(task.add_tag("", &clock), Err(TaskDomainError::EmptyTag));
    assert_eq!(task.tags(), ["urgent".to_owned()]);
}

#[rstest]
fn blocker_edge_rejects_self_block(clock: FixedClock) {
    let id = TaskId::new();
    let result = BlockerEdge::new(id, id, user("alice"), &clock);

    assert_eq!(
        result,
        Err(TaskDomainError::InvalidDependency {
            task_id: id,
            blocker_id: id,
            violation: DependencyViolation::SelfBlock,
        })
    );
}

#[rstest]
fn blocker_edge_touches_both_endpoints(clock: FixedClock) {
    let (task_id, blocker_id) = (TaskId::new(), TaskId::new());
    let edge = BlockerEdge::new(task_id, blocker_id, user("alice"), &clock).expect("valid edge");

    assert!(edge.touches(task_id));
    assert!(edge.touches(blocker_id));
    assert!(!edge.touches(TaskId::new()));
}

#[rstest]
fn comment_rejects_blank_body(clock: FixedClock) {
    let result = TaskComment::new(TaskId::new(), user("alice"), "   ", &clock);
    assert_eq!(result, Err(TaskDomainError::EmptyComment));
}

#[rstest]
fn time_log_rejects_zero_minutes(clock: FixedClock) {
    let result = TimeLog::new(TaskId::new(), user("alice"), 0, &clock);
    assert_eq!(result, Err(TaskDomainError::InvalidTimeLog));
}

#[rstest]
#[case(TaskStatus::InProgress, "\"in_progress\"")]
#[case(TaskStatus::Unassigned, "\"unassigned\"")]
fn status_serialises_in_storage_form(#[case] status: TaskStatus, #[case] expected: &str) {
    let json = serde_json::to_string(&status).expect("status serialises");
    assert_eq!(json, expected);
    assert_eq!(json.trim_matches('"'), status.as_str());
}

#[rstest]
fn recurrence_survives_a_json_round_trip() {
    let end = NaiveDate::from_ymd_opt(2024, 3, 31).expect("valid date");
    let recurrence = Recurrence::new(RecurrencePattern::Monthly).until(end);

    let json = serde_json::to_value(recurrence).expect("recurrence serialises");
    assert_eq!(
        json,
        serde_json::json!({ "pattern": "monthly", "end": "2024-03-31" })
    );
    let decoded: Recurrence = serde_json::from_value(json).expect("recurrence deserialises");
    assert_eq!(decoded, recurrence);
}
