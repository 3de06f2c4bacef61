//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Task records across every soft-state.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Non-empty title.
        title -> Text,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Work status.
        #[max_length = 50]
        status -> Varchar,
        /// Priority.
        #[max_length = 50]
        priority -> Varchar,
        /// Record kind.
        #[max_length = 50]
        kind -> Varchar,
        /// Due date.
        due_date -> Nullable<Date>,
        /// Scheduled time.
        scheduled_time -> Nullable<Timestamptz>,
        /// Meeting start.
        start_time -> Nullable<Timestamptz>,
        /// Meeting end.
        end_time -> Nullable<Timestamptz>,
        /// Estimated duration in minutes.
        duration_minutes -> Nullable<Int4>,
        /// Recurrence pattern.
        #[max_length = 50]
        recurrence_pattern -> Nullable<Varchar>,
        /// Last date an occurrence may fall on.
        recurrence_end -> Nullable<Date>,
        /// Meeting location.
        location -> Nullable<Text>,
        /// Meeting link.
        meeting_url -> Nullable<Text>,
        /// Category association.
        #[max_length = 255]
        category_id -> Nullable<Varchar>,
        /// Project association.
        #[max_length = 255]
        project_id -> Nullable<Varchar>,
        /// Context association.
        #[max_length = 255]
        context_id -> Nullable<Varchar>,
        /// Tags.
        tags -> Array<Text>,
        /// Owning user.
        #[max_length = 255]
        owner -> Varchar,
        /// Assigned user.
        #[max_length = 255]
        assigned_to -> Nullable<Varchar>,
        /// Claiming user.
        #[max_length = 255]
        claimed_by -> Nullable<Varchar>,
        /// Claim timestamp.
        claimed_at -> Nullable<Timestamptz>,
        /// Owning team.
        #[max_length = 255]
        team_id -> Nullable<Varchar>,
        /// Reason recorded with the blocked status.
        blocked_reason -> Nullable<Text>,
        /// Archive timestamp.
        archived_at -> Nullable<Timestamptz>,
        /// Trash timestamp.
        deleted_at -> Nullable<Timestamptz>,
        /// Completion timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Directed "is blocked by" edges.
    task_blockers (id) {
        /// Edge identifier.
        id -> Uuid,
        /// Dependent task.
        task_id -> Uuid,
        /// Blocking task.
        blocker_id -> Uuid,
        /// User that recorded the edge.
        #[max_length = 255]
        owner -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Comments attached to tasks.
    task_comments (id) {
        /// Comment identifier.
        id -> Uuid,
        /// Commented task.
        task_id -> Uuid,
        /// Author.
        #[max_length = 255]
        author -> Varchar,
        /// Comment text.
        body -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Time spent on tasks.
    task_time_logs (id) {
        /// Entry identifier.
        id -> Uuid,
        /// Task the time was spent on.
        task_id -> Uuid,
        /// User that logged the time.
        #[max_length = 255]
        user_id -> Varchar,
        /// Minutes spent.
        minutes -> Int4,
        /// Logging timestamp.
        logged_at -> Timestamptz,
    }
}

diesel::joinable!(task_comments -> tasks (task_id));
diesel::joinable!(task_time_logs -> tasks (task_id));

diesel::allow_tables_to_appear_in_same_query!(tasks, task_blockers, task_comments, task_time_logs);
