//! `PostgreSQL` store implementation for task lifecycle storage.

use super::{
    conversion::{
        comment_to_row, edge_to_row, row_to_comment, row_to_edge, row_to_task, row_to_time_log,
        task_to_row, time_log_to_row,
    },
    models::{BlockerRow, CommentRow, IdRow, TaskRow, TimeLogRow},
    schema::{task_blockers, task_comments, task_time_logs, tasks},
    sql::{bind_values, render_order_by, render_where},
};
use crate::task::{
    domain::{BlockerEdge, EdgeId, Task, TaskComment, TaskId, TimeLog},
    ports::{
        BlockerRepository, TaskActivityRepository, TaskRepository, TaskRepositoryError,
        TaskRepositoryResult,
    },
    query::{BlockerField, Predicate, TaskField, TaskQuery},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed store implementing every task repository port.
///
/// Foreign keys between tasks and their edges, comments, and time logs have
/// no cascade, so deleting a referenced task fails with
/// [`TaskRepositoryError::ReferenceConflict`].
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: TaskPgPool,
}

enum GuardedUpdate {
    Applied,
    Rejected,
    Missing,
}

impl PostgresTaskStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskStore {
    async fn create(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = task_to_row(task)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = task_to_row(task)?;
        self.run_blocking(move |connection| {
            let updated = diesel::update(tasks::table.find(task_id.into_inner()))
                .set(&row)
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn update_if(
        &self,
        task: &Task,
        guard: &Predicate<TaskField>,
    ) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = task_to_row(task)?;
        let clause = render_where(guard)?;
        let id_slot = clause.binds.len() + 1;
        let locking_read = format!(
            "SELECT id FROM tasks WHERE {} AND id = ${id_slot} FOR UPDATE",
            clause.sql
        );
        let binds = clause.binds;

        let outcome = self
            .run_blocking(move |connection| {
                connection
                    .transaction::<_, DieselError, _>(|tx| {
                        let locked = bind_values(diesel::sql_query(locking_read).into_boxed(), binds)
                            .bind::<diesel::sql_types::Uuid, _>(task_id.into_inner())
                            .get_result::<IdRow>(tx)
                            .optional()?;
                        if locked.is_none() {
                            let exists = tasks::table
                                .find(task_id.into_inner())
                                .select(tasks::id)
                                .first::<uuid::Uuid>(tx)
                                .optional()?
                                .is_some();
                            return Ok(if exists {
                                GuardedUpdate::Rejected
                            } else {
                                GuardedUpdate::Missing
                            });
                        }
                        diesel::update(tasks::table.find(task_id.into_inner()))
                            .set(&row)
                            .execute(tx)?;
                        Ok(GuardedUpdate::Applied)
                    })
                    .map_err(TaskRepositoryError::persistence)
            })
            .await?;

        match outcome {
            GuardedUpdate::Applied => Ok(()),
            GuardedUpdate::Rejected => Err(TaskRepositoryError::PreconditionFailed(task_id)),
            GuardedUpdate::Missing => Err(TaskRepositoryError::NotFound(task_id)),
        }
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let clause = render_where(query.filter())?;
        let statement = format!(
            "SELECT * FROM tasks WHERE {} ORDER BY {}",
            clause.sql,
            render_order_by(query.sort())
        );
        let binds = clause.binds;
        self.run_blocking(move |connection| {
            let rows = bind_values(diesel::sql_query(statement).into_boxed(), binds)
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.find(id.into_inner()))
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        TaskRepositoryError::ReferenceConflict(id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl BlockerRepository for PostgresTaskStore {
    async fn insert_edge(&self, edge: &BlockerEdge) -> TaskRepositoryResult<()> {
        let (task_id, blocker_id) = (edge.task_id(), edge.blocker_id());
        let row = edge_to_row(edge);
        self.run_blocking(move |connection| {
            diesel::insert_into(task_blockers::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, ref info) => {
                        if info.constraint_name() == Some("task_blockers_blocker_id_fkey") {
                            TaskRepositoryError::NotFound(blocker_id)
                        } else {
                            TaskRepositoryError::NotFound(task_id)
                        }
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn list_edges(
        &self,
        filter: &Predicate<BlockerField>,
    ) -> TaskRepositoryResult<Vec<BlockerEdge>> {
        let clause = render_where(filter)?;
        let statement = format!(
            "SELECT * FROM task_blockers WHERE {} ORDER BY created_at ASC, id ASC",
            clause.sql
        );
        let binds = clause.binds;
        self.run_blocking(move |connection| {
            let rows = bind_values(diesel::sql_query(statement).into_boxed(), binds)
                .load::<BlockerRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_edge).collect()
        })
        .await
    }

    async fn delete_edge(&self, id: EdgeId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            diesel::delete(task_blockers::table.find(id.into_inner()))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn delete_edges_touching(&self, task_id: TaskId) -> TaskRepositoryResult<usize> {
        let raw_id = task_id.into_inner();
        self.run_blocking(move |connection| {
            diesel::delete(
                task_blockers::table.filter(
                    task_blockers::task_id
                        .eq(raw_id)
                        .or(task_blockers::blocker_id.eq(raw_id)),
                ),
            )
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)
        })
        .await
    }
}

#[async_trait]
impl TaskActivityRepository for PostgresTaskStore {
    async fn append_comment(&self, comment: &TaskComment) -> TaskRepositoryResult<()> {
        let task_id = comment.task_id();
        let row = comment_to_row(comment);
        self.run_blocking(move |connection| {
            diesel::insert_into(task_comments::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| map_missing_parent(err, task_id))?;
            Ok(())
        })
        .await
    }

    async fn comments_for(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TaskComment>> {
        self.run_blocking(move |connection| {
            let rows = task_comments::table
                .filter(task_comments::task_id.eq(task_id.into_inner()))
                .order((task_comments::created_at.asc(), task_comments::id.asc()))
                .select(CommentRow::as_select())
                .load::<CommentRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_comment).collect()
        })
        .await
    }

    async fn record_time_log(&self, log: &TimeLog) -> TaskRepositoryResult<()> {
        let task_id = log.task_id();
        let row = time_log_to_row(log)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(task_time_logs::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| map_missing_parent(err, task_id))?;
            Ok(())
        })
        .await
    }

    async fn time_logs_for(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TimeLog>> {
        self.run_blocking(move |connection| {
            let rows = task_time_logs::table
                .filter(task_time_logs::task_id.eq(task_id.into_inner()))
                .order((task_time_logs::logged_at.asc(), task_time_logs::id.asc()))
                .select(TimeLogRow::as_select())
                .load::<TimeLogRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_time_log).collect()
        })
        .await
    }

    async fn purge_activity(&self, task_id: TaskId) -> TaskRepositoryResult<usize> {
        let raw_id = task_id.into_inner();
        self.run_blocking(move |connection| {
            connection
                .transaction::<_, DieselError, _>(|tx| {
                    let comments =
                        diesel::delete(task_comments::table.filter(task_comments::task_id.eq(raw_id)))
                            .execute(tx)?;
                    let logs = diesel::delete(
                        task_time_logs::table.filter(task_time_logs::task_id.eq(raw_id)),
                    )
                    .execute(tx)?;
                    Ok(comments + logs)
                })
                .map_err(TaskRepositoryError::persistence)
        })
        .await
    }
}

fn map_missing_parent(err: DieselError, task_id: TaskId) -> TaskRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            TaskRepositoryError::NotFound(task_id)
        }
        _ => TaskRepositoryError::persistence(err),
    }
}
