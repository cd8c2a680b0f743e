//! PostgreSQL backend. Partial updates use `COALESCE($n, column)` so unset fields keep their value.

use super::Store;
use crate::error::{is_foreign_key_violation, AppError, ConfigError};
use crate::model::{Child, ChildChanges, Chore, ChoreChanges, NewChild, NewChore, NewTask, Task, TaskChanges};
use crate::validation::{FieldErrors, MUST_EXIST};
use async_trait::async_trait;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

const CHILD_COLUMNS: &str = "id, first_name, last_name, active";
const TASK_COLUMNS: &str = "id, name, points, active";
const CHORE_COLUMNS: &str = "id, child_id, task_id, due_on, completed";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Turns a foreign-key failure on a chore write into field errors naming the missing reference.
fn chore_reference_error(e: sqlx::Error) -> AppError {
    if !is_foreign_key_violation(&e) {
        return AppError::Db(e);
    }
    let constraint = e
        .as_database_error()
        .and_then(|d| d.constraint())
        .unwrap_or_default()
        .to_string();
    let mut errors = FieldErrors::default();
    if constraint.contains("task") {
        errors.add("task", MUST_EXIST);
    } else {
        errors.add("child", MUST_EXIST);
    }
    AppError::ReferentialIntegrity(errors)
}

fn delete_conflict(resource: &str, id: i64) -> impl FnOnce(sqlx::Error) -> AppError + '_ {
    move |e| {
        if is_foreign_key_violation(&e) {
            AppError::Conflict(format!("{} {} still has chores", resource, id))
        } else {
            AppError::Db(e)
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }

    async fn list_children(&self) -> Result<Vec<Child>, AppError> {
        let sql = format!("SELECT {} FROM children ORDER BY id", CHILD_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as::<_, Child>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_child(&self, id: i64) -> Result<Option<Child>, AppError> {
        let sql = format!("SELECT {} FROM children WHERE id = $1", CHILD_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        Ok(sqlx::query_as::<_, Child>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_child(&self, new: &NewChild) -> Result<Child, AppError> {
        let sql = format!(
            "INSERT INTO children (first_name, last_name, active) VALUES ($1, $2, $3) RETURNING {}",
            CHILD_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as::<_, Child>(&sql)
            .bind(&new.first_name)
            .bind(&new.last_name)
            .bind(new.active)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_child(&self, id: i64, changes: &ChildChanges) -> Result<Option<Child>, AppError> {
        let sql = format!(
            "UPDATE children SET first_name = COALESCE($2, first_name), last_name = COALESCE($3, last_name), \
             active = COALESCE($4, active) WHERE id = $1 RETURNING {}",
            CHILD_COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        Ok(sqlx::query_as::<_, Child>(&sql)
            .bind(id)
            .bind(changes.first_name.as_deref())
            .bind(changes.last_name.as_deref())
            .bind(changes.active)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_child(&self, id: i64) -> Result<bool, AppError> {
        let sql = "DELETE FROM children WHERE id = $1";
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(delete_conflict("child", id))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        let sql = format!("SELECT {} FROM tasks ORDER BY id", TASK_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as::<_, Task>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_task(&self, id: i64) -> Result<Option<Task>, AppError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn tasks_by_ids(&self, ids: &[i64]) -> Result<Vec<Task>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {} FROM tasks WHERE id = ANY($1) ORDER BY id", TASK_COLUMNS);
        tracing::debug!(sql = %sql, ids = ?ids, "query");
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn insert_task(&self, new: &NewTask) -> Result<Task, AppError> {
        let sql = format!(
            "INSERT INTO tasks (name, points, active) VALUES ($1, $2, $3) RETURNING {}",
            TASK_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(&new.name)
            .bind(new.points)
            .bind(new.active)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_task(&self, id: i64, changes: &TaskChanges) -> Result<Option<Task>, AppError> {
        let sql = format!(
            "UPDATE tasks SET name = COALESCE($2, name), points = COALESCE($3, points), \
             active = COALESCE($4, active) WHERE id = $1 RETURNING {}",
            TASK_COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(changes.name.as_deref())
            .bind(changes.points)
            .bind(changes.active)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_task(&self, id: i64) -> Result<bool, AppError> {
        let sql = "DELETE FROM tasks WHERE id = $1";
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(delete_conflict("task", id))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_chores(&self) -> Result<Vec<Chore>, AppError> {
        let sql = format!("SELECT {} FROM chores ORDER BY id", CHORE_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as::<_, Chore>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_chore(&self, id: i64) -> Result<Option<Chore>, AppError> {
        let sql = format!("SELECT {} FROM chores WHERE id = $1", CHORE_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        Ok(sqlx::query_as::<_, Chore>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn chores_for_children(&self, child_ids: &[i64]) -> Result<Vec<Chore>, AppError> {
        if child_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {} FROM chores WHERE child_id = ANY($1) ORDER BY id", CHORE_COLUMNS);
        tracing::debug!(sql = %sql, child_ids = ?child_ids, "query");
        Ok(sqlx::query_as::<_, Chore>(&sql)
            .bind(child_ids)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn chores_for_tasks(&self, task_ids: &[i64]) -> Result<Vec<Chore>, AppError> {
        if task_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {} FROM chores WHERE task_id = ANY($1) ORDER BY id", CHORE_COLUMNS);
        tracing::debug!(sql = %sql, task_ids = ?task_ids, "query");
        Ok(sqlx::query_as::<_, Chore>(&sql)
            .bind(task_ids)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn insert_chore(&self, new: &NewChore) -> Result<Chore, AppError> {
        let sql = format!(
            "INSERT INTO chores (child_id, task_id, due_on, completed) VALUES ($1, $2, $3, $4) RETURNING {}",
            CHORE_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        sqlx::query_as::<_, Chore>(&sql)
            .bind(new.child_id)
            .bind(new.task_id)
            .bind(new.due_on)
            .bind(new.completed)
            .fetch_one(&self.pool)
            .await
            .map_err(chore_reference_error)
    }

    async fn update_chore(&self, id: i64, changes: &ChoreChanges) -> Result<Option<Chore>, AppError> {
        let sql = format!(
            "UPDATE chores SET child_id = COALESCE($2, child_id), task_id = COALESCE($3, task_id), \
             due_on = COALESCE($4, due_on), completed = COALESCE($5, completed) WHERE id = $1 RETURNING {}",
            CHORE_COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        sqlx::query_as::<_, Chore>(&sql)
            .bind(id)
            .bind(changes.child_id)
            .bind(changes.task_id)
            .bind(changes.due_on)
            .bind(changes.completed)
            .fetch_optional(&self.pool)
            .await
            .map_err(chore_reference_error)
    }

    async fn delete_chore(&self, id: i64) -> Result<bool, AppError> {
        let sql = "DELETE FROM chores WHERE id = $1";
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Connects to the server's `postgres` database and creates the target database if it is missing.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = split_database_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url).map_err(|_| {
        ConfigError::InvalidValue {
            key: "DATABASE_URL",
            value: database_url.to_string(),
        }
    })?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Splits `postgres://host/db?opts` into (`postgres://host/postgres?opts`, `db`).
fn split_database_url(url: &str) -> Result<(String, String), ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        key: "DATABASE_URL",
        value: url.to_string(),
    };
    let scheme_end = url.find("://").ok_or_else(invalid)? + 3;
    let path_start = url[scheme_end..]
        .find('/')
        .map(|i| scheme_end + i + 1)
        .ok_or_else(invalid)?;
    let rest = &url[path_start..];
    let (db_name, query) = match rest.split_once('?') {
        Some((db, q)) => (db, Some(q)),
        None => (rest, None),
    };
    let mut admin_url = format!("{}postgres", &url[..path_start]);
    if let Some(q) = query {
        admin_url.push('?');
        admin_url.push_str(q);
    }
    Ok((admin_url, db_name.trim().to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
