//! Schema DDL for children, tasks and chores. Every statement is idempotent so it can run on each start.
//! Order follows foreign-key dependencies: chores references both other tables.

use crate::error::AppError;
use sqlx::PgPool;

const SCHEMA: &[(&str, &str)] = &[
    (
        "children",
        r#"
        CREATE TABLE IF NOT EXISTS children (
            id BIGSERIAL PRIMARY KEY,
            first_name VARCHAR NOT NULL,
            last_name VARCHAR NOT NULL,
            active BOOLEAN NOT NULL
        )"#,
    ),
    (
        "tasks",
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR NOT NULL,
            points BIGINT NOT NULL,
            active BOOLEAN NOT NULL
        )"#,
    ),
    (
        "chores",
        r#"
        CREATE TABLE IF NOT EXISTS chores (
            id BIGSERIAL PRIMARY KEY,
            child_id BIGINT NOT NULL CONSTRAINT chores_child_id_fkey REFERENCES children (id),
            task_id BIGINT NOT NULL CONSTRAINT chores_task_id_fkey REFERENCES tasks (id),
            due_on DATE NOT NULL,
            completed BOOLEAN NOT NULL
        )"#,
    ),
    (
        "index_chores_on_child_id",
        "CREATE INDEX IF NOT EXISTS index_chores_on_child_id ON chores (child_id)",
    ),
    (
        "index_chores_on_task_id",
        "CREATE INDEX IF NOT EXISTS index_chores_on_task_id ON chores (task_id)",
    ),
];

/// Create the three tables and the foreign-key indexes if they do not exist.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    for (name, ddl) in SCHEMA {
        tracing::debug!(object = %name, "applying schema");
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::info!(objects = SCHEMA.len(), "schema up to date");
    Ok(())
}
