//! Entity persistence. `PgStore` is the production backend; `MemoryStore` keeps the same
//! constraints in process for tests and database-less runs.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, PgStore};

use crate::error::AppError;
use crate::model::{Child, ChildChanges, Chore, ChoreChanges, NewChild, NewChore, NewTask, Task, TaskChanges};
use async_trait::async_trait;

/// Row access for the three resources. Lists are ordered by id.
///
/// `update_*` returns `None` and `delete_*` returns `false` when the id is unknown.
/// Writes that break a foreign key fail with `AppError::ReferentialIntegrity` (chore
/// insert/update) or `AppError::Conflict` (child/task delete).
#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;

    async fn list_children(&self) -> Result<Vec<Child>, AppError>;
    async fn find_child(&self, id: i64) -> Result<Option<Child>, AppError>;
    async fn insert_child(&self, new: &NewChild) -> Result<Child, AppError>;
    async fn update_child(&self, id: i64, changes: &ChildChanges) -> Result<Option<Child>, AppError>;
    async fn delete_child(&self, id: i64) -> Result<bool, AppError>;

    async fn list_tasks(&self) -> Result<Vec<Task>, AppError>;
    async fn find_task(&self, id: i64) -> Result<Option<Task>, AppError>;
    async fn tasks_by_ids(&self, ids: &[i64]) -> Result<Vec<Task>, AppError>;
    async fn insert_task(&self, new: &NewTask) -> Result<Task, AppError>;
    async fn update_task(&self, id: i64, changes: &TaskChanges) -> Result<Option<Task>, AppError>;
    async fn delete_task(&self, id: i64) -> Result<bool, AppError>;

    async fn list_chores(&self) -> Result<Vec<Chore>, AppError>;
    async fn find_chore(&self, id: i64) -> Result<Option<Chore>, AppError>;
    async fn chores_for_children(&self, child_ids: &[i64]) -> Result<Vec<Chore>, AppError>;
    async fn chores_for_tasks(&self, task_ids: &[i64]) -> Result<Vec<Chore>, AppError>;
    async fn insert_chore(&self, new: &NewChore) -> Result<Chore, AppError>;
    async fn update_chore(&self, id: i64, changes: &ChoreChanges) -> Result<Option<Chore>, AppError>;
    async fn delete_chore(&self, id: i64) -> Result<bool, AppError>;
}
