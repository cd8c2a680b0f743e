//! Resource services: list/get/create/update/delete per entity, returning views.

mod children;
mod chores;
mod tasks;

pub use children::ChildService;
pub use chores::ChoreService;
pub use tasks::TaskService;

use crate::error::AppError;
use crate::model::{Chore, Task};
use crate::store::Store;
use std::collections::HashMap;

/// Batch-loads the tasks referenced by `chores`, keyed by id.
async fn tasks_for(store: &dyn Store, chores: &[Chore]) -> Result<HashMap<i64, Task>, AppError> {
    let mut ids: Vec<i64> = chores.iter().map(|c| c.task_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let tasks = store.tasks_by_ids(&ids).await?;
    Ok(tasks.into_iter().map(|t| (t.id, t)).collect())
}
