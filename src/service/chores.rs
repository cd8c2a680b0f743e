use super::tasks_for;
use crate::validation::{FieldErrors, MUST_EXIST};
use crate::error::AppError;
use crate::model::{Chore, ChoreChanges, NewChore};
use crate::store::Store;
use crate::views::{chore_view, ChoreView};
use serde_json::Value;
use std::collections::HashMap;

pub struct ChoreService;

impl ChoreService {
    pub async fn list(store: &dyn Store) -> Result<Vec<ChoreView>, AppError> {
        let chores = store.list_chores().await?;
        let tasks = tasks_for(store, &chores).await?;
        Ok(chores.iter().map(|c| chore_view(c, &tasks)).collect())
    }

    pub async fn get(store: &dyn Store, id: i64) -> Result<ChoreView, AppError> {
        let chore = store
            .find_chore(id)
            .await?
            .ok_or_else(|| AppError::not_found("chore", id))?;
        Self::view(store, &chore).await
    }

    pub async fn create(store: &dyn Store, params: &HashMap<String, Value>) -> Result<ChoreView, AppError> {
        let new = NewChore::from_params(params)?;
        Self::check_references(store, Some(new.child_id), Some(new.task_id)).await?;
        let chore = store.insert_chore(&new).await?;
        tracing::info!(id = chore.id, child_id = chore.child_id, task_id = chore.task_id, "chore created");
        Self::view(store, &chore).await
    }

    pub async fn update(
        store: &dyn Store,
        id: i64,
        params: &HashMap<String, Value>,
    ) -> Result<ChoreView, AppError> {
        if store.find_chore(id).await?.is_none() {
            return Err(AppError::not_found("chore", id));
        }
        let changes = ChoreChanges::from_params(params)?;
        Self::check_references(store, changes.child_id, changes.task_id).await?;
        let chore = store
            .update_chore(id, &changes)
            .await?
            .ok_or_else(|| AppError::not_found("chore", id))?;
        tracing::info!(id, completed = chore.completed, "chore updated");
        Self::view(store, &chore).await
    }

    pub async fn delete(store: &dyn Store, id: i64) -> Result<(), AppError> {
        if !store.delete_chore(id).await? {
            return Err(AppError::not_found("chore", id));
        }
        tracing::info!(id, "chore deleted");
        Ok(())
    }

    /// Both references are checked so a single response names every missing one.
    async fn check_references(
        store: &dyn Store,
        child_id: Option<i64>,
        task_id: Option<i64>,
    ) -> Result<(), AppError> {
        let mut errors = FieldErrors::default();
        if let Some(id) = child_id {
            if store.find_child(id).await?.is_none() {
                errors.add("child", MUST_EXIST);
            }
        }
        if let Some(id) = task_id {
            if store.find_task(id).await?.is_none() {
                errors.add("task", MUST_EXIST);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::ReferentialIntegrity(errors))
        }
    }

    async fn view(store: &dyn Store, chore: &Chore) -> Result<ChoreView, AppError> {
        let tasks = tasks_for(store, std::slice::from_ref(chore)).await?;
        Ok(chore_view(chore, &tasks))
    }
}
