use crate::error::AppError;
use crate::model::{NewTask, Task, TaskChanges};
use crate::store::Store;
use crate::views::{task_view, TaskView};
use serde_json::Value;
use std::collections::HashMap;

pub struct TaskService;

impl TaskService {
    pub async fn list(store: &dyn Store) -> Result<Vec<TaskView>, AppError> {
        let tasks = store.list_tasks().await?;
        let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
        let chores = store.chores_for_tasks(&ids).await?;
        Ok(tasks.iter().map(|task| task_view(task, &chores)).collect())
    }

    pub async fn get(store: &dyn Store, id: i64) -> Result<TaskView, AppError> {
        let task = store
            .find_task(id)
            .await?
            .ok_or_else(|| AppError::not_found("task", id))?;
        Self::view(store, &task).await
    }

    pub async fn create(store: &dyn Store, params: &HashMap<String, Value>) -> Result<TaskView, AppError> {
        let new = NewTask::from_params(params)?;
        let task = store.insert_task(&new).await?;
        tracing::info!(id = task.id, "task created");
        Self::view(store, &task).await
    }

    pub async fn update(
        store: &dyn Store,
        id: i64,
        params: &HashMap<String, Value>,
    ) -> Result<TaskView, AppError> {
        if store.find_task(id).await?.is_none() {
            return Err(AppError::not_found("task", id));
        }
        let changes = TaskChanges::from_params(params)?;
        let task = store
            .update_task(id, &changes)
            .await?
            .ok_or_else(|| AppError::not_found("task", id))?;
        tracing::info!(id, "task updated");
        Self::view(store, &task).await
    }

    pub async fn delete(store: &dyn Store, id: i64) -> Result<(), AppError> {
        if !store.delete_task(id).await? {
            return Err(AppError::not_found("task", id));
        }
        tracing::info!(id, "task deleted");
        Ok(())
    }

    async fn view(store: &dyn Store, task: &Task) -> Result<TaskView, AppError> {
        let chores = store.chores_for_tasks(&[task.id]).await?;
        Ok(task_view(task, &chores))
    }
}
