use super::tasks_for;
use crate::error::AppError;
use crate::model::{Child, ChildChanges, NewChild};
use crate::store::Store;
use crate::views::{child_view, ChildView};
use serde_json::Value;
use std::collections::HashMap;

pub struct ChildService;

impl ChildService {
    pub async fn list(store: &dyn Store) -> Result<Vec<ChildView>, AppError> {
        let children = store.list_children().await?;
        let ids: Vec<i64> = children.iter().map(|c| c.id).collect();
        let chores = store.chores_for_children(&ids).await?;
        let tasks = tasks_for(store, &chores).await?;
        Ok(children
            .iter()
            .map(|child| child_view(child, &chores, &tasks))
            .collect())
    }

    pub async fn get(store: &dyn Store, id: i64) -> Result<ChildView, AppError> {
        let child = store
            .find_child(id)
            .await?
            .ok_or_else(|| AppError::not_found("child", id))?;
        Self::view(store, &child).await
    }

    pub async fn create(store: &dyn Store, params: &HashMap<String, Value>) -> Result<ChildView, AppError> {
        let new = NewChild::from_params(params)?;
        let child = store.insert_child(&new).await?;
        tracing::info!(id = child.id, "child created");
        Self::view(store, &child).await
    }

    pub async fn update(
        store: &dyn Store,
        id: i64,
        params: &HashMap<String, Value>,
    ) -> Result<ChildView, AppError> {
        if store.find_child(id).await?.is_none() {
            return Err(AppError::not_found("child", id));
        }
        let changes = ChildChanges::from_params(params)?;
        let child = store
            .update_child(id, &changes)
            .await?
            .ok_or_else(|| AppError::not_found("child", id))?;
        tracing::info!(id, "child updated");
        Self::view(store, &child).await
    }

    pub async fn delete(store: &dyn Store, id: i64) -> Result<(), AppError> {
        if !store.delete_child(id).await? {
            return Err(AppError::not_found("child", id));
        }
        tracing::info!(id, "child deleted");
        Ok(())
    }

    async fn view(store: &dyn Store, child: &Child) -> Result<ChildView, AppError> {
        let chores = store.chores_for_children(&[child.id]).await?;
        let tasks = tasks_for(store, &chores).await?;
        Ok(child_view(child, &chores, &tasks))
    }
}
