//! In-process backend holding the three tables behind one lock. Enforces the same foreign keys
//! as the PostgreSQL schema.

use super::Store;
use crate::error::AppError;
use crate::model::{Child, ChildChanges, Chore, ChoreChanges, NewChild, NewChore, NewTask, Task, TaskChanges};
use crate::validation::{FieldErrors, MUST_EXIST};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    children: BTreeMap<i64, Child>,
    tasks: BTreeMap<i64, Task>,
    chores: BTreeMap<i64, Chore>,
    next_child_id: i64,
    next_task_id: i64,
    next_chore_id: i64,
}

impl Tables {
    fn check_references(&self, child_id: i64, task_id: i64) -> Result<(), AppError> {
        let mut errors = FieldErrors::default();
        if !self.children.contains_key(&child_id) {
            errors.add("child", MUST_EXIST);
        }
        if !self.tasks.contains_key(&task_id) {
            errors.add("task", MUST_EXIST);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::ReferentialIntegrity(errors))
        }
    }
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn list_children(&self) -> Result<Vec<Child>, AppError> {
        Ok(self.tables.read().await.children.values().cloned().collect())
    }

    async fn find_child(&self, id: i64) -> Result<Option<Child>, AppError> {
        Ok(self.tables.read().await.children.get(&id).cloned())
    }

    async fn insert_child(&self, new: &NewChild) -> Result<Child, AppError> {
        let mut t = self.tables.write().await;
        let child = Child {
            id: next_id(&mut t.next_child_id),
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            active: new.active,
        };
        t.children.insert(child.id, child.clone());
        Ok(child)
    }

    async fn update_child(&self, id: i64, changes: &ChildChanges) -> Result<Option<Child>, AppError> {
        let mut t = self.tables.write().await;
        Ok(t.children.get_mut(&id).map(|child| {
            changes.apply_to(child);
            child.clone()
        }))
    }

    async fn delete_child(&self, id: i64) -> Result<bool, AppError> {
        let mut t = self.tables.write().await;
        if !t.children.contains_key(&id) {
            return Ok(false);
        }
        if t.chores.values().any(|c| c.child_id == id) {
            return Err(AppError::Conflict(format!("child {} still has chores", id)));
        }
        t.children.remove(&id);
        Ok(true)
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        Ok(self.tables.read().await.tasks.values().cloned().collect())
    }

    async fn find_task(&self, id: i64) -> Result<Option<Task>, AppError> {
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }

    async fn tasks_by_ids(&self, ids: &[i64]) -> Result<Vec<Task>, AppError> {
        let t = self.tables.read().await;
        Ok(t.tasks
            .values()
            .filter(|task| ids.contains(&task.id))
            .cloned()
            .collect())
    }

    async fn insert_task(&self, new: &NewTask) -> Result<Task, AppError> {
        let mut t = self.tables.write().await;
        let task = Task {
            id: next_id(&mut t.next_task_id),
            name: new.name.clone(),
            points: new.points,
            active: new.active,
        };
        t.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: i64, changes: &TaskChanges) -> Result<Option<Task>, AppError> {
        let mut t = self.tables.write().await;
        Ok(t.tasks.get_mut(&id).map(|task| {
            changes.apply_to(task);
            task.clone()
        }))
    }

    async fn delete_task(&self, id: i64) -> Result<bool, AppError> {
        let mut t = self.tables.write().await;
        if !t.tasks.contains_key(&id) {
            return Ok(false);
        }
        if t.chores.values().any(|c| c.task_id == id) {
            return Err(AppError::Conflict(format!("task {} still has chores", id)));
        }
        t.tasks.remove(&id);
        Ok(true)
    }

    async fn list_chores(&self) -> Result<Vec<Chore>, AppError> {
        Ok(self.tables.read().await.chores.values().cloned().collect())
    }

    async fn find_chore(&self, id: i64) -> Result<Option<Chore>, AppError> {
        Ok(self.tables.read().await.chores.get(&id).cloned())
    }

    async fn chores_for_children(&self, child_ids: &[i64]) -> Result<Vec<Chore>, AppError> {
        let t = self.tables.read().await;
        Ok(t.chores
            .values()
            .filter(|c| child_ids.contains(&c.child_id))
            .cloned()
            .collect())
    }

    async fn chores_for_tasks(&self, task_ids: &[i64]) -> Result<Vec<Chore>, AppError> {
        let t = self.tables.read().await;
        Ok(t.chores
            .values()
            .filter(|c| task_ids.contains(&c.task_id))
            .cloned()
            .collect())
    }

    async fn insert_chore(&self, new: &NewChore) -> Result<Chore, AppError> {
        let mut t = self.tables.write().await;
        t.check_references(new.child_id, new.task_id)?;
        let chore = Chore {
            id: next_id(&mut t.next_chore_id),
            child_id: new.child_id,
            task_id: new.task_id,
            due_on: new.due_on,
            completed: new.completed,
        };
        t.chores.insert(chore.id, chore.clone());
        Ok(chore)
    }

    async fn update_chore(&self, id: i64, changes: &ChoreChanges) -> Result<Option<Chore>, AppError> {
        let mut t = self.tables.write().await;
        let Some(mut chore) = t.chores.get(&id).cloned() else {
            return Ok(None);
        };
        changes.apply_to(&mut chore);
        t.check_references(chore.child_id, chore.task_id)?;
        t.chores.insert(id, chore.clone());
        Ok(Some(chore))
    }

    async fn delete_chore(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.tables.write().await.chores.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ann() -> NewChild {
        NewChild {
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            active: true,
        }
    }

    fn dishes() -> NewTask {
        NewTask {
            name: "Dishes".into(),
            points: 5,
            active: true,
        }
    }

    fn chore_for(child_id: i64, task_id: i64) -> NewChore {
        NewChore {
            child_id,
            task_id,
            due_on: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            completed: false,
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_per_table_and_not_reused() {
        let store = MemoryStore::new();
        let a = store.insert_child(&ann()).await.unwrap();
        let b = store.insert_child(&ann()).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert!(store.delete_child(b.id).await.unwrap());
        let c = store.insert_child(&ann()).await.unwrap();
        assert_eq!(c.id, 3);
        assert_eq!(store.insert_task(&dishes()).await.unwrap().id, 1);
    }

    #[tokio::test]
    async fn chore_insert_checks_both_references() {
        let store = MemoryStore::new();
        let err = store.insert_chore(&chore_for(1, 1)).await.unwrap_err();
        let AppError::ReferentialIntegrity(errors) = err else {
            panic!("expected referential failure");
        };
        assert!(errors.get("child").is_some());
        assert!(errors.get("task").is_some());
        assert!(store.list_chores().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn referenced_rows_cannot_be_deleted() {
        let store = MemoryStore::new();
        let child = store.insert_child(&ann()).await.unwrap();
        let task = store.insert_task(&dishes()).await.unwrap();
        let chore = store.insert_chore(&chore_for(child.id, task.id)).await.unwrap();
        assert!(matches!(store.delete_child(child.id).await, Err(AppError::Conflict(_))));
        assert!(matches!(store.delete_task(task.id).await, Err(AppError::Conflict(_))));
        assert!(store.delete_chore(chore.id).await.unwrap());
        assert!(store.delete_child(child.id).await.unwrap());
        assert!(store.delete_task(task.id).await.unwrap());
    }

    #[tokio::test]
    async fn failed_chore_update_leaves_row_untouched() {
        let store = MemoryStore::new();
        let child = store.insert_child(&ann()).await.unwrap();
        let task = store.insert_task(&dishes()).await.unwrap();
        let chore = store.insert_chore(&chore_for(child.id, task.id)).await.unwrap();
        let changes = ChoreChanges {
            task_id: Some(42),
            completed: Some(true),
            ..Default::default()
        };
        assert!(store.update_chore(chore.id, &changes).await.is_err());
        assert_eq!(store.find_chore(chore.id).await.unwrap(), Some(chore));
    }

    #[tokio::test]
    async fn unknown_ids_report_absence() {
        let store = MemoryStore::new();
        assert_eq!(store.update_task(9, &TaskChanges::default()).await.unwrap(), None);
        assert!(!store.delete_task(9).await.unwrap());
        assert!(!store.delete_chore(9).await.unwrap());
    }
}
