//! JSON views of the stored records. Derived fields (child `name`, chore `completed`, the
//! completed/pending split) are computed here and never stored.

use crate::model::{Child, Chore, Task};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildView {
    pub id: i64,
    pub name: String,
    pub active: bool,
    pub completed_chores: Vec<ChoreView>,
    pub pending_chores: Vec<ChoreView>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoreView {
    pub id: i64,
    pub child_id: i64,
    pub due_on: NaiveDate,
    pub completed: bool,
    pub task: Option<ChoreTaskView>,
}

/// The task as seen from a chore: identity and name only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoreTaskView {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskView {
    pub id: i64,
    pub name: String,
    pub points: i64,
    pub active: bool,
    pub chores: Vec<TaskChoreView>,
}

/// A chore listed under its task; the task itself is not repeated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskChoreView {
    pub id: i64,
    pub child_id: i64,
    pub due_on: NaiveDate,
    pub completed: bool,
}

pub fn chore_view(chore: &Chore, tasks: &HashMap<i64, Task>) -> ChoreView {
    ChoreView {
        id: chore.id,
        child_id: chore.child_id,
        due_on: chore.due_on,
        completed: chore.status().is_done(),
        task: tasks.get(&chore.task_id).map(|t| ChoreTaskView {
            id: t.id,
            name: t.name.clone(),
        }),
    }
}

/// `chores` may hold other children's chores; only this child's are used.
pub fn child_view(child: &Child, chores: &[Chore], tasks: &HashMap<i64, Task>) -> ChildView {
    let (completed, pending): (Vec<&Chore>, Vec<&Chore>) = chores
        .iter()
        .filter(|c| c.child_id == child.id)
        .partition(|c| c.status().is_done());
    ChildView {
        id: child.id,
        name: child.full_name(),
        active: child.active,
        completed_chores: completed.into_iter().map(|c| chore_view(c, tasks)).collect(),
        pending_chores: pending.into_iter().map(|c| chore_view(c, tasks)).collect(),
    }
}

pub fn task_view(task: &Task, chores: &[Chore]) -> TaskView {
    TaskView {
        id: task.id,
        name: task.name.clone(),
        points: task.points,
        active: task.active,
        chores: chores
            .iter()
            .filter(|c| c.task_id == task.id)
            .map(|c| TaskChoreView {
                id: c.id,
                child_id: c.child_id,
                due_on: c.due_on,
                completed: c.status().is_done(),
            })
            .collect(),
    }
}
