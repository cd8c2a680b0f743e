use crate::error::AppError;
use crate::validation::{FieldReader, Presence};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Chore {
    pub id: i64,
    pub child_id: i64,
    pub task_id: i64,
    pub due_on: NaiveDate,
    pub completed: bool,
}

/// Completion state of a chore. Either state may follow the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoreStatus {
    Pending,
    Done,
}

impl ChoreStatus {
    pub fn is_done(self) -> bool {
        matches!(self, ChoreStatus::Done)
    }
}

impl Chore {
    pub fn status(&self) -> ChoreStatus {
        if self.completed {
            ChoreStatus::Done
        } else {
            ChoreStatus::Pending
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewChore {
    pub child_id: i64,
    pub task_id: i64,
    pub due_on: NaiveDate,
    pub completed: bool,
}

impl NewChore {
    pub fn from_params(params: &HashMap<String, Value>) -> Result<Self, AppError> {
        let mut r = FieldReader::new(params);
        let child_id = r.integer("child_id", Presence::Required);
        let task_id = r.integer("task_id", Presence::Required);
        let due_on = r.date("due_on", Presence::Required);
        let completed = r.boolean("completed", Presence::Required);
        match (child_id, task_id, due_on, completed, r.into_errors()) {
            (Some(child_id), Some(task_id), Some(due_on), Some(completed), errors)
                if errors.is_empty() =>
            {
                Ok(NewChore {
                    child_id,
                    task_id,
                    due_on,
                    completed,
                })
            }
            (.., errors) => Err(AppError::Validation(errors)),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChoreChanges {
    pub child_id: Option<i64>,
    pub task_id: Option<i64>,
    pub due_on: Option<NaiveDate>,
    pub completed: Option<bool>,
}

impl ChoreChanges {
    pub fn from_params(params: &HashMap<String, Value>) -> Result<Self, AppError> {
        let mut r = FieldReader::new(params);
        let changes = ChoreChanges {
            child_id: r.integer("child_id", Presence::Optional),
            task_id: r.integer("task_id", Presence::Optional),
            due_on: r.date("due_on", Presence::Optional),
            completed: r.boolean("completed", Presence::Optional),
        };
        let errors = r.into_errors();
        if errors.is_empty() {
            Ok(changes)
        } else {
            Err(AppError::Validation(errors))
        }
    }

    pub fn apply_to(&self, chore: &mut Chore) {
        if let Some(v) = self.child_id {
            chore.child_id = v;
        }
        if let Some(v) = self.task_id {
            chore.task_id = v;
        }
        if let Some(v) = self.due_on {
            chore.due_on = v;
        }
        if let Some(v) = self.completed {
            chore.completed = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(v: Value) -> HashMap<String, Value> {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn status_follows_completed_flag() {
        let mut chore = Chore {
            id: 1,
            child_id: 1,
            task_id: 1,
            due_on: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            completed: false,
        };
        assert_eq!(chore.status(), ChoreStatus::Pending);
        chore.completed = true;
        assert!(chore.status().is_done());
        chore.completed = false;
        assert_eq!(chore.status(), ChoreStatus::Pending);
    }

    #[test]
    fn new_chore_reports_every_bad_field() {
        let err = NewChore::from_params(&params(json!({"child_id": "x", "due_on": "tomorrow"}))).unwrap_err();
        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        for field in ["child_id", "task_id", "due_on", "completed"] {
            assert!(errors.get(field).is_some(), "{field} should fail");
        }
    }

    #[test]
    fn changes_parse_only_supplied_fields() {
        let changes = ChoreChanges::from_params(&params(json!({"completed": true}))).unwrap();
        assert_eq!(
            changes,
            ChoreChanges {
                completed: Some(true),
                ..Default::default()
            }
        );
    }
}
