use crate::error::AppError;
use crate::validation::{FieldReader, Presence};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub points: i64,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub points: i64,
    pub active: bool,
}

impl NewTask {
    pub fn from_params(params: &HashMap<String, Value>) -> Result<Self, AppError> {
        let mut r = FieldReader::new(params);
        let name = r.string("name", Presence::Required);
        let points = r.integer("points", Presence::Required);
        let active = r.boolean("active", Presence::Required);
        match (name, points, active, r.into_errors()) {
            (Some(name), Some(points), Some(active), errors) if errors.is_empty() => Ok(NewTask {
                name,
                points,
                active,
            }),
            (.., errors) => Err(AppError::Validation(errors)),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskChanges {
    pub name: Option<String>,
    pub points: Option<i64>,
    pub active: Option<bool>,
}

impl TaskChanges {
    pub fn from_params(params: &HashMap<String, Value>) -> Result<Self, AppError> {
        let mut r = FieldReader::new(params);
        let changes = TaskChanges {
            name: r.string("name", Presence::Optional),
            points: r.integer("points", Presence::Optional),
            active: r.boolean("active", Presence::Optional),
        };
        let errors = r.into_errors();
        if errors.is_empty() {
            Ok(changes)
        } else {
            Err(AppError::Validation(errors))
        }
    }

    pub fn apply_to(&self, task: &mut Task) {
        if let Some(v) = &self.name {
            task.name = v.clone();
        }
        if let Some(v) = self.points {
            task.points = v;
        }
        if let Some(v) = self.active {
            task.active = v;
        }
    }
}
