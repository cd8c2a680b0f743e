use crate::error::AppError;
use crate::validation::{FieldReader, Presence};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Child {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub active: bool,
}

impl Child {
    /// First and last name joined by a single space; an empty part is skipped.
    pub fn full_name(&self) -> String {
        [self.first_name.trim(), self.last_name.trim()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewChild {
    pub first_name: String,
    pub last_name: String,
    pub active: bool,
}

impl NewChild {
    pub fn from_params(params: &HashMap<String, Value>) -> Result<Self, AppError> {
        let mut r = FieldReader::new(params);
        let first_name = r.string("first_name", Presence::Required);
        let last_name = r.string("last_name", Presence::Required);
        let active = r.boolean("active", Presence::Required);
        match (first_name, last_name, active, r.into_errors()) {
            (Some(first_name), Some(last_name), Some(active), errors) if errors.is_empty() => {
                Ok(NewChild {
                    first_name,
                    last_name,
                    active,
                })
            }
            (.., errors) => Err(AppError::Validation(errors)),
        }
    }
}

/// Partial update: `None` keeps the stored value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChildChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub active: Option<bool>,
}

impl ChildChanges {
    pub fn from_params(params: &HashMap<String, Value>) -> Result<Self, AppError> {
        let mut r = FieldReader::new(params);
        let changes = ChildChanges {
            first_name: r.string("first_name", Presence::Optional),
            last_name: r.string("last_name", Presence::Optional),
            active: r.boolean("active", Presence::Optional),
        };
        let errors = r.into_errors();
        if errors.is_empty() {
            Ok(changes)
        } else {
            Err(AppError::Validation(errors))
        }
    }

    pub fn apply_to(&self, child: &mut Child) {
        if let Some(v) = &self.first_name {
            child.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            child.last_name = v.clone();
        }
        if let Some(v) = self.active {
            child.active = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn child(first: &str, last: &str) -> Child {
        Child {
            id: 1,
            first_name: first.into(),
            last_name: last.into(),
            active: true,
        }
    }

    fn params(v: Value) -> HashMap<String, Value> {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn full_name_joins_with_one_space() {
        assert_eq!(child("Ann", "Lee").full_name(), "Ann Lee");
        assert_eq!(child(" Ann ", " Lee").full_name(), "Ann Lee");
    }

    #[test]
    fn full_name_skips_empty_parts() {
        assert_eq!(child("Ann", "").full_name(), "Ann");
        assert_eq!(child("", "Lee").full_name(), "Lee");
    }

    #[test]
    fn new_child_requires_every_field() {
        let err = NewChild::from_params(&params(json!({"first_name": "Ann"}))).unwrap_err();
        match err {
            AppError::Validation(errors) => {
                assert!(errors.get("first_name").is_none());
                assert!(errors.get("last_name").is_some());
                assert!(errors.get("active").is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let new = NewChild::from_params(&params(
            json!({"first_name": "Ann", "last_name": "Lee", "active": true, "id": 99, "admin": true}),
        ))
        .unwrap();
        assert_eq!(new.first_name, "Ann");
    }

    #[test]
    fn changes_only_touch_supplied_fields() {
        let changes = ChildChanges::from_params(&params(json!({"active": false}))).unwrap();
        let mut c = child("Ann", "Lee");
        changes.apply_to(&mut c);
        assert_eq!(c, Child { active: false, ..child("Ann", "Lee") });
    }
}
