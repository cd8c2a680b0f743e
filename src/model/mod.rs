//! Records as stored, plus the validated inputs used to create and change them.

mod child;
mod chore;
mod task;

pub use child::{Child, ChildChanges, NewChild};
pub use chore::{Chore, ChoreChanges, ChoreStatus, NewChore};
pub use task::{NewTask, Task, TaskChanges};
