//! `/{resource}` and `/{resource}/:id` for children, tasks and chores. PUT and PATCH both update.

use crate::handlers::{children, chores, tasks};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn resource_routes(state: AppState) -> Router {
    Router::new()
        .route("/children", get(children::list).post(children::create))
        .route(
            "/children/:id",
            get(children::show)
                .patch(children::update)
                .put(children::update)
                .delete(children::destroy),
        )
        .route("/tasks", get(tasks::list).post(tasks::create))
        .route(
            "/tasks/:id",
            get(tasks::show)
                .patch(tasks::update)
                .put(tasks::update)
                .delete(tasks::destroy),
        )
        .route("/chores", get(chores::list).post(chores::create))
        .route(
            "/chores/:id",
            get(chores::show)
                .patch(chores::update)
                .put(chores::update)
                .delete(chores::destroy),
        )
        .with_state(state)
}
