//! HTTP handlers: the same five actions for each resource, delegating to its service.

macro_rules! resource_handlers {
    ($module:ident, $service:ty, $resource:expr) => {
        pub mod $module {
            use crate::error::AppError;
            use crate::extractors::{parse_id, Params};
            use crate::response::{created, no_content, ok_many, ok_one};
            use crate::state::AppState;
            use axum::{
                extract::{Path, State},
                response::IntoResponse,
            };

            pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
                let rows = <$service>::list(state.store()).await?;
                Ok(ok_many(rows))
            }

            pub async fn show(
                State(state): State<AppState>,
                Path(id): Path<String>,
            ) -> Result<impl IntoResponse, AppError> {
                let id = parse_id($resource, &id)?;
                Ok(ok_one(<$service>::get(state.store(), id).await?))
            }

            pub async fn create(
                State(state): State<AppState>,
                Params(params): Params,
            ) -> Result<impl IntoResponse, AppError> {
                Ok(created(<$service>::create(state.store(), &params).await?))
            }

            pub async fn update(
                State(state): State<AppState>,
                Path(id): Path<String>,
                Params(params): Params,
            ) -> Result<impl IntoResponse, AppError> {
                let id = parse_id($resource, &id)?;
                Ok(ok_one(<$service>::update(state.store(), id, &params).await?))
            }

            pub async fn destroy(
                State(state): State<AppState>,
                Path(id): Path<String>,
            ) -> Result<impl IntoResponse, AppError> {
                let id = parse_id($resource, &id)?;
                <$service>::delete(state.store(), id).await?;
                Ok(no_content())
            }
        }
    };
}

resource_handlers!(children, crate::service::ChildService, "child");
resource_handlers!(tasks, crate::service::TaskService, "task");
resource_handlers!(chores, crate::service::ChoreService, "chore");
