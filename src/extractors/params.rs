//! Body parameters from either a JSON object or an urlencoded form.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use serde_json::Value;
use std::collections::HashMap;

/// Field name -> raw value. Form fields arrive as strings and are cast during validation.
/// A request with no body yields no fields.
#[derive(Clone, Debug, Default)]
pub struct Params(pub HashMap<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for Params
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);
        if is_form {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| AppError::from_rejection(e.status(), e.body_text()))?;
            return Ok(Params(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect(),
            ));
        }
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::from_rejection(e.status(), e.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Params::default());
        }
        parse_json(&bytes)
    }
}

fn parse_json(bytes: &[u8]) -> Result<Params, AppError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| AppError::BadRequest(format!("invalid JSON body: {}", e)))?;
    match value {
        Value::Object(m) => Ok(Params(m.into_iter().collect())),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

/// Path ids that do not parse name no record, so they are NotFound rather than BadRequest.
pub fn parse_id(resource: &str, raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::not_found(resource, raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use serde_json::json;

    async fn extract(content_type: Option<&str>, body: &'static str) -> Result<Params, AppError> {
        let mut builder = HttpRequest::builder().method("POST").uri("/children");
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        let req = builder.body(Body::from(body)).unwrap();
        Params::from_request(req, &()).await
    }

    #[tokio::test]
    async fn json_object_body() {
        let Params(p) = extract(Some("application/json"), r#"{"first_name":"Ann","active":true}"#)
            .await
            .unwrap();
        assert_eq!(p.get("first_name"), Some(&json!("Ann")));
        assert_eq!(p.get("active"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn form_body_values_are_strings() {
        let Params(p) = extract(
            Some("application/x-www-form-urlencoded"),
            "first_name=Ann&last_name=Lee+Smith&active=1",
        )
        .await
        .unwrap();
        assert_eq!(p.get("last_name"), Some(&json!("Lee Smith")));
        assert_eq!(p.get("active"), Some(&json!("1")));
    }

    #[tokio::test]
    async fn empty_body_has_no_fields() {
        let Params(p) = extract(None, "").await.unwrap();
        assert!(p.is_empty());
    }

    #[tokio::test]
    async fn non_object_json_is_a_bad_request() {
        assert!(matches!(
            extract(Some("application/json"), "[1,2]").await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            extract(Some("application/json"), "{nope").await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn ids_parse_or_are_not_found() {
        assert_eq!(parse_id("child", "42").unwrap(), 42);
        assert!(matches!(parse_id("child", "abc"), Err(AppError::NotFound(_))));
    }
}
