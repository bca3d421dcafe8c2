use crate::service::comics::ComicMetadataUpdate;
use crate::service::explanation::ExplanationRequest;
use crate::service::users::{
    AuthenticateUserRequest, RegisterUserRequest, UpdatePreferencesRequest,
};
use axum::{
    body::Bytes,
    extract::{FromRequest, Query, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// Request types that can also be sent in query-parameter form.
pub trait QueryForm: DeserializeOwned {
    /// Field that receives the whole body when the scalars come from the query
    /// string. `None` merges an object body with the query fields instead.
    const BODY_FIELD: Option<&'static str> = None;
}

impl QueryForm for AuthenticateUserRequest {}
impl QueryForm for ComicMetadataUpdate {}
impl QueryForm for ExplanationRequest {}

impl QueryForm for RegisterUserRequest {
    const BODY_FIELD: Option<&'static str> = Some("preferences");
}

impl QueryForm for UpdatePreferencesRequest {
    const BODY_FIELD: Option<&'static str> = Some("preferredTags");
}

/// Request payload read from a JSON body, from query parameters, or from both.
///
/// - Empty query string: the body is the whole request (`{}` when absent).
/// - Query parameters present: they provide the scalar fields, and the body
///   (if any) fills [`QueryForm::BODY_FIELD`] or is merged field by field.
///
/// Query values are strings; boolean fields accept them through
/// `utils::serde_bool`.
pub(crate) struct ApiPayload<T>(pub(crate) T);

impl<S, T> FromRequest<S> for ApiPayload<T>
where
    S: Send + Sync,
    T: QueryForm,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<HashMap<String, String>>::try_from_uri(req.uri())
            .map_err(IntoResponse::into_response)?;
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let body = if bytes.is_empty() {
            None
        } else {
            Some(serde_json::from_slice::<Value>(&bytes).map_err(|e| {
                (
                    StatusCode::BAD_REQUEST,
                    format!("Failed to parse the request body as JSON: {e}"),
                )
                    .into_response()
            })?)
        };

        let value = if query.is_empty() {
            body.unwrap_or_else(|| Value::Object(Map::new()))
        } else {
            debug!(params = query.len(), "Request fields read from query string");
            merge_query(query, body, T::BODY_FIELD)
        };

        serde_json::from_value(value).map(ApiPayload).map_err(|e| {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Failed to deserialize the request: {e}"),
            )
                .into_response()
        })
    }
}

fn merge_query(
    query: HashMap<String, String>,
    body: Option<Value>,
    body_field: Option<&'static str>,
) -> Value {
    let mut fields: Map<String, Value> = query
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();

    match (body, body_field) {
        (None, _) => {}
        (Some(body), Some(field)) => {
            fields.insert(field.to_string(), body);
        }
        (Some(Value::Object(body)), None) => {
            for (k, v) in body {
                fields.entry(k).or_insert(v);
            }
        }
        // A non-object body has nowhere to go; deserialization reports what is missing.
        (Some(_), None) => {}
    }

    Value::Object(fields)
}
