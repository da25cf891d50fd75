use axum::{
    extract::{OriginalUri, Query, Request},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::MethodFilter,
    Json,
};
use model::ExampleData;
use navigation::{
    database::DatabaseError, storage::UploadError, PersistenceError, RequestError,
};
use schemars::{schema_for, schema_for_value, JsonSchema};
use serde::{Deserialize, Serialize};

use crate::hateoas;

pub type RouteResult<O> = Result<O, RouteErrorResponse>;
pub type HateoasResult<O> = RouteResult<Json<hateoas::Response<O>>>;

/// A `MethodFilter` that matches all http methods.
pub(crate) const METHOD_FILTER_ALL: MethodFilter = MethodFilter::GET
    .or(MethodFilter::POST)
    .or(MethodFilter::PATCH)
    .or(MethodFilter::PUT)
    .or(MethodFilter::DELETE);

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VecResponse<T> {
    pub data: Vec<T>,
}

impl<T> VecResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }

    pub fn hateoas(self) -> hateoas::Response<Self> {
        hateoas::Response::new(self)
    }
}

// - Services returning commonly used responses -

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SchemaParams {
    #[serde(default = "Default::default")]
    example_data: bool,
}

pub(crate) async fn schema<T: ExampleData + JsonSchema + Serialize>(
    Query(params): Query<SchemaParams>,
) -> impl IntoResponse {
    if params.example_data {
        Json(schema_for_value!(T::example_data()))
    } else {
        Json(schema_for!(T))
    }
}

pub(crate) async fn route_not_found(
    OriginalUri(original_uri): OriginalUri,
    req: Request,
) -> impl IntoResponse {
    RouteErrorResponse::not_found(req.method(), original_uri.path())
}

/// Turns a failed request into its error response, noting what was asked.
pub(crate) fn request_failed<E>(why: E, method: &Method, uri: &str) -> RouteErrorResponse
where
    E: Into<RequestError>,
{
    RouteErrorResponse::from(why.into())
        .with_method(method)
        .with_uri(uri)
}

// - Commonly used responses -

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteErrorResponse {
    #[serde(skip)]
    pub status_code: StatusCode,
    pub http_method: Option<String>,
    pub requested_uri: Option<String>,
    pub message: Option<String>,
    pub detailed_information: Option<String>,
}

impl RouteErrorResponse {
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            http_method: None,
            requested_uri: None,
            message: None,
            detailed_information: None,
        }
    }

    pub fn not_found(method: &Method, uri: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND)
            .with_method(method)
            .with_uri(uri)
            .with_default_message()
    }

    pub fn with_method(mut self, method: &Method) -> Self {
        self.http_method = Some(method.to_string());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.requested_uri = Some(uri.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_default_message(self) -> Self {
        let message = self
            .status_code
            .canonical_reason()
            .unwrap_or("Something went wrong.");
        self.with_message(message)
    }

    pub fn with_detailed_information(mut self, message: impl Into<String>) -> Self {
        self.detailed_information = Some(message.into());
        self
    }
}

impl From<RequestError> for RouteErrorResponse {
    fn from(value: RequestError) -> Self {
        let status_code = match &value {
            RequestError::Validation(_) => StatusCode::BAD_REQUEST,
            RequestError::NotFound(_) => StatusCode::NOT_FOUND,
            RequestError::Unauthorized => StatusCode::UNAUTHORIZED,
            RequestError::Persistence(PersistenceError {
                source: DatabaseError::Rejected(_),
                ..
            }) => StatusCode::FORBIDDEN,
            RequestError::Persistence(PersistenceError {
                source: DatabaseError::Conflict(_),
                ..
            }) => StatusCode::CONFLICT,
            RequestError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RequestError::Upload(UploadError::Io(_)) => StatusCode::BAD_GATEWAY,
            RequestError::Upload(_) => StatusCode::BAD_REQUEST,
            RequestError::CapabilityUnavailable(_) => StatusCode::NOT_IMPLEMENTED,
            RequestError::Database(DatabaseError::NotFound) => StatusCode::NOT_FOUND,
            RequestError::Database(DatabaseError::Conflict(_)) => StatusCode::CONFLICT,
            RequestError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let response = Self::new(status_code).with_message(value.to_string());
        match value {
            RequestError::Persistence(error) => {
                response.with_detailed_information(error.source.to_string())
            }
            _ => response,
        }
    }
}

impl IntoResponse for RouteErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (self.status_code, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use navigation::{NotFoundError, Operation, ValidationError};

    use super::*;

    #[test]
    fn rejected_writes_are_forbidden() {
        let response = RouteErrorResponse::from(RequestError::from(PersistenceError::new(
            "routes",
            Operation::Update,
            DatabaseError::Rejected("permission denied for table routes".to_owned()),
        )));
        assert_eq!(response.status_code, StatusCode::FORBIDDEN);
        assert!(response
            .message
            .unwrap()
            .contains("'routes' table for the 'UPDATE' action"));
        assert_eq!(
            response.detailed_information.as_deref(),
            Some("the backend rejected the operation: permission denied for table routes")
        );
    }

    #[test]
    fn statuses_follow_the_error_kind() {
        let cases = [
            (
                RequestError::from(ValidationError::SameEndpoints),
                StatusCode::BAD_REQUEST,
            ),
            (
                RequestError::from(NotFoundError::Route {
                    start: "A".to_owned(),
                    end: "C".to_owned(),
                }),
                StatusCode::NOT_FOUND,
            ),
            (RequestError::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                RequestError::from(ValidationError::DuplicateName {
                    name: "Gym".to_owned(),
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                RequestError::from(PersistenceError::new(
                    "staff",
                    Operation::Insert,
                    DatabaseError::Conflict("duplicate key".to_owned()),
                )),
                StatusCode::CONFLICT,
            ),
            (
                RequestError::from(UploadError::Empty),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(RouteErrorResponse::from(error).status_code, status);
        }
    }
}
