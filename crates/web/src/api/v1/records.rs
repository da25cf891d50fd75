//! Read access to the plain directory tables (staff, facilities). Records
//! are served below the name of their table.

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    http::Method,
    routing::{get, on},
    Extension, Router,
};
use model::{ExampleData, Table, WithId};
use navigation::{client::Editable, database::{Database, Repo}};
use schemars::JsonSchema;
use serde::Serialize;
use utility::{id::Id, let_also::LetAlso};

use crate::{
    common::{
        request_failed, route_not_found, schema, HateoasResult, VecResponse,
        METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

/// A table the api exposes generically.
pub(crate) trait Record: Editable + ExampleData + JsonSchema + Serialize {}

impl<T> Record for T where T: Editable + ExampleData + JsonSchema + Serialize {}

pub(crate) fn routes<D, T>(state: WebState<D>) -> Router
where
    D: Database + Repo<T>,
    T: Record,
{
    Router::new()
        .route("/schema", get(schema::<T>))
        .route("/:id", get(get_record::<D, T>))
        .route("/", get(get_records::<D, T>))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn get_records<D, T>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client, .. }): State<WebState<D>>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<WithId<T>>>>
where
    D: Database + Repo<T>,
    T: Record,
{
    client
        .list::<T>()
        .await
        .map(|records| {
            records
                .into_iter()
                .map(|record| record_hateoas(record, base_url.clone()))
                .collect::<Vec<_>>()
                .let_owned(|data| VecResponse::new(data).hateoas().json())
        })
        .map_err(|why| request_failed(why, &Method::GET, original_uri.path()))
}

async fn get_record<D, T>(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<i64>,
    State(WebState { client, .. }): State<WebState<D>>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<WithId<T>>
where
    D: Database + Repo<T>,
    T: Record,
{
    client
        .get::<T>(Id::new(id))
        .await
        .map(|record| record_hateoas(record, base_url).json())
        .map_err(|why| request_failed(why, &Method::GET, original_uri.path()))
}

pub(crate) fn record_hateoas<T>(record: WithId<T>, base_url: Arc<BaseUrl>) -> hateoas::Response<WithId<T>>
where
    T: Table,
{
    let id = record.id.raw();
    hateoas::Response::builder(record, base_url)
        .link("self", crate::api::v1::resource!("/{}/{}", T::TABLE, id))
        .build()
}
