use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::Method,
    routing::{get, on},
    Extension, Json, Router,
};
use model::{location::Location, WithId};
use navigation::{database::Database, search::LocationPicker, search::PickerResults};
use serde::Deserialize;
use utility::let_also::LetAlso;

use crate::{
    api::v1::navigate,
    common::{
        request_failed, route_not_found, schema, HateoasResult, RouteResult, VecResponse,
        METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/locations{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes<D>(state: WebState<D>) -> Router
where
    D: Database,
{
    Router::new()
        .route("/schema", get(schema::<Location>))
        .route("/search", get(search_locations::<D>))
        .route("/:slug", get(get_location::<D>))
        .route("/", get(get_locations::<D>))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn get_locations<D>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client, .. }): State<WebState<D>>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<WithId<Location>>>>
where
    D: Database,
{
    client
        .get_locations()
        .await
        .map(|locations| {
            locations
                .into_iter()
                .map(|location| location_hateoas(location, base_url.clone()))
                .collect::<Vec<_>>()
                .let_owned(|data| VecResponse::new(data).hateoas().json())
        })
        .map_err(|why| request_failed(why, &Method::GET, original_uri.path()))
}

async fn get_location<D>(
    OriginalUri(original_uri): OriginalUri,
    Path(slug): Path<String>,
    State(WebState { client, .. }): State<WebState<D>>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<WithId<Location>>
where
    D: Database,
{
    client
        .get_location_by_slug(&slug)
        .await
        .map(|location| location_hateoas(location, base_url).json())
        .map_err(|why| request_failed(why, &Method::GET, original_uri.path()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchQuery {
    #[serde(default)]
    term: String,
    #[serde(default)]
    classrooms_open: bool,
}

/// The location picker: every location matching `term`, classrooms grouped
/// separately.
async fn search_locations<D>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client, .. }): State<WebState<D>>,
    Query(params): Query<SearchQuery>,
) -> RouteResult<Json<PickerResults>>
where
    D: Database,
{
    let locations = client
        .get_locations()
        .await
        .map_err(|why| request_failed(why, &Method::GET, original_uri.path()))?;

    let mut picker = LocationPicker::new(locations);
    if params.classrooms_open {
        picker.toggle_classrooms();
    }
    picker.search(params.term);
    Ok(Json(picker.results()))
}

pub(crate) fn location_hateoas(
    location: WithId<Location>,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<WithId<Location>> {
    let slug = location.content.slug.clone();
    hateoas::Response::builder(location, base_url)
        .link("self", resource!("/{}", slug))
        .link("navigate", navigate::resource!("/{}", slug))
        .deep_link(&slug)
        .build()
}
