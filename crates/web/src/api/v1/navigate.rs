use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    http::Method,
    routing::{get, on},
    Extension, Router,
};
use model::{location::Location, route::Route, WithId};
use navigation::{
    database::Database, lookup::Campus, playback::step_label, NotFoundError, RequestResult,
};
use schemars::JsonSchema;
use serde::Serialize;
use utility::{id::Id, let_also::LetAlso};

use crate::{
    api::v1::{campus_routes, locations::location_hateoas},
    common::{
        request_failed, route_not_found, HateoasResult, VecResponse, METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/navigate{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes<D>(state: WebState<D>) -> Router
where
    D: Database,
{
    Router::new()
        .route("/:start/:destination", get(get_route::<D>))
        .route("/:start", get(get_destinations::<D>))
        .route("/", get(get_start_locations::<D>))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DestinationsDto {
    start: hateoas::Response<WithId<Location>>,
    destinations: Vec<hateoas::Response<WithId<Location>>>,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StepDto {
    label: String,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    map: Option<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RouteDto {
    id: Id<Route>,
    start_location: String,
    end_location: String,
    steps: Vec<StepDto>,
}

impl From<&WithId<Route>> for RouteDto {
    fn from(route: &WithId<Route>) -> Self {
        let count = route.content.steps.len();
        Self {
            id: route.id,
            start_location: route.content.start_location.clone(),
            end_location: route.content.end_location.clone(),
            steps: route
                .content
                .steps
                .iter()
                .enumerate()
                .map(|(index, step)| StepDto {
                    label: step_label(index, count),
                    text: step.text.clone(),
                    map: step.map_url().map(str::to_owned),
                })
                .collect(),
        }
    }
}

/// Locations at least one route starts from.
async fn get_start_locations<D>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client, .. }): State<WebState<D>>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<WithId<Location>>>>
where
    D: Database,
{
    let campus = client
        .load_campus()
        .await
        .map_err(|why| request_failed(why, &Method::GET, original_uri.path()))?;

    campus
        .start_locations()
        .into_iter()
        .map(|location| location_hateoas(location.clone(), base_url.clone()))
        .collect::<Vec<_>>()
        .let_owned(|data| Ok(VecResponse::new(data).hateoas().json()))
}

/// The landing point of a scanned QR code: the start location and where
/// one can go from there.
async fn get_destinations<D>(
    OriginalUri(original_uri): OriginalUri,
    Path(start): Path<String>,
    State(WebState { client, .. }): State<WebState<D>>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<DestinationsDto>
where
    D: Database,
{
    let campus = client
        .load_campus()
        .await
        .map_err(|why| request_failed(why, &Method::GET, original_uri.path()))?;
    let start = campus
        .resolve_deep_link(&format!("/navigate/{}", start))
        .ok_or(NotFoundError::Location { slug: start })
        .map_err(|why| request_failed(why, &Method::GET, original_uri.path()))?;

    let destinations = campus
        .destinations_from(&start.content.name)
        .into_iter()
        .map(|destination| {
            hateoas::Response::builder(destination.clone(), base_url.clone())
                .link(
                    "route",
                    resource!("/{}/{}", start.content.slug, destination.content.slug),
                )
                .build()
        })
        .collect();

    hateoas::Response::builder(
        DestinationsDto {
            start: location_hateoas(start.clone(), base_url.clone()),
            destinations,
        },
        base_url,
    )
    .link("self", resource!("/{}", start.content.slug))
    .build()
    .let_owned(|response| Ok(response.json()))
}

async fn get_route<D>(
    OriginalUri(original_uri): OriginalUri,
    Path((start, destination)): Path<(String, String)>,
    State(WebState { client, .. }): State<WebState<D>>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<RouteDto>
where
    D: Database,
{
    let campus = client
        .load_campus()
        .await
        .map_err(|why| request_failed(why, &Method::GET, original_uri.path()))?;

    resolve(&campus, &start, &destination)
        .map(|route| {
            hateoas::Response::builder(RouteDto::from(route), base_url)
                .link("self", resource!("/{}/{}", start, destination))
                .link("route", campus_routes::resource!("/{}", route.id.raw()))
                .link("start", resource!("/{}", start))
                .build()
                .json()
        })
        .map_err(|why| request_failed(why, &Method::GET, original_uri.path()))
}

fn resolve<'a>(campus: &'a Campus, start: &str, destination: &str) -> RequestResult<&'a WithId<Route>> {
    let start = campus.location_by_slug(start)?;
    let destination = campus.location_by_slug(destination)?;
    Ok(campus.resolve_route(&start.content.name, &destination.content.name)?)
}
