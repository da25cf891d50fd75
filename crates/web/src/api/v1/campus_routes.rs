use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    http::Method,
    routing::{get, on},
    Extension, Router,
};
use model::{route::Route, WithId};
use navigation::database::Database;
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

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/routes{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes<D>(state: WebState<D>) -> Router
where
    D: Database,
{
    Router::new()
        .route("/schema", get(schema::<Route>))
        .route("/:id", get(get_route::<D>))
        .route("/", get(get_routes::<D>))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn get_routes<D>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client, .. }): State<WebState<D>>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<WithId<Route>>>>
where
    D: Database,
{
    client
        .get_routes()
        .await
        .map(|routes| {
            routes
                .into_iter()
                .map(|route| route_hateoas(route, base_url.clone()))
                .collect::<Vec<_>>()
                .let_owned(|data| VecResponse::new(data).hateoas().json())
        })
        .map_err(|why| request_failed(why, &Method::GET, original_uri.path()))
}

async fn get_route<D>(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<i64>,
    State(WebState { client, .. }): State<WebState<D>>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<WithId<Route>>
where
    D: Database,
{
    client
        .get_route(Id::new(id))
        .await
        .map(|route| route_hateoas(route, base_url).json())
        .map_err(|why| request_failed(why, &Method::GET, original_uri.path()))
}

pub(crate) fn route_hateoas(
    route: WithId<Route>,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<WithId<Route>> {
    let id = route.id.raw();
    hateoas::Response::builder(route, base_url)
        .link("self", resource!("/{}", id))
        .build()
}
