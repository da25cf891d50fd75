use std::sync::Arc;

use axum::{
    extract::{OriginalUri, State},
    http::Method,
    routing::{get, on},
    Extension, Router,
};
use model::{school::SchoolInfo, WithId};
use navigation::database::Database;

use crate::{
    common::{request_failed, route_not_found, schema, HateoasResult, METHOD_FILTER_ALL},
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/school{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes<D>(state: WebState<D>) -> Router
where
    D: Database,
{
    Router::new()
        .route("/schema", get(schema::<SchoolInfo>))
        .route("/", get(get_school_info::<D>))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn get_school_info<D>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client, .. }): State<WebState<D>>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<WithId<SchoolInfo>>
where
    D: Database,
{
    client
        .get_school_info()
        .await
        .map(|info| {
            hateoas::Response::builder(info, base_url)
                .link("self", resource!("/"))
                .link("staff", crate::api::v1::resource!("/staff/"))
                .link("facilities", crate::api::v1::resource!("/facilities/"))
                .build()
                .json()
        })
        .map_err(|why| request_failed(why, &Method::GET, original_uri.path()))
}
