use std::sync::Arc;

use axum::{
    routing::{get, on},
    Extension, Json, Router,
};
use model::{facility::Facility, staff::Staff};
use navigation::database::Database;
use serde::Serialize;

use crate::{
    common::{route_not_found, METHOD_FILTER_ALL},
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

mod admin;
mod campus_routes;
mod locations;
mod navigate;
mod records;
mod school;

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::resource!("/v1{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes<D>(state: WebState<D>) -> Router
where
    D: Database,
{
    Router::new()
        .route("/", get(index))
        .nest_service("/locations", locations::routes(state.clone()))
        .nest_service("/navigate", navigate::routes(state.clone()))
        .nest_service("/routes", campus_routes::routes(state.clone()))
        .nest_service("/school", school::routes(state.clone()))
        .nest_service("/staff", records::routes::<D, Staff>(state.clone()))
        .nest_service("/facilities", records::routes::<D, Facility>(state.clone()))
        .nest_service("/admin", admin::routes(state.clone()))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Serialize)]
struct ApiIndex {
    version: &'static str,
}

async fn index(Extension(base_url): Extension<Arc<BaseUrl>>) -> Json<hateoas::Response<ApiIndex>> {
    hateoas::Response::builder(ApiIndex { version: "v1" }, base_url)
        .link("self", resource!("/"))
        .link("locations", locations::resource!("/"))
        .link("navigate", navigate::resource!("/"))
        .link("routes", campus_routes::resource!("/"))
        .link("school", school::resource!("/"))
        .link("staff", resource!("/staff/"))
        .link("facilities", resource!("/facilities/"))
        .build()
        .json()
}
