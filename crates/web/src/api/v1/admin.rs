//! Everything that writes: login, route authoring, the list editors, school
//! info and image uploads. Every handler but `login` requires an admin
//! session.

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, OriginalUri, Path, Query, State},
    http::{Method, StatusCode},
    routing::{get, on, post, put},
    Json, Router,
};
use chrono::Utc;
use model::{
    facility::Facility, location::Location, route::Route, school::SchoolInfo, staff::Staff,
    WithId,
};
use navigation::{
    author::{Endpoint, RouteDraft},
    client::Editable,
    database::{Database, Repo},
    lookup::location_names,
    storage::{route_map_path, ROUTE_MAP_BUCKET},
    RequestError,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tower_cookies::{Cookie, Cookies};
use utility::{id::Id, let_also::LetAlso};

use crate::{
    common::{request_failed, route_not_found, RouteResult, METHOD_FILTER_ALL},
    session::{session_cookie, session_token, AdminSession, SESSION_COOKIE},
    WebState,
};

/// Upper bound for a single uploaded route map.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub(crate) fn routes<D>(state: WebState<D>) -> Router
where
    D: Database,
{
    Router::new()
        .route("/login", post(login::<D>))
        .route("/logout", post(logout::<D>))
        .route("/session", get(session))
        .route("/location-names", get(get_location_names::<D>))
        .route("/routes", post(create_route::<D>))
        .route("/routes/:id", put(update_route::<D>).delete(delete_route::<D>))
        .route("/routes/:id/duplicate", post(duplicate_route::<D>))
        .route("/locations", post(create_location::<D>))
        .route(
            "/locations/:id",
            put(update_location::<D>).delete(delete_record::<D, Location>),
        )
        .route("/staff", post(create_record::<D, Staff>))
        .route(
            "/staff/:id",
            put(update_record::<D, Staff>).delete(delete_record::<D, Staff>),
        )
        .route("/facilities", post(create_record::<D, Facility>))
        .route(
            "/facilities/:id",
            put(update_record::<D, Facility>).delete(delete_record::<D, Facility>),
        )
        .route("/school", put(update_school_info::<D>))
        .route(
            "/uploads/route-maps",
            post(upload_route_map::<D>).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

// - Session -

#[derive(Debug, Deserialize)]
struct LoginRequest {
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionDto {
    admin: bool,
}

async fn login<D>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { gate, sessions, .. }): State<WebState<D>>,
    cookies: Cookies,
    Json(request): Json<LoginRequest>,
) -> RouteResult<Json<SessionDto>>
where
    D: Database,
{
    let capability = gate
        .login(&request.password)
        .map_err(|why| request_failed(why, &Method::POST, original_uri.path()))?;
    cookies.add(session_cookie(sessions.open(capability)));
    Ok(Json(SessionDto { admin: true }))
}

async fn logout<D>(
    State(WebState { sessions, .. }): State<WebState<D>>,
    cookies: Cookies,
) -> Json<SessionDto>
where
    D: Database,
{
    if let Some(token) = session_token(&cookies) {
        sessions.close(&token);
        log::info!("Admin logged out");
    }
    cookies.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build());
    Json(SessionDto { admin: false })
}

async fn session(_: AdminSession) -> Json<SessionDto> {
    Json(SessionDto { admin: true })
}

/// Names offered by the endpoint pickers of the route editor.
async fn get_location_names<D>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client, .. }): State<WebState<D>>,
    _: AdminSession,
) -> RouteResult<Json<Vec<String>>>
where
    D: Database,
{
    client
        .get_locations()
        .await
        .map(|locations| {
            location_names(&locations)
                .into_iter()
                .map(str::to_owned)
                .collect::<Vec<_>>()
                .let_owned(Json)
        })
        .map_err(|why| request_failed(why, &Method::GET, original_uri.path()))
}

// - Routes -

async fn create_route<D>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client, .. }): State<WebState<D>>,
    AdminSession(admin): AdminSession,
    Json(draft): Json<RouteDraft>,
) -> RouteResult<(StatusCode, Json<WithId<Route>>)>
where
    D: Database,
{
    let mut author = client.route_author(&admin);
    author.open(RouteDraft { id: None, ..draft });
    author
        .save()
        .await
        .map(|route| (StatusCode::CREATED, Json(route)))
        .map_err(|why| request_failed(why, &Method::POST, original_uri.path()))
}

async fn update_route<D>(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<i64>,
    State(WebState { client, .. }): State<WebState<D>>,
    AdminSession(admin): AdminSession,
    Json(draft): Json<RouteDraft>,
) -> RouteResult<Json<WithId<Route>>>
where
    D: Database,
{
    let failed = |why: RequestError| request_failed(why, &Method::PUT, original_uri.path());

    let stored = client.get_route(Id::new(id)).await.map_err(failed)?;
    let mut author = client.route_author(&admin);
    author.open(RouteDraft {
        id: Some(stored.id),
        ..draft
    });
    author.save().await.map(Json).map_err(failed)
}

async fn delete_route<D>(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<i64>,
    State(WebState { client, .. }): State<WebState<D>>,
    AdminSession(admin): AdminSession,
) -> RouteResult<StatusCode>
where
    D: Database,
{
    let failed = |why: RequestError| request_failed(why, &Method::DELETE, original_uri.path());

    let stored = client.get_route(Id::new(id)).await.map_err(failed)?;
    client
        .route_author(&admin)
        .delete(stored.id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(failed)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DuplicateRequest {
    start_location: Option<String>,
    end_location: Option<String>,
}

/// Copies a route's steps into a new draft between the chosen endpoints
/// (the source's own where none are given). The draft is returned for
/// editing and only stored once it is posted to `/routes`.
async fn duplicate_route<D>(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<i64>,
    State(WebState { client, .. }): State<WebState<D>>,
    AdminSession(admin): AdminSession,
    Json(request): Json<DuplicateRequest>,
) -> RouteResult<Json<RouteDraft>>
where
    D: Database,
{
    let source = client
        .get_route(Id::new(id))
        .await
        .map_err(|why| request_failed(why, &Method::POST, original_uri.path()))?;

    let mut author = client.route_author(&admin);
    let selection = author.start_duplicate(&source);
    if let Some(start) = request.start_location {
        selection.set_endpoint(Endpoint::Start, start);
    }
    if let Some(end) = request.end_location {
        selection.set_endpoint(Endpoint::End, end);
    }
    author
        .proceed_duplicate()
        .map(|draft| Json(draft.clone()))
        .map_err(|why| request_failed(why, &Method::POST, original_uri.path()))
}

// - List editors -

async fn create_location<D>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client, .. }): State<WebState<D>>,
    AdminSession(admin): AdminSession,
    Json(location): Json<Location>,
) -> RouteResult<(StatusCode, Json<WithId<Location>>)>
where
    D: Database,
{
    client
        .save_location(&admin, None, location)
        .await
        .map(|location| (StatusCode::CREATED, Json(location)))
        .map_err(|why| request_failed(why, &Method::POST, original_uri.path()))
}

async fn update_location<D>(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<i64>,
    State(WebState { client, .. }): State<WebState<D>>,
    AdminSession(admin): AdminSession,
    Json(location): Json<Location>,
) -> RouteResult<Json<WithId<Location>>>
where
    D: Database,
{
    client
        .save_location(&admin, Some(Id::new(id)), location)
        .await
        .map(Json)
        .map_err(|why| request_failed(why, &Method::PUT, original_uri.path()))
}

async fn create_record<D, T>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client, .. }): State<WebState<D>>,
    AdminSession(admin): AdminSession,
    Json(record): Json<T>,
) -> RouteResult<(StatusCode, Json<WithId<T>>)>
where
    D: Database + Repo<T>,
    T: Editable + Serialize + DeserializeOwned,
{
    client
        .save(&admin, None, record)
        .await
        .map(|record| (StatusCode::CREATED, Json(record)))
        .map_err(|why| request_failed(why, &Method::POST, original_uri.path()))
}

async fn update_record<D, T>(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<i64>,
    State(WebState { client, .. }): State<WebState<D>>,
    AdminSession(admin): AdminSession,
    Json(record): Json<T>,
) -> RouteResult<Json<WithId<T>>>
where
    D: Database + Repo<T>,
    T: Editable + Serialize + DeserializeOwned,
{
    client
        .save(&admin, Some(Id::new(id)), record)
        .await
        .map(Json)
        .map_err(|why| request_failed(why, &Method::PUT, original_uri.path()))
}

async fn delete_record<D, T>(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<i64>,
    State(WebState { client, .. }): State<WebState<D>>,
    AdminSession(admin): AdminSession,
) -> RouteResult<StatusCode>
where
    D: Database + Repo<T>,
    T: Editable,
{
    client
        .delete::<T>(&admin, Id::new(id))
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|why| request_failed(why, &Method::DELETE, original_uri.path()))
}

// - School info -

async fn update_school_info<D>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client, .. }): State<WebState<D>>,
    AdminSession(admin): AdminSession,
    Json(info): Json<SchoolInfo>,
) -> RouteResult<Json<WithId<SchoolInfo>>>
where
    D: Database,
{
    let failed = |why: RequestError| request_failed(why, &Method::PUT, original_uri.path());

    let stored = client.get_school_info().await.map_err(failed)?;
    client
        .update_school_info(&admin, WithId::new(stored.id, info))
        .await
        .map(Json)
        .map_err(failed)
}

// - Uploads -

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadQuery {
    #[serde(default)]
    start: String,
    #[serde(default)]
    end: String,
    file_name: String,
}

#[derive(Debug, Serialize)]
struct UploadDto {
    url: String,
}

/// Stores the request body as a route map image for the route between
/// `start` and `end` and answers its public URL.
async fn upload_route_map<D>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { images, .. }): State<WebState<D>>,
    _: AdminSession,
    Query(params): Query<UploadQuery>,
    body: Bytes,
) -> RouteResult<(StatusCode, Json<UploadDto>)>
where
    D: Database,
{
    let path = route_map_path(&params.start, &params.end, &params.file_name, Utc::now());
    images
        .upload(ROUTE_MAP_BUCKET, &path, body.to_vec())
        .await
        .map(|url| (StatusCode::CREATED, Json(UploadDto { url })))
        .map_err(|why| request_failed(why, &Method::POST, original_uri.path()))
}
