#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use navigation::memory::{Fixture, MemoryDatabase};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use web::{app, config::ServerConfig, WebState};

pub const ADMIN_PASSWORD: &str = "letmein";

/// The application wired to an in-memory store, with static files and
/// uploads in a temporary directory.
pub struct TestApp {
    pub router: Router,
    pub database: MemoryDatabase,
    pub dir: TempDir,
}

pub fn fixture() -> Fixture {
    serde_json::from_value(json!({
        "schoolInfo": {
            "name": "Riverside High School",
            "about": "On the east bank.",
            "slideshow": [{ "img": "/uploads/slides/front.jpg", "caption": "Entrance" }]
        },
        "locations": [
            { "name": "Main Office" },
            { "name": "Library" },
            { "name": "Gym" },
            { "name": "Room 101", "isClassroom": true },
            { "name": "Room 102", "isClassroom": true }
        ],
        "routes": [
            {
                "startLocation": "Main Office",
                "endLocation": "Library",
                "steps": [
                    { "text": "Turn left into the hallway.", "map": "/uploads/route-maps/a.png" },
                    { "text": "The library is on your right." }
                ]
            },
            {
                "startLocation": "Main Office",
                "endLocation": "Room 101",
                "steps": [{ "text": "Up the stairs." }]
            },
            {
                "startLocation": "Gym",
                "endLocation": "Library",
                "steps": [{ "text": "Cross the courtyard." }]
            }
        ],
        "staff": [
            { "name": "Dana Whitfield", "title": "Teacher", "department": "Science", "room": "B12" }
        ],
        "facilities": [{ "name": "Pool", "description": "25m, six lanes" }]
    }))
    .unwrap()
}

pub fn test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let static_dir = dir.path().join("www");
    std::fs::create_dir_all(&static_dir).unwrap();
    std::fs::write(static_dir.join("index.html"), "<html>campus</html>").unwrap();

    let config = ServerConfig {
        address: "127.0.0.1:0".parse().unwrap(),
        admin_password: ADMIN_PASSWORD.to_owned(),
        static_dir,
        upload_dir: dir.path().join("uploads"),
        public_upload_prefix: "/uploads".to_owned(),
    };

    let database = MemoryDatabase::from_fixture(fixture());
    let router = app(WebState::new(database.clone(), &config), &config);
    TestApp {
        router,
        database,
        dir,
    }
}

pub async fn send(app: &TestApp, request: Request<Body>) -> Response {
    app.router.clone().oneshot(request).await.unwrap()
}

fn request(method: Method, uri: &str, cookie: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match cookie {
        Some(cookie) => builder.header(header::COOKIE, cookie),
        None => builder,
    }
}

pub async fn get(app: &TestApp, uri: &str) -> Response {
    send(app, request(Method::GET, uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: &TestApp, uri: &str, cookie: &str) -> Response {
    send(app, request(Method::GET, uri, Some(cookie)).body(Body::empty()).unwrap()).await
}

pub async fn send_json(
    app: &TestApp,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Value,
) -> Response {
    let request = request(method, uri, cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn send_bytes(app: &TestApp, uri: &str, cookie: &str, bytes: Vec<u8>) -> Response {
    let request = request(Method::POST, uri, Some(cookie))
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .body(Body::from(bytes))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Logs in and returns the `name=value` pair to send back as cookie.
pub async fn login(app: &TestApp) -> String {
    let response = send_json(
        app,
        Method::POST,
        "/api/v1/admin/login",
        None,
        json!({ "password": ADMIN_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_owned()
}

pub fn names(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect()
}

/// Id of the stored route between the two named locations.
pub async fn route_id(app: &TestApp, start: &str, end: &str) -> i64 {
    let routes = body_json(get(app, "/api/v1/routes/").await).await;
    routes["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|route| route["startLocation"] == start && route["endLocation"] == end)
        .unwrap()["id"]
        .as_i64()
        .unwrap()
}
