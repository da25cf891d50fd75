mod common;

use axum::http::{Method, StatusCode};
use common::{
    body_bytes, body_json, get, get_auth, login, names, route_id, send_bytes, send_json, test_app,
};
use serde_json::json;

// - Public read side -

#[tokio::test]
async fn ping_answers() {
    let app = test_app();
    let response = get(&app, "/api/ping").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "pong!");
}

#[tokio::test]
async fn navigation_walks_from_start_to_route() {
    let app = test_app();

    let starts = body_json(get(&app, "/api/v1/navigate/").await).await;
    assert_eq!(names(&starts["data"]), vec!["Gym", "Main Office"]);

    let response = get(&app, "/api/v1/navigate/main-office").await;
    assert_eq!(response.status(), StatusCode::OK);
    let destinations = body_json(response).await;
    assert_eq!(destinations["start"]["name"], "Main Office");
    assert_eq!(names(&destinations["destinations"]), vec!["Library", "Room 101"]);

    let response = get(&app, "/api/v1/navigate/main-office/library").await;
    assert_eq!(response.status(), StatusCode::OK);
    let route = body_json(response).await;
    assert_eq!(route["startLocation"], "Main Office");
    assert_eq!(route["endLocation"], "Library");
    assert_eq!(route["steps"][0]["label"], "Step 1 of 2");
    assert_eq!(route["steps"][0]["map"], "/uploads/route-maps/a.png");
    assert_eq!(route["steps"][1]["label"], "Step 2 of 2");
    assert!(route["steps"][1].get("map").is_none());
}

#[tokio::test]
async fn missing_routes_and_locations_are_not_found() {
    let app = test_app();

    let response = get(&app, "/api/v1/navigate/gym/room-101").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Route not found for this destination.");
    assert_eq!(body["httpMethod"], "GET");
    assert_eq!(body["requestedUri"], "/api/v1/navigate/gym/room-101");

    let response = get(&app, "/api/v1/navigate/nowhere").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["message"],
        "There is no location called 'nowhere'."
    );

    assert_eq!(
        get(&app, "/api/v1/does-not-exist").await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn locations_link_to_their_deep_link() {
    let app = test_app();
    let response = get(&app, "/api/v1/locations/library").await;
    assert_eq!(response.status(), StatusCode::OK);
    let location = body_json(response).await;
    assert_eq!(location["name"], "Library");
    assert_eq!(location["isClassroom"], false);
    let deep_link = location["links"]
        .as_array()
        .unwrap()
        .iter()
        .find(|link| link["rel"] == "deepLink")
        .unwrap();
    assert_eq!(deep_link["href"], "http://localhost/navigate/library");
}

#[tokio::test]
async fn search_opens_classrooms_when_only_they_match() {
    let app = test_app();

    let results = body_json(get(&app, "/api/v1/locations/search?term=room").await).await;
    assert_eq!(results["kind"], "matches");
    assert_eq!(results["classroomsOpen"], true);
    assert!(results["others"].as_array().unwrap().is_empty());
    assert_eq!(names(&results["classrooms"]), vec!["Room 101", "Room 102"]);

    let results = body_json(get(&app, "/api/v1/locations/search").await).await;
    assert_eq!(results["classroomsOpen"], false);
    assert_eq!(names(&results["others"]), vec!["Gym", "Library", "Main Office"]);

    let results = body_json(get(&app, "/api/v1/locations/search?term=zzz").await).await;
    assert_eq!(results, json!({ "kind": "noMatches", "term": "zzz" }));
}

#[tokio::test]
async fn school_staff_and_facilities_are_public() {
    let app = test_app();

    let school = body_json(get(&app, "/api/v1/school/").await).await;
    assert_eq!(school["name"], "Riverside High School");
    assert_eq!(school["slideshow"][0]["caption"], "Entrance");

    let staff = body_json(get(&app, "/api/v1/staff/").await).await;
    assert_eq!(names(&staff["data"]), vec!["Dana Whitfield"]);

    let facilities = body_json(get(&app, "/api/v1/facilities/").await).await;
    assert_eq!(facilities["data"][0]["description"], "25m, six lanes");
}

#[tokio::test]
async fn deep_links_serve_the_front_end() {
    let app = test_app();
    let response = get(&app, "/navigate/library").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await.as_ref(), b"<html>campus</html>");
}

// - Admin -

#[tokio::test]
async fn writes_need_an_admin_session() {
    let app = test_app();

    let response = send_json(
        &app,
        Method::POST,
        "/api/v1/admin/routes",
        None,
        json!({ "startLocation": "Gym", "endLocation": "Room 101", "steps": [{ "text": "Go" }] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.database.write_count(), 0);

    let response = send_json(
        &app,
        Method::POST,
        "/api/v1/admin/login",
        None,
        json!({ "password": "guess" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Incorrect password.");
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = test_app();
    let cookie = login(&app).await;
    assert_eq!(
        get_auth(&app, "/api/v1/admin/session", &cookie).await.status(),
        StatusCode::OK
    );

    let response = send_json(&app, Method::POST, "/api/v1/admin/logout", Some(&cookie), json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        get_auth(&app, "/api/v1/admin/session", &cookie).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn created_routes_can_be_navigated() {
    let app = test_app();
    let cookie = login(&app).await;

    let response = send_json(
        &app,
        Method::POST,
        "/api/v1/admin/routes",
        Some(&cookie),
        json!({
            "startLocation": "Gym",
            "endLocation": "Room 101",
            "steps": [{ "text": "Through the double doors." }]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let route = body_json(get(&app, "/api/v1/navigate/gym/room-101").await).await;
    assert_eq!(route["steps"][0]["text"], "Through the double doors.");
}

#[tokio::test]
async fn invalid_routes_are_not_written() {
    let app = test_app();
    let cookie = login(&app).await;

    let response = send_json(
        &app,
        Method::POST,
        "/api/v1/admin/routes",
        Some(&cookie),
        json!({ "startLocation": "Gym", "endLocation": "Gym", "steps": [{ "text": "Stay." }] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Start and end locations cannot be the same."
    );

    let response = send_json(
        &app,
        Method::POST,
        "/api/v1/admin/routes",
        Some(&cookie),
        json!({ "startLocation": "Gym", "endLocation": "Pool", "steps": [{ "text": " " }] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Please add instructions to step 1."
    );
    assert_eq!(app.database.write_count(), 0);
}

#[tokio::test]
async fn editing_a_route_replaces_its_steps() {
    let app = test_app();
    let cookie = login(&app).await;
    let id = route_id(&app, "Gym", "Library").await;

    let response = send_json(
        &app,
        Method::PUT,
        &format!("/api/v1/admin/routes/{}", id),
        Some(&cookie),
        json!({
            "startLocation": "Gym",
            "endLocation": "Library",
            "steps": [{ "text": "Take the covered walkway." }, { "text": "Second door." }]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["id"], id);

    let route = body_json(get(&app, "/api/v1/navigate/gym/library").await).await;
    assert_eq!(route["steps"][1]["label"], "Step 2 of 2");

    let response = send_json(
        &app,
        Method::PUT,
        "/api/v1/admin/routes/9999",
        Some(&cookie),
        json!({ "startLocation": "Gym", "endLocation": "Library", "steps": [{ "text": "x" }] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicating_returns_an_unsaved_draft() {
    let app = test_app();
    let cookie = login(&app).await;
    let id = route_id(&app, "Main Office", "Library").await;
    let writes = app.database.write_count();

    let response = send_json(
        &app,
        Method::POST,
        &format!("/api/v1/admin/routes/{}/duplicate", id),
        Some(&cookie),
        json!({ "startLocation": "Gym" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let draft = body_json(response).await;
    assert_eq!(draft["id"], json!(null));
    assert_eq!(draft["startLocation"], "Gym");
    assert_eq!(draft["endLocation"], "Library");
    assert_eq!(draft["steps"][0]["text"], "Turn left into the hallway.");
    assert_eq!(app.database.write_count(), writes);

    let response = send_json(
        &app,
        Method::POST,
        &format!("/api/v1/admin/routes/{}/duplicate", id),
        Some(&cookie),
        json!({ "endLocation": "Main Office" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleted_routes_disappear() {
    let app = test_app();
    let cookie = login(&app).await;
    let id = route_id(&app, "Main Office", "Room 101").await;

    let response = send_json(
        &app,
        Method::DELETE,
        &format!("/api/v1/admin/routes/{}", id),
        Some(&cookie),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        get(&app, "/api/v1/navigate/main-office/room-101").await.status(),
        StatusCode::NOT_FOUND
    );

    let destinations = body_json(get(&app, "/api/v1/navigate/main-office").await).await;
    assert_eq!(names(&destinations["destinations"]), vec!["Library"]);
}

#[tokio::test]
async fn location_slugs_survive_a_rename() {
    let app = test_app();
    let cookie = login(&app).await;

    let response = send_json(
        &app,
        Method::POST,
        "/api/v1/admin/locations",
        Some(&cookie),
        json!({ "name": "Science Lab", "isClassroom": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = body_json(response).await;
    assert_eq!(location["slug"], "science-lab");

    let response = send_json(
        &app,
        Method::PUT,
        &format!("/api/v1/admin/locations/{}", location["id"]),
        Some(&cookie),
        json!({ "name": "Chemistry Lab", "isClassroom": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let renamed = body_json(get(&app, "/api/v1/locations/science-lab").await).await;
    assert_eq!(renamed["name"], "Chemistry Lab");

    let response = send_json(
        &app,
        Method::POST,
        "/api/v1/admin/locations",
        Some(&cookie),
        json!({ "name": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Please fill in the Location Name."
    );
}

#[tokio::test]
async fn location_names_cannot_be_taken_twice() {
    let app = test_app();
    let cookie = login(&app).await;

    let response = send_json(
        &app,
        Method::POST,
        "/api/v1/admin/locations",
        Some(&cookie),
        json!({ "name": "Gym" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "A location called 'Gym' already exists."
    );

    let library = body_json(get(&app, "/api/v1/locations/library").await).await;
    let response = send_json(
        &app,
        Method::PUT,
        &format!("/api/v1/admin/locations/{}", library["id"]),
        Some(&cookie),
        json!({ "name": "Gym" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let gyms = body_json(get(&app, "/api/v1/locations/search?term=gym").await).await;
    assert_eq!(names(&gyms["others"]), vec!["Gym"]);
    assert_eq!(app.database.write_count(), 0);
}

#[tokio::test]
async fn rejected_writes_are_forbidden() {
    let app = test_app();
    let cookie = login(&app).await;
    app.database.deny_writes("staff");

    let response = send_json(
        &app,
        Method::POST,
        "/api/v1/admin/staff",
        Some(&cookie),
        json!({ "name": "Sam", "title": "Coach", "department": "Sports", "room": "Gym" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("'staff' table for the 'INSERT' action"));
    assert!(body["detailedInformation"]
        .as_str()
        .unwrap()
        .contains("permission denied for table staff"));

    let staff = body_json(get(&app, "/api/v1/staff/").await).await;
    assert_eq!(names(&staff["data"]), vec!["Dana Whitfield"]);
}

#[tokio::test]
async fn school_info_can_be_edited() {
    let app = test_app();
    let cookie = login(&app).await;

    let response = send_json(
        &app,
        Method::PUT,
        "/api/v1/admin/school",
        Some(&cookie),
        json!({ "name": "Riverside High School", "about": "Founded 1962.", "slideshow": [] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let school = body_json(get(&app, "/api/v1/school/").await).await;
    assert_eq!(school["about"], "Founded 1962.");
    assert_eq!(school["slideshow"], json!([]));
}

#[tokio::test]
async fn uploaded_maps_are_served() {
    let app = test_app();
    let cookie = login(&app).await;

    let response = send_bytes(
        &app,
        "/api/v1/admin/uploads/route-maps?start=Gym&end=Main%20Office&fileName=floor%20plan.png",
        &cookie,
        vec![0x89, 0x50, 0x4e, 0x47],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let url = body_json(response).await["url"]
        .as_str()
        .unwrap()
        .to_owned();
    assert!(url.starts_with("/uploads/route-maps/gym-to-main-office/"));
    assert!(url.ends_with("-floor_plan.png"));

    let response = get(&app, &url).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await.as_ref(), &[0x89, 0x50, 0x4e, 0x47]);

    let response = send_bytes(
        &app,
        "/api/v1/admin/uploads/route-maps?fileName=empty.png",
        &cookie,
        vec![],
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
