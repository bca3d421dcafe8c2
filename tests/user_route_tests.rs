mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn register_then_authenticate() {
    let (db, path) = common::spawn_db("users-auth").await;
    let app = common::build_app(db.clone(), &common::test_config(None, None));

    let register = json!({
        "email": "ada@example.com",
        "password": "correct horse battery staple",
        "preferences": { "excludeNSFW": true, "preferredTags": ["science", "science"] }
    })
    .to_string();
    let (status, body) = common::send_json(&app, Method::POST, "/user/register", Some(&register)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User registered successfully.");
    let user_id = body["userId"].as_str().expect("userId").to_string();

    let prefs = db.get_preferences(&user_id).await.unwrap().expect("prefs row");
    assert!(prefs.exclude_nsfw);
    assert_eq!(prefs.preferred_tags, vec!["science"]);

    let login = json!({ "email": "ada@example.com", "password": "correct horse battery staple" })
        .to_string();
    let (status, body) =
        common::send_json(&app, Method::POST, "/user/authenticate", Some(&login)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Authentication successful.");
    assert_eq!(body["user"]["id"], user_id.as_str());
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["role"], "SUBSCRIBER");
    let user = body["user"].as_object().expect("user object");
    assert!(!user.contains_key("hashedPassword"));
    assert!(!user.contains_key("hashed_password"));

    // The stored hash is not the plaintext.
    let stored = db.get_user_by_email("ada@example.com").await.unwrap().unwrap();
    assert_ne!(stored.hashed_password, "correct horse battery staple");
    assert!(stored.hashed_password.starts_with("$argon2"));

    common::cleanup_db(db, &path).await;
}

#[tokio::test]
async fn authentication_failures_are_distinguished() {
    let (db, path) = common::spawn_db("users-authfail").await;
    let app = common::build_app(db.clone(), &common::test_config(None, None));

    let register = json!({ "email": "grace@example.com", "password": "hopper" }).to_string();
    let (status, _) = common::send_json(&app, Method::POST, "/user/register", Some(&register)).await;
    assert_eq!(status, StatusCode::OK);

    let wrong = json!({ "email": "grace@example.com", "password": "cobol" }).to_string();
    let (status, body) = common::send_json(&app, Method::POST, "/user/authenticate", Some(&wrong)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": false, "message": "Incorrect password." }));

    let unknown = json!({ "email": "nobody@example.com", "password": "hopper" }).to_string();
    let (status, body) =
        common::send_json(&app, Method::POST, "/user/authenticate", Some(&unknown)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": false, "message": "User not found." }));

    common::cleanup_db(db, &path).await;
}

#[tokio::test]
async fn duplicate_registration_is_a_generic_server_error() {
    let (db, path) = common::spawn_db("users-dup").await;
    let app = common::build_app(db.clone(), &common::test_config(None, None));

    let register = json!({ "email": "ada@example.com", "password": "pw" }).to_string();
    let (status, _) = common::send_json(&app, Method::POST, "/user/register", Some(&register)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = common::send_json(&app, Method::POST, "/user/register", Some(&register)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "An internal server error occurred." }));

    common::cleanup_db(db, &path).await;
}

#[tokio::test]
async fn preferences_update_creates_then_overwrites() {
    let (db, path) = common::spawn_db("users-prefs").await;
    let app = common::build_app(db.clone(), &common::test_config(None, None));

    let register = json!({ "email": "ada@example.com", "password": "pw" }).to_string();
    let (_, body) = common::send_json(&app, Method::POST, "/user/register", Some(&register)).await;
    let user_id = body["userId"].as_str().expect("userId").to_string();
    assert!(db.get_preferences(&user_id).await.unwrap().is_none());

    let update = json!({ "user_id": user_id, "excludeNSFW": true, "preferredTags": ["ignored"] })
        .to_string();
    let (status, body) =
        common::send_json(&app, Method::PUT, "/user/preferences/update", Some(&update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "message": "User preferences updated successfully." })
    );
    let created = db.get_preferences(&user_id).await.unwrap().expect("prefs row");
    assert!(created.exclude_nsfw);
    assert!(created.preferred_tags.is_empty());

    let update = json!({ "user_id": user_id, "excludeNSFW": false }).to_string();
    let (status, _) =
        common::send_json(&app, Method::PUT, "/user/preferences/update", Some(&update)).await;
    assert_eq!(status, StatusCode::OK);
    let updated = db.get_preferences(&user_id).await.unwrap().expect("prefs row");
    assert_eq!(updated.id, created.id);
    assert!(!updated.exclude_nsfw);

    common::cleanup_db(db, &path).await;
}

#[tokio::test]
async fn preferences_for_unknown_user_fail() {
    let (db, path) = common::spawn_db("users-prefs-unknown").await;
    let app = common::build_app(db.clone(), &common::test_config(None, None));

    let update = json!({ "user_id": "no-such-user", "excludeNSFW": true }).to_string();
    let (status, body) =
        common::send_json(&app, Method::PUT, "/user/preferences/update", Some(&update)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "An internal server error occurred." }));

    common::cleanup_db(db, &path).await;
}

#[tokio::test]
async fn malformed_bodies_and_unknown_routes_are_rejected() {
    let (db, path) = common::spawn_db("users-malformed").await;
    let app = common::build_app(db.clone(), &common::test_config(None, None));

    let (status, _) =
        common::send_json(&app, Method::POST, "/user/register", Some("{\"email\":")).await;
    assert!(status.is_client_error(), "got {status}");

    let (status, _) = common::send_json(
        &app,
        Method::POST,
        "/user/authenticate",
        Some(r#"{"email":"ada@example.com"}"#),
    )
    .await;
    assert!(status.is_client_error(), "got {status}");

    let (status, _) = common::send_json(&app, Method::GET, "/user/profile", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert!(db.get_user_by_email("ada@example.com").await.unwrap().is_none());

    common::cleanup_db(db, &path).await;
}

#[tokio::test]
async fn query_parameter_form_is_accepted() {
    let (db, path) = common::spawn_db("users-query").await;
    let app = common::build_app(db.clone(), &common::test_config(None, None));

    let (status, body) = common::send_json(
        &app,
        Method::POST,
        "/user/authenticate?email=nobody%40example.com&password=pw",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": false, "message": "User not found." }));

    // Scalars in the query, preferences object as the body.
    let prefs = json!({ "excludeNSFW": true, "preferredTags": ["a", "a"] }).to_string();
    let (status, body) = common::send_json(
        &app,
        Method::POST,
        "/user/register?email=ada%40example.com&password=s3cret",
        Some(&prefs),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User registered successfully.");
    let user_id = body["userId"].as_str().expect("userId").to_string();

    let stored = db.get_preferences(&user_id).await.unwrap().expect("prefs row");
    assert!(stored.exclude_nsfw);
    assert_eq!(stored.preferred_tags, vec!["a"]);

    let (status, body) = common::send_json(
        &app,
        Method::POST,
        "/user/authenticate?email=ada%40example.com&password=s3cret",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["id"], user_id.as_str());

    // Scalars in the query, tag list as the body.
    let uri = format!("/user/preferences/update?user_id={user_id}&excludeNSFW=false");
    let (status, body) =
        common::send_json(&app, Method::PUT, &uri, Some(r#"["cooking"]"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let updated = db.get_preferences(&user_id).await.unwrap().expect("prefs row");
    assert_eq!(updated.id, stored.id);
    assert!(!updated.exclude_nsfw);
    assert_eq!(updated.preferred_tags, vec!["a"]);

    // Query form still requires every mandatory field.
    let (status, _) = common::send_json(
        &app,
        Method::POST,
        "/user/authenticate?email=ada%40example.com",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    common::cleanup_db(db, &path).await;
}
