use axum::body::Body;
use axum::http::StatusCode;

use crate::tests::helper;

#[tokio::test]
async fn test_register_and_login() {
    let mut app = helper::setup_test_app().await;

    // register hands out a token
    let (status_code, token, _) =
        helper::maybe_register(&mut app, "Jane", "jane@example.com", helper::PASSWORD).await;
    assert_eq!(StatusCode::OK, status_code);
    assert!(token.is_some());

    // the token identifies the user
    let request = helper::current_user_request(token.as_deref())
        .body(Body::empty())
        .unwrap();
    let (status_code, user, _) = helper::current_user(&mut app, request).await;
    assert_eq!(StatusCode::OK, status_code);
    let user = user.unwrap();
    assert_eq!("Jane", user["name"]);
    assert_eq!("jane@example.com", user["email"]);
    assert!(user.get("_id").is_some());
    assert!(user.get("createdAt").is_some());
    assert!(user.get("updatedAt").is_some());
    assert!(user.get("hashedPassword").is_none());
    assert!(user.get("password").is_none());

    // email is matched case insensitive
    let (status_code, token, _) =
        helper::maybe_login(&mut app, " JANE@example.com", helper::PASSWORD).await;
    assert_eq!(StatusCode::OK, status_code);
    assert!(token.is_some());

    // wrong password
    let (status_code, _, error) =
        helper::maybe_login(&mut app, "jane@example.com", "notsosecret").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Invalid credentials", error.unwrap().msg);

    // unknown user gets the same answer
    let (status_code, _, error) =
        helper::maybe_login(&mut app, "john@example.com", helper::PASSWORD).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Invalid credentials", error.unwrap().msg);
}

#[tokio::test]
async fn test_register_validation() {
    let mut app = helper::setup_test_app().await;

    let (status_code, _, error) =
        helper::maybe_register(&mut app, " ", "jane@example.com", helper::PASSWORD).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Please fill in all fields", error.unwrap().msg);

    let (status_code, _, error) =
        helper::maybe_register(&mut app, "Jane", "jane@example.com", "short").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Password must be at least 6 characters", error.unwrap().msg);

    let (status_code, _, _) =
        helper::maybe_register(&mut app, "Jane", "jane@example.com", helper::PASSWORD).await;
    assert_eq!(StatusCode::OK, status_code);

    let (status_code, _, error) =
        helper::maybe_register(&mut app, "Jane", "Jane@Example.com", helper::PASSWORD).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("User already exists", error.unwrap().msg);
}

#[tokio::test]
async fn test_concurrent_registrations() {
    let app = helper::setup_test_app().await;

    // clones of the router share the same storage
    let mut first = app.clone();
    let mut second = app.clone();

    let (one, two) = tokio::join!(
        helper::maybe_register(&mut first, "Jane", "jane@example.com", helper::PASSWORD),
        helper::maybe_register(&mut second, "Jane", "JANE@example.com", helper::PASSWORD),
    );

    let mut status_codes = [one.0, two.0];
    status_codes.sort();
    assert_eq!([StatusCode::OK, StatusCode::BAD_REQUEST], status_codes);

    let error = one.2.or(two.2).unwrap();
    assert_eq!("User already exists", error.msg);
}

#[tokio::test]
async fn test_token_headers() {
    let mut app = helper::setup_test_app().await;

    let token = helper::register(&mut app, "jane@example.com").await;

    // no token at all
    let request = helper::current_user_request(None)
        .body(Body::empty())
        .unwrap();
    let (status_code, _, error) = helper::current_user(&mut app, request).await;
    assert_eq!(StatusCode::UNAUTHORIZED, status_code);
    assert_eq!("No token, authorization denied", error.unwrap().msg);

    // garbage token
    let request = helper::current_user_request(Some("garbage"))
        .body(Body::empty())
        .unwrap();
    let (status_code, _, error) = helper::current_user(&mut app, request).await;
    assert_eq!(StatusCode::UNAUTHORIZED, status_code);
    assert_eq!("Token is not valid", error.unwrap().msg);

    // bare token header
    let request = helper::current_user_request(None)
        .header("x-auth-token", token.as_str())
        .body(Body::empty())
        .unwrap();
    let (status_code, user, _) = helper::current_user(&mut app, request).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!("jane@example.com", user.unwrap()["email"]);

    // notes need a token as well
    let request = axum::http::Request::builder()
        .uri("/api/notes")
        .body(Body::empty())
        .unwrap();
    let (status_code, _) = helper::send(&mut app, request).await;
    assert_eq!(StatusCode::UNAUTHORIZED, status_code);
}

#[tokio::test]
async fn test_token_of_other_app_is_rejected() {
    let mut app = helper::setup_test_app().await;
    let mut other_app = helper::setup_test_app().await;

    // same secret, but the user only exists in the other storage
    let token = helper::register(&mut other_app, "jane@example.com").await;

    let request = helper::current_user_request(Some(&token))
        .body(Body::empty())
        .unwrap();
    let (status_code, _, error) = helper::current_user(&mut app, request).await;
    assert_eq!(StatusCode::UNAUTHORIZED, status_code);
    assert_eq!("Token is not valid", error.unwrap().msg);
}

#[tokio::test]
async fn test_unknown_route() {
    let mut app = helper::setup_test_app().await;

    let request = axum::http::Request::builder()
        .uri("/api/unknown")
        .body(Body::empty())
        .unwrap();
    let (status_code, body) = helper::send(&mut app, request).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!("Not found", helper::get_error(&body).msg);
}
