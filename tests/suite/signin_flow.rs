//! End-to-end sign-in flows against a mock authentication server.

use std::time::Duration;

use almacen_engine::{
    Alert, Field, Role, Route, SignInResolution, SubmitOutcome, UiOptions,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{
    SIGNIN_PATH, app_for, closed_port_url, fill, mount_signin, mount_signin_for, settle,
    signed_in_body,
};

#[tokio::test]
async fn empty_username_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SIGNIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(signed_in_body("ADMIN_ROLE")))
        .expect(0)
        .mount(&server)
        .await;

    let mut app = app_for(&server.uri(), UiOptions::default());
    fill(&mut app, "", "secreto");

    assert!(matches!(app.submit(), SubmitOutcome::Blocked(_)));
    assert_eq!(
        app.form()
            .visible_error(Field::Username)
            .map(ToString::to_string)
            .as_deref(),
        Some("Campo obligatorio")
    );
    assert!(app.form().visible_error(Field::Password).is_none());
    assert!(!app.is_submitting());
}

#[tokio::test]
async fn empty_password_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SIGNIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(signed_in_body("ADMIN_ROLE")))
        .expect(0)
        .mount(&server)
        .await;

    let mut app = app_for(&server.uri(), UiOptions::default());
    fill(&mut app, "erielit", "");

    assert!(matches!(app.submit(), SubmitOutcome::Blocked(_)));
    assert!(app.form().visible_error(Field::Password).is_some());
}

#[tokio::test]
async fn credentials_are_posted_and_role_routes() {
    let cases = [
        ("ADMIN_ROLE", Role::Admin, Route::Admin),
        ("CLIENT_ROLE", Role::Client, Route::Client),
        ("USER_ROLE", Role::User, Route::User),
    ];

    for (wire, role, route) in cases {
        let server = MockServer::start().await;
        mount_signin_for(
            &server,
            "erielit",
            "secreto",
            ResponseTemplate::new(200).set_body_json(signed_in_body(wire)),
        )
        .await;

        let mut app = app_for(&server.uri(), UiOptions::default());
        fill(&mut app, "erielit", "secreto");
        assert_eq!(app.submit(), SubmitOutcome::Started);

        assert_eq!(
            settle(&mut app).await,
            SignInResolution::SignedIn { role, route }
        );
        assert_eq!(app.route(), route);
        assert_eq!(app.history().entries(), [route], "sign-in page replaced");
        assert!(app.store().state().is_signed_in());
        assert_eq!(app.store().dispatched(), ["SIGNIN"]);
    }
}

#[tokio::test]
async fn role_matching_is_case_sensitive() {
    let server = MockServer::start().await;
    mount_signin(
        &server,
        ResponseTemplate::new(200).set_body_json(signed_in_body("admin_role")),
    )
    .await;

    let mut app = app_for(&server.uri(), UiOptions::default());
    fill(&mut app, "erielit", "secreto");
    app.submit();

    assert_eq!(
        settle(&mut app).await,
        SignInResolution::UnrecognizedRole("admin_role".to_string())
    );
    assert_eq!(app.route(), Route::SignIn);
    assert!(app.alert().is_none());
    assert!(app.store().dispatched().is_empty());
}

#[tokio::test]
async fn unreachable_server_alerts_once_and_recovers() {
    let mut app = app_for(&closed_port_url(), UiOptions::default());
    fill(&mut app, "erielit", "secreto");
    app.submit();

    assert_eq!(settle(&mut app).await, SignInResolution::Failed);
    assert!(!app.is_submitting());
    assert_eq!(app.dismiss_alert(), Some(Alert::sign_in_failed()));
    assert!(app.dismiss_alert().is_none());

    // The form keeps its values and can be submitted again.
    assert_eq!(app.form().value(Field::Username), "erielit");
    assert!(app.submit_enabled());
}

#[tokio::test]
async fn rejected_credentials_show_alert() {
    let server = MockServer::start().await;
    mount_signin(
        &server,
        ResponseTemplate::new(401).set_body_json(json!({
            "data": null,
            "error": true,
            "status": 401,
            "message": "Bad credentials"
        })),
    )
    .await;

    let mut app = app_for(&server.uri(), UiOptions::default());
    fill(&mut app, "erielit", "equivocada");
    app.submit();

    assert_eq!(settle(&mut app).await, SignInResolution::Failed);
    let alert = app.alert().expect("alert queued");
    assert_eq!(alert.title(), "Iniciar sesión");
    assert_eq!(alert.message(), "Usuario y/o contraseña incorrectos");
}

#[tokio::test]
async fn malformed_body_shows_alert() {
    let server = MockServer::start().await;
    mount_signin(
        &server,
        ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"),
    )
    .await;

    let mut app = app_for(&server.uri(), UiOptions::default());
    fill(&mut app, "erielit", "secreto");
    app.submit();

    assert_eq!(settle(&mut app).await, SignInResolution::Failed);
    assert!(app.alert().is_some());
}

#[tokio::test]
async fn in_flight_request_disables_submit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SIGNIN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(signed_in_body("CLIENT_ROLE"))
                .set_delay(Duration::from_millis(150)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut app = app_for(&server.uri(), UiOptions::default());
    fill(&mut app, "erielit", "secreto");
    app.submit();

    assert!(app.is_submitting());
    assert!(!app.submit_enabled());
    assert_eq!(app.submit(), SubmitOutcome::AlreadySubmitting);

    settle(&mut app).await;
    assert!(!app.is_submitting());
    assert_eq!(app.route(), Route::Client);
}

#[tokio::test]
async fn sign_out_then_sign_in_again() {
    let server = MockServer::start().await;
    mount_signin(
        &server,
        ResponseTemplate::new(200).set_body_json(signed_in_body("USER_ROLE")),
    )
    .await;

    let mut app = app_for(&server.uri(), UiOptions::default());
    fill(&mut app, "erielit", "secreto");
    app.submit();
    settle(&mut app).await;
    assert_eq!(app.route(), Route::User);

    app.sign_out();
    assert_eq!(app.route(), Route::SignIn);
    assert!(app.form().value(Field::Password).is_empty());

    fill(&mut app, "erielit", "secreto");
    app.submit();
    settle(&mut app).await;
    assert_eq!(app.route(), Route::User);
    assert_eq!(app.store().dispatched(), ["SIGNIN", "SIGNOUT", "SIGNIN"]);
}
