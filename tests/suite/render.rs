//! Rendering checks against an in-memory terminal.

use std::time::Duration;

use almacen_engine::{Field, NavigateOptions, Route, UiOptions};
use almacen_tui::spinner_frame;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

use crate::common::{app_for, closed_port_url, fill, mount_signin, render, settle, signed_in_body};

const WIDTH: u16 = 80;
const HEIGHT: u16 = 30;

fn still() -> UiOptions {
    UiOptions {
        reduced_motion: true,
        ..UiOptions::default()
    }
}

#[test]
fn sign_in_page_layout() {
    let mut app = app_for("http://localhost:1", still());
    let screen = render(&mut app, WIDTH, HEIGHT);

    assert!(screen.contains("Almacen App"));
    assert!(screen.contains("Usuario"));
    assert!(screen.contains("Contraseña"));
    assert!(screen.contains("¿Olvidaste tu contraseña?"));
    assert!(screen.contains("Iniciar sesión →"));
    // Placeholders while empty.
    assert!(screen.contains("erielit"));
    assert!(screen.contains("••••••••"));
}

#[test]
fn errors_appear_only_after_touch() {
    let mut app = app_for("http://localhost:1", still());
    let screen = render(&mut app, WIDTH, HEIGHT);
    assert!(!screen.contains("Campo obligatorio"));

    // Leaving the empty username marks it touched.
    app.focus_next();
    let screen = render(&mut app, WIDTH, HEIGHT);
    assert_eq!(screen.matches("Campo obligatorio").count(), 1);
}

#[test]
fn typed_password_is_never_shown() {
    let mut app = app_for("http://localhost:1", still());
    fill(&mut app, "erielit", "s3cr3t0");
    let screen = render(&mut app, WIDTH, HEIGHT);

    assert!(screen.contains("•••••••"));
    assert!(!screen.contains("s3cr3t0"));
}

#[tokio::test]
async fn spinner_replaces_label_while_submitting() {
    let server = MockServer::start().await;
    mount_signin(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(signed_in_body("ADMIN_ROLE"))
            .set_delay(Duration::from_millis(200)),
    )
    .await;

    let options = UiOptions::default();
    let mut app = app_for(&server.uri(), options);
    fill(&mut app, "erielit", "secreto");
    app.submit();

    let screen = render(&mut app, WIDTH, HEIGHT);
    assert!(screen.contains(spinner_frame(app.tick_count(), options)));
    assert!(!screen.contains("Iniciar sesión →"));

    settle(&mut app).await;
    let screen = render(&mut app, WIDTH, HEIGHT);
    assert!(screen.contains("Administración"));
    assert!(screen.contains("Eriel") || screen.contains("erielit"));
}

#[tokio::test]
async fn failure_alert_overlays_form() {
    let mut app = app_for(&closed_port_url(), still());
    fill(&mut app, "erielit", "secreto");
    app.submit();
    settle(&mut app).await;

    let screen = render(&mut app, WIDTH, HEIGHT);
    assert!(screen.contains("Iniciar sesión"));
    assert!(screen.contains("Usuario y/o contraseña incorrectos"));

    app.dismiss_alert();
    let screen = render(&mut app, WIDTH, HEIGHT);
    assert!(!screen.contains("Usuario y/o contraseña incorrectos"));
    assert_eq!(app.form().value(Field::Username), "erielit");
}

#[test]
fn landing_areas_have_titles() {
    for (route, title) in [
        (Route::Admin, "Administración"),
        (Route::Client, "Clientes"),
        (Route::User, "Usuarios"),
    ] {
        let mut app = app_for("http://localhost:1", still());
        app.navigate(route, NavigateOptions::replace());
        let screen = render(&mut app, WIDTH, HEIGHT);
        assert!(screen.contains(title), "{route} renders {title}");
        assert!(screen.contains("cerrar sesión"));
    }
}

#[test]
fn small_terminal_does_not_panic() {
    let mut app = app_for("http://localhost:1", UiOptions::default());
    fill(&mut app, "erielit", "secreto");
    render(&mut app, 20, 6);
}
