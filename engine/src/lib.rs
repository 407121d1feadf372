//! Core engine for Almacen - sign-in state machine and orchestration.
//!
//! This crate contains the App state machine without TUI dependencies.
//!
//! # Sign-in flow
//!
//! ```text
//! submit() --invalid--> Blocked (fields touched, no request)
//!    |
//!    valid
//!    v
//! InFlight(task) --tick()/poll_submission()--> Idle
//!                       |
//!                       +-- first role known   -> dispatch SIGNIN, navigate(replace)
//!                       +-- first role unknown -> nothing
//!                       +-- anything else      -> one "Iniciar sesión" alert
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use anyhow::Context;
use tokio::task::{JoinError, JoinHandle};

pub use almacen_client::{AuthClient, ClientConfig, SignInError};
pub use almacen_types::{
    Alert, AlertKind, AuthAction, AuthState, AuthStore, Credentials, Field, FieldError, Focus,
    History, NavigateOptions, Role, RoleRecord, Route, SignInForm, SignInPayload, TextField,
    UiOptions, ValidationErrors,
    ui::{PanelEffect, PanelEffectKind},
};

mod config;
pub use config::{
    AlmacenConfig, ApiConfig, AppConfig, BASE_URL_ENV, ConfigError, DEFAULT_BASE_URL,
    config_path, expand_env_vars, resolve_base_url,
};

type SignInResult = Result<SignInPayload, SignInError>;

/// Result of asking the form to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The request was spawned.
    Started,
    /// Validation failed; nothing was sent.
    Blocked(ValidationErrors),
    /// A request is already in flight; nothing was sent.
    AlreadySubmitting,
}

/// How a finished sign-in request was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInResolution {
    /// `SIGNIN` was dispatched and history now ends at the role's landing route.
    SignedIn { role: Role, route: Route },
    /// The first role is not one we route; nothing happened.
    UnrecognizedRole(String),
    /// The failure alert was queued.
    Failed,
}

#[derive(Debug)]
struct SubmissionTask {
    username: String,
    started: Instant,
    handle: JoinHandle<SignInResult>,
}

#[derive(Debug)]
struct CompletedSubmission {
    username: String,
    started: Instant,
    result: Result<SignInResult, JoinError>,
}

impl SubmissionTask {
    /// Join without waiting. Hands the task back when it is not ready.
    fn try_complete_now(mut self) -> Result<CompletedSubmission, Self> {
        use futures_util::future::FutureExt;

        let Some(result) = (&mut self.handle).now_or_never() else {
            return Err(self);
        };
        Ok(CompletedSubmission {
            username: self.username,
            started: self.started,
            result,
        })
    }
}

/// The submitting flag. Existence of the task proves a request is in flight.
#[derive(Debug, Default)]
enum Submission {
    #[default]
    Idle,
    InFlight(SubmissionTask),
}

/// Application state
pub struct App {
    form: SignInForm,
    focus: Focus,
    submission: Submission,
    client: AuthClient,
    store: AuthStore,
    history: History,
    alerts: VecDeque<Alert>,
    options: UiOptions,
    should_quit: bool,
    tick: usize,
    /// Frame timing for animations.
    last_frame: Instant,
    /// Active panel animation.
    panel_effect: Option<PanelEffect>,
}

impl App {
    pub fn new(config: &AlmacenConfig) -> anyhow::Result<Self> {
        let client_config = config.client_config();
        let client = AuthClient::new(&client_config)
            .with_context(|| format!("cannot create client for {}", client_config.base_url()))?;
        tracing::info!(url = %client.signin_url(), "Sign-in endpoint configured");
        Ok(Self::with_client(client, config.ui_options()))
    }

    #[must_use]
    pub fn with_client(client: AuthClient, options: UiOptions) -> Self {
        Self {
            form: SignInForm::new(),
            focus: Focus::default(),
            submission: Submission::Idle,
            client,
            store: AuthStore::new(),
            history: History::new(),
            alerts: VecDeque::new(),
            options,
            should_quit: false,
            tick: 0,
            last_frame: Instant::now(),
            panel_effect: None,
        }
    }

    // ------------------------------------------------------------------
    // Form binding
    // ------------------------------------------------------------------

    pub fn form(&self) -> &SignInForm {
        &self.form
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Move focus, blurring the field being left.
    pub fn set_focus(&mut self, focus: Focus) {
        if focus == self.focus {
            return;
        }
        if let Some(field) = self.focus.field() {
            self.form.blur(field);
        }
        self.focus = focus;
    }

    pub fn focus_next(&mut self) {
        self.set_focus(self.focus.next());
    }

    pub fn focus_prev(&mut self) {
        self.set_focus(self.focus.prev());
    }

    fn edit_focused(&mut self, f: impl FnOnce(&mut TextField)) {
        if let Some(field) = self.focus.field() {
            self.form.edit(field, f);
        }
    }

    pub fn enter_char(&mut self, c: char) {
        self.edit_focused(|input| input.enter_char(c));
    }

    pub fn enter_text(&mut self, text: &str) {
        self.edit_focused(|input| input.enter_text(text));
    }

    pub fn backspace(&mut self) {
        self.edit_focused(TextField::delete_char);
    }

    pub fn delete_forward(&mut self) {
        self.edit_focused(TextField::delete_char_forward);
    }

    pub fn move_cursor_left(&mut self) {
        self.edit_focused(TextField::move_cursor_left);
    }

    pub fn move_cursor_right(&mut self) {
        self.edit_focused(TextField::move_cursor_right);
    }

    pub fn move_cursor_home(&mut self) {
        self.edit_focused(TextField::move_cursor_home);
    }

    pub fn move_cursor_end(&mut self) {
        self.edit_focused(TextField::move_cursor_end);
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.form.set_value(field, value);
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    pub fn is_submitting(&self) -> bool {
        matches!(self.submission, Submission::InFlight(_))
    }

    /// The submit control is usable: nothing in flight and no recorded errors.
    pub fn submit_enabled(&self) -> bool {
        !self.is_submitting() && self.form.is_valid()
    }

    /// Validate and, when valid, send the credentials. Must run inside a tokio runtime.
    pub fn submit(&mut self) -> SubmitOutcome {
        if self.is_submitting() {
            return SubmitOutcome::AlreadySubmitting;
        }

        let credentials = match self.form.begin_submit() {
            Ok(credentials) => credentials,
            Err(errors) => {
                let fields: Vec<&str> = errors.fields().map(Field::name).collect();
                tracing::info!(?fields, "Sign-in blocked by validation");
                if !self.options.reduced_motion {
                    self.panel_effect = Some(PanelEffect::submit_blocked());
                }
                return SubmitOutcome::Blocked(errors);
            }
        };

        let username = credentials.username().to_string();
        tracing::info!(username = %username, "Submitting sign-in");

        let client = self.client.clone();
        let handle = tokio::spawn(async move { client.sign_in(&credentials).await });

        self.submission = Submission::InFlight(SubmissionTask {
            username,
            started: Instant::now(),
            handle,
        });
        SubmitOutcome::Started
    }

    /// Apply a finished sign-in request, if any.
    ///
    /// Called from [`App::tick`]. The submitting flag is cleared before the
    /// result is looked at, so every outcome (including a panicked task) ends idle.
    /// A task that reports finished but cannot be joined yet stays in flight
    /// until the next poll.
    pub fn poll_submission(&mut self) -> Option<SignInResolution> {
        let finished = match &self.submission {
            Submission::InFlight(task) => task.handle.is_finished(),
            Submission::Idle => return None,
        };
        if !finished {
            return None;
        }

        let Submission::InFlight(task) = std::mem::take(&mut self.submission) else {
            return None;
        };
        let completed = match task.try_complete_now() {
            Ok(completed) => completed,
            Err(task) => {
                tracing::debug!("Sign-in task finished but not yet joinable");
                self.submission = Submission::InFlight(task);
                return None;
            }
        };

        let elapsed_ms = completed.started.elapsed().as_millis() as u64;
        tracing::debug!(username = %completed.username, elapsed_ms, "Sign-in request finished");
        Some(self.apply_sign_in_result(flatten_join(completed.result)))
    }

    fn apply_sign_in_result(&mut self, result: Result<SignInPayload, TaskError>) -> SignInResolution {
        let payload = match result {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(kind = err.kind(), error = %err, "Sign-in failed");
                return self.fail_sign_in();
            }
        };

        match payload.primary_role() {
            None => {
                tracing::warn!("Sign-in response carried no roles");
                self.fail_sign_in()
            }
            Some(Err(unknown)) => {
                tracing::warn!(role = %unknown.0, "Signed in with a role that has no landing route");
                SignInResolution::UnrecognizedRole(unknown.0)
            }
            Some(Ok(role)) => {
                let route = role.landing_route();
                tracing::info!(%role, "Signed in");
                self.store.dispatch(AuthAction::SignIn(payload));
                self.navigate(route, NavigateOptions::replace());
                SignInResolution::SignedIn { role, route }
            }
        }
    }

    fn fail_sign_in(&mut self) -> SignInResolution {
        self.show_alert(Alert::sign_in_failed());
        SignInResolution::Failed
    }

    /// Leave the landing area and return to an empty sign-in form.
    pub fn sign_out(&mut self) {
        if !self.store.state().is_signed_in() {
            return;
        }
        self.store.dispatch(AuthAction::SignOut);
        self.form.reset();
        self.focus = Focus::default();
        self.navigate(Route::SignIn, NavigateOptions::replace());
        tracing::info!("Signed out");
    }

    // ------------------------------------------------------------------
    // Navigation and store
    // ------------------------------------------------------------------

    pub fn navigate(&mut self, route: Route, options: NavigateOptions) {
        let from = self.history.current();
        self.history.navigate(route, options);
        tracing::info!(%from, to = %route, replace = options.replace, "Navigated");
    }

    pub fn route(&self) -> Route {
        self.history.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn store(&self) -> &AuthStore {
        &self.store
    }

    // ------------------------------------------------------------------
    // Alerts
    // ------------------------------------------------------------------

    pub fn show_alert(&mut self, alert: Alert) {
        tracing::info!(title = alert.title(), kind = alert.kind().as_str(), "Alert shown");
        self.alerts.push_back(alert);
        if !self.options.reduced_motion {
            self.panel_effect = Some(PanelEffect::alert_opening());
        }
    }

    /// The alert currently on screen.
    pub fn alert(&self) -> Option<&Alert> {
        self.alerts.front()
    }

    pub fn dismiss_alert(&mut self) -> Option<Alert> {
        let dismissed = self.alerts.pop_front();
        if dismissed.is_some() {
            self.panel_effect = None;
        }
        dismissed
    }

    // ------------------------------------------------------------------
    // Lifecycle and frame state
    // ------------------------------------------------------------------

    pub fn ui_options(&self) -> UiOptions {
        self.options
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
        if let Submission::InFlight(task) = std::mem::take(&mut self.submission) {
            task.handle.abort();
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Increment animation tick and poll the in-flight request.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.poll_submission();
    }

    pub fn tick_count(&self) -> usize {
        self.tick
    }

    /// Get elapsed time since last frame and update timing.
    pub fn frame_elapsed(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        elapsed
    }

    /// Get mutable reference to the panel effect for UI processing.
    pub fn panel_effect_mut(&mut self) -> Option<&mut PanelEffect> {
        self.panel_effect.as_mut()
    }

    pub fn clear_panel_effect(&mut self) {
        self.panel_effect = None;
    }
}

/// Failure of the background request: either the request itself or the task running it.
#[derive(Debug, thiserror::Error)]
enum TaskError {
    #[error(transparent)]
    SignIn(#[from] SignInError),
    #[error("sign-in task did not complete: {0}")]
    Join(#[from] JoinError),
}

impl TaskError {
    fn kind(&self) -> &'static str {
        match self {
            Self::SignIn(err) => err.kind(),
            Self::Join(err) if err.is_cancelled() => "cancelled",
            Self::Join(_) => "panicked",
        }
    }
}

fn flatten_join(joined: Result<SignInResult, JoinError>) -> Result<SignInPayload, TaskError> {
    Ok(joined??)
}
