//! Submission workflow shared by the registration and booking forms
//!
//! A [`FormWorkflow`] owns the field values, the submission state machine and
//! the feedback slot. It is single-threaded: handles are cheap clones over one
//! `Rc<RefCell<_>>`, and no borrow is ever held across an `.await`, so a
//! second `submit()` issued while the first is suspended sees `Submitting`
//! and backs off.
//!
//! Timers are plain deadlines. The host loop calls [`FormWorkflow::poll_timers`]
//! (or awaits [`FormWorkflow::drive_timers`]) and due timers fire there.

mod booking;

pub use booking::{start_booking, BookingStart};

use crate::config::WorkflowConfig;
use crate::remote::{
    merge_booking_payload, BookingRequest, NavigationRequest, Navigator, ProfileLookup,
    ProfileRecord, RegistrationRequest, RemoteBackend,
};
use crate::state::{
    validate, Deadline, FeedbackMessage, FieldError, FieldSet, FormKind, RuleSet,
    ValidationResult,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

/// Feedback shown when a booking is accepted
pub const BOOKING_SUCCESS_MESSAGE: &str = "Booking Requested";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Why a submit request was not acted on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    AlreadySubmitting,
    /// Navigation is pending; the form is done
    AlreadySucceeded,
    /// The operation does not exist for this form
    Unsupported,
    TornDown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent
    Blocked(ValidationResult),
    Ignored(IgnoreReason),
    Succeeded(String),
    Failed(String),
    /// The workflow was torn down while the remote call was outstanding
    Discarded,
}

#[derive(Debug, Clone)]
struct PendingNavigation {
    request: NavigationRequest,
    deadline: Deadline,
}

enum Submission {
    Registration(RegistrationRequest),
    Booking(BookingRequest),
    SignIn,
}

#[derive(Debug)]
struct WorkflowState {
    fields: FieldSet,
    rules: RuleSet,
    status: SubmissionState,
    in_flight: bool,
    feedback: Option<FeedbackMessage>,
    feedback_timer: Option<Deadline>,
    navigation: Option<PendingNavigation>,
    context: Option<ProfileRecord>,
    mounted: bool,
}

impl WorkflowState {
    fn refusal(&self) -> Option<IgnoreReason> {
        if !self.mounted {
            return Some(IgnoreReason::TornDown);
        }
        match self.status {
            SubmissionState::Submitting => Some(IgnoreReason::AlreadySubmitting),
            SubmissionState::Succeeded => Some(IgnoreReason::AlreadySucceeded),
            SubmissionState::Idle | SubmissionState::Failed => None,
        }
    }

    /// Replace the feedback slot; the old auto-dismiss timer goes with it
    fn show_feedback(&mut self, message: FeedbackMessage, now: Instant, display: Duration) {
        self.feedback = Some(message);
        self.feedback_timer = Some(Deadline::after(now, display));
    }

    fn next_deadline(&self) -> Option<Instant> {
        let feedback = self.feedback_timer.map(|t| t.at());
        let navigation = self.navigation.as_ref().map(|n| n.deadline.at());
        match (feedback, navigation) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

/// Clears the in-flight flag when a submission ends, however it ends.
/// If the submit future is dropped mid-call the attempt is abandoned and the
/// form returns to `Idle`.
struct InFlightGuard {
    state: Rc<RefCell<WorkflowState>>,
    id: Uuid,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let Ok(mut state) = self.state.try_borrow_mut() else {
            return;
        };
        if !state.mounted {
            return;
        }
        state.in_flight = false;
        if state.status == SubmissionState::Submitting {
            state.status = SubmissionState::Idle;
            tracing::debug!(workflow = %self.id, "submission abandoned before completion");
        }
    }
}

/// Handle to one form's submission workflow
#[derive(Clone)]
pub struct FormWorkflow {
    id: Uuid,
    kind: FormKind,
    state: Rc<RefCell<WorkflowState>>,
    backend: Arc<dyn RemoteBackend>,
    navigator: Arc<dyn Navigator>,
    config: Rc<WorkflowConfig>,
}

impl FormWorkflow {
    pub fn new(
        kind: FormKind,
        backend: Arc<dyn RemoteBackend>,
        navigator: Arc<dyn Navigator>,
        config: Rc<WorkflowConfig>,
    ) -> Self {
        let id = Uuid::new_v4();
        tracing::debug!(workflow = %id, form = kind.label(), "workflow created");
        Self {
            id,
            kind,
            state: Rc::new(RefCell::new(WorkflowState {
                fields: kind.fields(),
                rules: kind.rules(),
                status: SubmissionState::Idle,
                in_flight: false,
                feedback: None,
                feedback_timer: None,
                navigation: None,
                context: None,
                mounted: true,
            })),
            backend,
            navigator,
            config,
        }
    }

    /// Registration has no preconditions, unlike booking (see [`start_booking`])
    pub fn registration(
        backend: Arc<dyn RemoteBackend>,
        navigator: Arc<dyn Navigator>,
        config: Rc<WorkflowConfig>,
    ) -> Self {
        Self::new(FormKind::Registration, backend, navigator, config)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn status(&self) -> SubmissionState {
        self.state.borrow().status
    }

    /// Drives the submit control: disabled while true
    pub fn is_submitting(&self) -> bool {
        self.state.borrow().in_flight
    }

    pub fn is_mounted(&self) -> bool {
        self.state.borrow().mounted
    }

    pub fn feedback(&self) -> Option<FeedbackMessage> {
        self.state.borrow().feedback.clone()
    }

    /// Snapshot of the fields, including touched flags
    pub fn fields(&self) -> FieldSet {
        self.state.borrow().fields.clone()
    }

    pub fn values(&self) -> Vec<(String, String)> {
        self.state.borrow().fields.values()
    }

    /// Submission context merged into the booking payload
    pub fn context(&self) -> Option<ProfileRecord> {
        self.state.borrow().context.clone()
    }

    pub fn has_pending_navigation(&self) -> bool {
        self.state.borrow().navigation.is_some()
    }

    /// Earliest pending timer, if any
    pub fn next_deadline(&self) -> Option<Instant> {
        self.state.borrow().next_deadline()
    }

    /// Update a field. Validation is derived on read, not triggered here.
    pub fn set_field_value(&self, name: &str, value: impl Into<String>) -> bool {
        let known = self.state.borrow_mut().fields.set_value(name, value);
        if !known {
            tracing::debug!(workflow = %self.id, field = name, "ignoring value for unknown field");
        }
        known
    }

    /// Record that the user left a field; its errors become visible
    pub fn mark_touched(&self, name: &str) -> bool {
        self.state.borrow_mut().fields.touch(name)
    }

    /// Every current error, touched or not
    pub fn validation(&self) -> ValidationResult {
        let state = self.state.borrow();
        validate(&state.fields, &state.rules)
    }

    /// Errors the user should see right now
    pub fn visible_errors(&self) -> ValidationResult {
        let state = self.state.borrow();
        validate(&state.fields, &state.rules).visible(&state.fields)
    }

    pub fn visible_error(&self, name: &str) -> Option<FieldError> {
        self.visible_errors().get(name).cloned()
    }

    /// Validate, then send the form through the bound remote operation.
    pub async fn submit(&self) -> SubmitOutcome {
        let (submission, guard) = {
            let mut state = self.state.borrow_mut();
            if let Some(reason) = state.refusal() {
                tracing::debug!(workflow = %self.id, ?reason, "submit ignored");
                return SubmitOutcome::Ignored(reason);
            }
            let errors = validate(&state.fields, &state.rules);
            if !errors.is_empty() {
                state.fields.touch_all();
                tracing::debug!(workflow = %self.id, errors = errors.len(), "submit blocked by validation");
                return SubmitOutcome::Blocked(errors);
            }
            let submission = match self.kind {
                FormKind::Registration => {
                    Submission::Registration(RegistrationRequest::from_fields(&state.fields))
                }
                FormKind::Booking => Submission::Booking(merge_booking_payload(
                    &state.fields,
                    state.context.as_ref(),
                )),
            };
            let guard = self.enter_submitting(&mut state);
            (submission, guard)
        };

        let result = self.dispatch(submission).await;
        let outcome = self.finish(result);
        drop(guard);
        outcome
    }

    /// Registration only: skip the form and sign in through the identity
    /// provider, then follow the same feedback and redirect path as `submit`.
    pub async fn sign_in_externally(&self) -> SubmitOutcome {
        if self.kind != FormKind::Registration {
            return SubmitOutcome::Ignored(IgnoreReason::Unsupported);
        }
        let guard = {
            let mut state = self.state.borrow_mut();
            if let Some(reason) = state.refusal() {
                tracing::debug!(workflow = %self.id, ?reason, "sign-in ignored");
                return SubmitOutcome::Ignored(reason);
            }
            self.enter_submitting(&mut state)
        };

        let result = self.dispatch(Submission::SignIn).await;
        let outcome = self.finish(result);
        drop(guard);
        outcome
    }

    /// Booking only: look up the visitor profile and keep it as submission
    /// context. Any failure leaves the context empty; the form stays usable.
    pub async fn fetch_and_apply_profile(&self, identifier: &str) -> bool {
        if self.kind != FormKind::Booking || !self.is_mounted() {
            return false;
        }

        let lookup = self.backend.fetch_profile(identifier).await;

        let mut state = self.state.borrow_mut();
        if !state.mounted {
            tracing::debug!(workflow = %self.id, "dropping profile that arrived after teardown");
            return false;
        }
        match lookup {
            Ok(ProfileLookup {
                ok: true,
                user: Some(profile),
            }) => {
                tracing::debug!(workflow = %self.id, fields = profile.0.len(), "profile applied");
                state.context = Some(profile);
                true
            }
            Ok(_) => {
                tracing::warn!(workflow = %self.id, "no profile found; booking without it");
                false
            }
            Err(err) => {
                tracing::warn!(workflow = %self.id, error = %err, "profile lookup failed; booking without it");
                false
            }
        }
    }

    pub fn dismiss_feedback(&self) {
        let mut state = self.state.borrow_mut();
        state.feedback = None;
        state.feedback_timer = None;
    }

    /// Fire every timer due at `now`. Returns true if navigation happened.
    pub fn poll_timers(&self, now: Instant) -> bool {
        let navigation = {
            let mut state = self.state.borrow_mut();
            if !state.mounted {
                return false;
            }
            if state.feedback_timer.is_some_and(|t| t.is_due(now)) {
                state.feedback_timer = None;
                state.feedback = None;
                tracing::debug!(workflow = %self.id, "feedback dismissed after display time");
            }
            if state
                .navigation
                .as_ref()
                .is_some_and(|n| n.deadline.is_due(now))
            {
                state.navigation.take()
            } else {
                None
            }
        };

        match navigation {
            Some(pending) => {
                tracing::info!(workflow = %self.id, path = %pending.request.path, "navigating");
                self.navigator.navigate(&pending.request);
                true
            }
            None => false,
        }
    }

    /// Sleep through pending timers until navigation fires or none remain.
    pub async fn drive_timers(&self) -> bool {
        while let Some(at) = self.next_deadline() {
            tokio::time::sleep_until(at).await;
            if self.poll_timers(Instant::now()) {
                return true;
            }
        }
        false
    }

    /// Discard the workflow. Pending timers are cancelled and any remote call
    /// still in flight will find the workflow gone when it returns.
    pub fn teardown(&self) {
        let mut state = self.state.borrow_mut();
        if !state.mounted {
            return;
        }
        state.mounted = false;
        state.in_flight = false;
        state.feedback = None;
        state.feedback_timer = None;
        state.navigation = None;
        tracing::debug!(workflow = %self.id, status = ?state.status, "workflow torn down");
    }

    fn enter_submitting(&self, state: &mut WorkflowState) -> InFlightGuard {
        state.status = SubmissionState::Submitting;
        state.in_flight = true;
        tracing::debug!(workflow = %self.id, form = self.kind.label(), "submitting");
        InFlightGuard {
            state: Rc::clone(&self.state),
            id: self.id,
        }
    }

    async fn dispatch(&self, submission: Submission) -> Result<String, String> {
        match submission {
            Submission::Registration(request) => {
                match self.backend.submit_registration(request).await {
                    Ok(reply) => reply.into_result().map_err(|e| e.to_string()),
                    Err(err) => Err(err.to_string()),
                }
            }
            Submission::Booking(request) => self
                .backend
                .submit_booking(request)
                .await
                .map(|()| BOOKING_SUCCESS_MESSAGE.to_string())
                .map_err(|e| e.to_string()),
            Submission::SignIn => match self.backend.sign_in_with_provider().await {
                Ok(reply) => reply.into_result().map_err(|e| e.to_string()),
                Err(err) => Err(err.to_string()),
            },
        }
    }

    fn finish(&self, result: Result<String, String>) -> SubmitOutcome {
        let mut state = self.state.borrow_mut();
        if !state.mounted {
            tracing::warn!(workflow = %self.id, "workflow torn down during submission; result dropped");
            return SubmitOutcome::Discarded;
        }

        let now = Instant::now();
        let display = self.config.feedback_display();
        match result {
            Ok(message) => {
                state.status = SubmissionState::Succeeded;
                state.show_feedback(FeedbackMessage::success(message.clone()), now, display);
                let (delay, locale) = match self.kind {
                    FormKind::Registration => {
                        (self.config.registration_redirect(), self.config.locale.clone())
                    }
                    FormKind::Booking => (self.config.booking_redirect(), None),
                };
                state.navigation = Some(PendingNavigation {
                    request: NavigationRequest::new(self.config.dashboard_route.clone(), locale),
                    deadline: Deadline::after(now, delay),
                });
                tracing::info!(
                    workflow = %self.id,
                    form = self.kind.label(),
                    redirect_in_ms = delay.as_millis() as u64,
                    "submission succeeded"
                );
                SubmitOutcome::Succeeded(message)
            }
            Err(message) => {
                state.status = SubmissionState::Failed;
                state.show_feedback(FeedbackMessage::error(message.clone()), now, display);
                tracing::info!(
                    workflow = %self.id,
                    form = self.kind.label(),
                    error = %message,
                    "submission failed"
                );
                SubmitOutcome::Failed(message)
            }
        }
    }
}
