//! View synchronizer: keeps the board in step with the activities API
//!
//! Each user action is one request. The view model is patched locally when
//! the request succeeds and left alone when it fails. Locks on the board are
//! never held across a request. An action abandoned mid-request (its future
//! dropped) releases its in-flight mark without touching the cards.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::alert::Alerter;
use crate::api::SignupClient;
use crate::render;
use crate::status::{StatusKind, StatusMessage};
use crate::view::{BoardHandle, BoardView, ListState, RemoveControl, SignupForm};
use crate::BoardError;

pub const SIGNUP_FAILED_MESSAGE: &str = "An error occurred";
pub const SIGNUP_UNREACHABLE_MESSAGE: &str = "Failed to sign up. Please try again.";
pub const REMOVE_FAILED_MESSAGE: &str = "Failed to remove participant";
pub const REMOVE_UNREACHABLE_MESSAGE: &str =
    "Error removing participant. See the log for details.";

/// What a settled signup leaves behind for the submitter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignupOutcome {
    pub status: StatusMessage,
    /// Fields the submitter's form should hold: cleared on success, kept on failure
    pub form: SignupForm,
}

/// Owns the board and wires user actions to server calls
pub struct ViewSynchronizer {
    client: SignupClient,
    board: BoardHandle,
    alerter: Arc<dyn Alerter>,
    hide_after: Duration,
    hide_timer: Mutex<Option<CancellationToken>>,
    init: Mutex<()>,
}

impl std::fmt::Debug for ViewSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewSynchronizer")
            .field("client", &self.client)
            .field("hide_after", &self.hide_after)
            .finish()
    }
}

impl ViewSynchronizer {
    pub fn new(
        client: SignupClient,
        board: BoardHandle,
        alerter: Arc<dyn Alerter>,
        hide_after: Duration,
    ) -> Self {
        Self {
            client,
            board,
            alerter,
            hide_after,
            hide_timer: Mutex::new(None),
            init: Mutex::new(()),
        }
    }

    pub fn board(&self) -> &BoardHandle {
        &self.board
    }

    pub fn hide_after(&self) -> Duration {
        self.hide_after
    }

    /// Hide delay in whole milliseconds, saturating at `u64::MAX`
    pub fn hide_after_ms(&self) -> u64 {
        u64::try_from(self.hide_after.as_millis()).unwrap_or(u64::MAX)
    }

    /// Fetch the activity collection once and build the cards.
    /// A failure leaves the failure message in the list area. Concurrent
    /// callers wait for the first fetch instead of issuing their own.
    pub async fn initialize(&self) {
        let _init = self.init.lock().await;
        if self.board.read().await.list != ListState::Loading {
            tracing::debug!("Board already initialized, skipping fetch");
            return;
        }

        match self.client.list_activities().await {
            Ok(catalog) => {
                self.board.write().await.load(&catalog);
                tracing::info!("Loaded {} activities", catalog.len());
            }
            Err(e) => {
                self.board.write().await.fail_load();
                tracing::error!("Error fetching activities: {}", e);
            }
        }
    }

    /// Register `email` for `activity` and patch the matching card on success.
    ///
    /// Server rejections and network failures become an error status rather
    /// than an `Err`; only the same submission already in flight is refused.
    pub async fn submit_signup(&self, email: &str, activity: &str) -> crate::Result<SignupOutcome> {
        let submitted = SignupForm::new(email, activity);
        self.board.write().await.begin_submit(&submitted)?;
        let guard = InFlightGuard::new(&self.board, InFlight::Signup(submitted.clone()));

        let result = self.client.signup(activity, email).await;

        let (outcome, generation) = {
            let mut board = self.board.write().await;
            guard.settle();
            board.finish_submit(&submitted);
            let mut form = submitted;
            let generation = match result {
                Ok(message) => {
                    form.reset();
                    match board.card_mut(activity) {
                        Some(card) => {
                            if !card.add_participant(email) {
                                tracing::debug!("{} already listed for {}", email, activity);
                            }
                        }
                        None => tracing::warn!("Signed up for {} but no card shows it", activity),
                    }
                    tracing::info!("{}", message);
                    board.status.show(StatusKind::Success, message)
                }
                Err(e) => {
                    tracing::error!("Error signing up {} for {}: {}", email, activity, e);
                    board.status.show(StatusKind::Error, signup_failure_message(&e))
                }
            };
            let outcome = SignupOutcome {
                status: board.status.message.clone(),
                form,
            };
            (outcome, generation)
        };

        self.schedule_hide(generation).await;
        Ok(outcome)
    }

    /// Unregister `email` from `activity` and drop its row on success.
    /// On failure the user is alerted and the card is left as it was.
    pub async fn remove_participant(&self, activity: &str, email: &str) -> crate::Result<()> {
        let control = RemoveControl {
            activity: activity.to_string(),
            email: email.to_string(),
        };

        if let Err(e) = self.board.write().await.begin_removal(&control) {
            tracing::debug!("Removal refused: {}", e);
            return Err(e);
        }
        let guard = InFlightGuard::new(&self.board, InFlight::Removal(control.clone()));

        let result = self
            .client
            .unregister(&control.activity, &control.email)
            .await;

        {
            let mut board = self.board.write().await;
            guard.settle();
            board.finish_removal(&control, result.is_ok());
        }

        match &result {
            Ok(()) => tracing::info!("Unregistered {} from {}", email, activity),
            Err(e) => {
                tracing::error!("Error unregistering {} from {}: {}", email, activity, e);
                self.alerter.alert(&removal_alert(e));
            }
        }
        result
    }

    /// Current markup of one card
    pub async fn card_html(&self, activity: &str) -> Option<String> {
        self.board
            .read()
            .await
            .card(activity)
            .map(render::render_card)
    }

    /// Cancel any pending hide and schedule a fresh one for `generation`
    async fn schedule_hide(&self, generation: u64) {
        let token = CancellationToken::new();
        if let Some(previous) = self.hide_timer.lock().await.replace(token.clone()) {
            previous.cancel();
        }

        let board = Arc::clone(&self.board);
        let delay = self.hide_after;
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    if board.write().await.status.hide_if_current(generation) {
                        tracing::debug!("Status message hidden");
                    }
                }
                _ = token.cancelled() => {
                    tracing::debug!("Status hide superseded");
                }
            }
        });
    }
}

/// An action whose request is outstanding
#[derive(Debug, Clone)]
enum InFlight {
    Signup(SignupForm),
    Removal(RemoveControl),
}

impl InFlight {
    /// Release the mark, leaving cards and counters as they were
    fn release(&self, board: &mut BoardView) {
        match self {
            InFlight::Signup(form) => board.finish_submit(form),
            InFlight::Removal(control) => board.finish_removal(control, false),
        }
    }
}

/// Releases an in-flight mark if the action is dropped before it settles
struct InFlightGuard {
    board: BoardHandle,
    action: Option<InFlight>,
}

impl InFlightGuard {
    fn new(board: &BoardHandle, action: InFlight) -> Self {
        Self {
            board: Arc::clone(board),
            action: Some(action),
        }
    }

    /// The action reached its settle step and clears its own mark
    fn settle(mut self) {
        self.action = None;
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let Some(action) = self.action.take() else {
            return;
        };
        tracing::warn!("{:?} abandoned before it settled, releasing it", action);

        if let Ok(mut board) = self.board.try_write() {
            action.release(&mut board);
            return;
        }
        let board = Arc::clone(&self.board);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    action.release(&mut *board.write().await);
                });
            }
            Err(_) => tracing::error!("No runtime to release {:?}", action),
        }
    }
}

/// Text shown in the status area after a failed signup
pub fn signup_failure_message(err: &BoardError) -> String {
    match err {
        BoardError::Api { .. } => err
            .server_detail()
            .unwrap_or(SIGNUP_FAILED_MESSAGE)
            .to_string(),
        _ => SIGNUP_UNREACHABLE_MESSAGE.to_string(),
    }
}

/// Text of the alert raised after a failed removal
pub fn removal_alert(err: &BoardError) -> String {
    match err {
        BoardError::Api { .. } => err
            .server_detail()
            .unwrap_or(REMOVE_FAILED_MESSAGE)
            .to_string(),
        _ => REMOVE_UNREACHABLE_MESSAGE.to_string(),
    }
}
