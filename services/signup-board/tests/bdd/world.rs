//! BDD test world for the signup board

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cucumber::World;
use signup_board::alert::Alerter;
use signup_board::api::SignupClient;
use signup_board::io::{HttpClient, HttpResponse};
use signup_board::status::StatusMessage;
use signup_board::view::{new_board_handle, ActivityCard, BoardView, SignupForm};
use signup_board::{BoardError, ViewSynchronizer};

/// How the scripted backend answers one kind of request
#[derive(Debug, Clone, Default)]
pub enum Outcome {
    #[default]
    Accept,
    Respond {
        status: u16,
        body: String,
    },
    Unreachable,
    /// Never answers
    Hang,
}

impl Outcome {
    fn resolve(&self, success_body: String) -> signup_board::Result<HttpResponse> {
        match self {
            Outcome::Accept => Ok(HttpResponse {
                status: 200,
                body: success_body,
            }),
            Outcome::Respond { status, body } => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            Outcome::Unreachable | Outcome::Hang => {
                Err(BoardError::Http("connection refused".to_string()))
            }
        }
    }
}

/// In-process stand-in for the activities API
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    pub activities: Mutex<Vec<(String, serde_json::Value)>>,
    pub list: Mutex<Outcome>,
    pub signup: Mutex<Outcome>,
    pub unregister: Mutex<Outcome>,
    pub requests: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    /// The catalog as a JSON object, keys in insertion order
    fn catalog_json(&self) -> String {
        let entries: Vec<String> = self
            .activities
            .lock()
            .unwrap()
            .iter()
            .map(|(name, details)| {
                format!("{}: {}", serde_json::to_string(name).unwrap(), details)
            })
            .collect();
        format!("{{{}}}", entries.join(", "))
    }

    pub fn posts_to(&self, action: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|url| url.starts_with("POST") && url.contains(action))
            .count()
    }
}

#[async_trait]
impl HttpClient for ScriptedBackend {
    async fn get(&self, url: &str) -> signup_board::Result<HttpResponse> {
        self.requests.lock().unwrap().push(format!("GET {}", url));
        let outcome = self.list.lock().unwrap().clone();
        outcome.resolve(self.catalog_json())
    }

    async fn post(&self, url: &str) -> signup_board::Result<HttpResponse> {
        self.requests.lock().unwrap().push(format!("POST {}", url));
        let outcome = if url.contains("/signup?") {
            self.signup.lock().unwrap().clone()
        } else {
            self.unregister.lock().unwrap().clone()
        };
        if matches!(outcome, Outcome::Hang) {
            return std::future::pending().await;
        }
        outcome.resolve(r#"{"message": "ok"}"#.to_string())
    }
}

/// Alerter that remembers every alert
#[derive(Debug, Default)]
pub struct RecordingAlerter {
    pub alerts: Mutex<Vec<String>>,
}

impl Alerter for RecordingAlerter {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

#[derive(Debug, Default, World)]
pub struct BoardWorld {
    pub backend: Arc<ScriptedBackend>,
    pub alerter: Arc<RecordingAlerter>,
    pub hide_after: Option<Duration>,
    pub sync: Option<ViewSynchronizer>,
    pub last_status: Option<StatusMessage>,
    pub last_form: Option<SignupForm>,
    pub last_error: Option<BoardError>,
}

impl BoardWorld {
    pub fn build_sync(&mut self) -> &ViewSynchronizer {
        let http: Arc<dyn HttpClient> = self.backend.clone();
        let alerter: Arc<dyn Alerter> = self.alerter.clone();
        let hide_after = self.hide_after.unwrap_or(Duration::from_secs(5));
        self.sync.get_or_insert_with(|| {
            ViewSynchronizer::new(
                SignupClient::new("http://backend.test", http),
                new_board_handle(),
                alerter,
                hide_after,
            )
        })
    }

    pub fn sync(&self) -> &ViewSynchronizer {
        self.sync.as_ref().expect("board not initialized")
    }

    pub async fn board(&self) -> BoardView {
        self.sync().board().read().await.clone()
    }

    pub async fn card(&self, activity: &str) -> ActivityCard {
        self.board()
            .await
            .card(activity)
            .cloned()
            .unwrap_or_else(|| panic!("no card for {}", activity))
    }
}
