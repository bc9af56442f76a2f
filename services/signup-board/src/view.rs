//! View model: the board as the browser sees it
//!
//! Cards are built once from the fetched catalog. After that the only
//! structural changes are adding and removing participant rows, and each of
//! those updates the row list, the count badge and the availability counter
//! together.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::activity::{ActivityCatalog, ActivityDetails};
use crate::status::StatusArea;
use crate::BoardError;

/// State of the activity list area
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListState {
    #[default]
    Loading,
    Loaded,
    Failed,
}

/// What a participant's removal control carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveControl {
    pub activity: String,
    pub email: String,
}

/// One participant row inside a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRow {
    pub email: String,
    /// Set while an unregister request for this row is outstanding
    pub pending_removal: bool,
}

/// One activity card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityCard {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub max_participants: i64,
    pub participants: Vec<ParticipantRow>,
    pub participant_count: usize,
    pub spots_left: i64,
}

impl ActivityCard {
    pub fn new(name: &str, details: &ActivityDetails) -> Self {
        let mut participants: Vec<ParticipantRow> = Vec::with_capacity(details.participants.len());
        for email in &details.participants {
            if participants.iter().any(|p| &p.email == email) {
                tracing::warn!("Duplicate participant {} in {}, showing once", email, name);
                continue;
            }
            participants.push(ParticipantRow {
                email: email.clone(),
                pending_removal: false,
            });
        }

        Self {
            name: name.to_string(),
            description: details.description.clone(),
            schedule: details.schedule.clone(),
            max_participants: details.max_participants,
            participant_count: participants.len(),
            spots_left: details.max_participants - participants.len() as i64,
            participants,
        }
    }

    pub fn remove_control(&self, email: &str) -> RemoveControl {
        RemoveControl {
            activity: self.name.clone(),
            email: email.to_string(),
        }
    }

    pub fn row(&self, email: &str) -> Option<&ParticipantRow> {
        self.participants.iter().find(|p| p.email == email)
    }

    fn row_mut(&mut self, email: &str) -> Option<&mut ParticipantRow> {
        self.participants.iter_mut().find(|p| p.email == email)
    }

    /// Append a row after a successful signup. Returns false if the email is
    /// already listed, in which case nothing changes.
    pub fn add_participant(&mut self, email: &str) -> bool {
        if self.row(email).is_some() {
            return false;
        }
        self.participants.push(ParticipantRow {
            email: email.to_string(),
            pending_removal: false,
        });
        self.participant_count += 1;
        self.spots_left = (self.spots_left - 1).max(0);
        true
    }

    /// Drop the row after a successful unregister. Returns false if the row
    /// was already gone, in which case nothing changes.
    pub fn remove_participant(&mut self, email: &str) -> bool {
        let Some(index) = self.participants.iter().position(|p| p.email == email) else {
            return false;
        };
        self.participants.remove(index);
        self.participant_count = self.participant_count.saturating_sub(1);
        self.spots_left += 1;
        true
    }
}

/// The fields of one signup submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupForm {
    pub email: String,
    pub activity: String,
}

impl SignupForm {
    pub fn new(email: &str, activity: &str) -> Self {
        Self {
            email: email.to_string(),
            activity: activity.to_string(),
        }
    }

    pub fn reset(&mut self) {
        self.email.clear();
        self.activity.clear();
    }
}

/// The whole board
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardView {
    pub list: ListState,
    pub cards: Vec<ActivityCard>,
    /// Activity names offered in the selector, in card order
    pub options: Vec<String>,
    /// Submissions whose signup request is outstanding
    #[serde(skip)]
    pub pending_signups: Vec<SignupForm>,
    pub status: StatusArea,
}

impl BoardView {
    /// Replace the placeholder with one card and one option per activity
    pub fn load(&mut self, catalog: &ActivityCatalog) {
        self.cards.clear();
        self.options.clear();
        for (name, details) in &catalog.activities {
            self.cards.push(ActivityCard::new(name, details));
            self.options.push(name.clone());
        }
        self.list = ListState::Loaded;
    }

    /// Replace the list area with the failure message
    pub fn fail_load(&mut self) {
        self.cards.clear();
        self.options.clear();
        self.list = ListState::Failed;
    }

    pub fn card(&self, activity: &str) -> Option<&ActivityCard> {
        self.cards.iter().find(|c| c.name == activity)
    }

    pub fn card_mut(&mut self, activity: &str) -> Option<&mut ActivityCard> {
        self.cards.iter_mut().find(|c| c.name == activity)
    }

    /// Mark a row's removal as in flight. Fails if the row is unknown or a
    /// removal for it is already outstanding.
    pub fn begin_removal(&mut self, control: &RemoveControl) -> crate::Result<()> {
        let card = self
            .card_mut(&control.activity)
            .ok_or_else(|| BoardError::UnknownActivity(control.activity.clone()))?;
        let row = card
            .row_mut(&control.email)
            .ok_or_else(|| BoardError::UnknownParticipant {
                activity: control.activity.clone(),
                email: control.email.clone(),
            })?;
        if row.pending_removal {
            return Err(BoardError::Busy(format!(
                "removal of {} from {}",
                control.email, control.activity
            )));
        }
        row.pending_removal = true;
        Ok(())
    }

    /// Settle an in-flight removal. On success the row goes away along with
    /// its counters; otherwise the control is re-enabled.
    pub fn finish_removal(&mut self, control: &RemoveControl, removed: bool) {
        let Some(card) = self.card_mut(&control.activity) else {
            return;
        };
        if removed {
            if !card.remove_participant(&control.email) {
                tracing::debug!(
                    "Row for {} in {} already gone",
                    control.email,
                    control.activity
                );
            }
        } else if let Some(row) = card.row_mut(&control.email) {
            row.pending_removal = false;
        }
    }

    /// Mark a submission as in flight. Fails if the same email is already
    /// being signed up for the same activity.
    pub fn begin_submit(&mut self, form: &SignupForm) -> crate::Result<()> {
        if self.pending_signups.contains(form) {
            return Err(BoardError::Busy(format!(
                "signup of {} for {}",
                form.email, form.activity
            )));
        }
        self.pending_signups.push(form.clone());
        Ok(())
    }

    /// Settle an in-flight submission
    pub fn finish_submit(&mut self, form: &SignupForm) {
        self.pending_signups.retain(|pending| pending != form);
    }

    pub fn is_submitting(&self, form: &SignupForm) -> bool {
        self.pending_signups.contains(form)
    }
}

/// Thread-safe shared view handle
pub type BoardHandle = Arc<RwLock<BoardView>>;

pub fn new_board_handle() -> BoardHandle {
    Arc::new(RwLock::new(BoardView::default()))
}
