//! BDD step definitions for scripting the activities API

use std::time::Duration;

use cucumber::given;

use crate::world::{BoardWorld, Outcome};

fn split_emails(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect()
}

fn add_activity(world: &mut BoardWorld, name: String, capacity: i64, participants: Vec<String>) {
    world.backend.activities.lock().unwrap().push((
        name,
        serde_json::json!({
            "description": "Weekly meetup",
            "schedule": "Mondays, 3:30 PM - 5:00 PM",
            "max_participants": capacity,
            "participants": participants,
        }),
    ));
}

#[given(expr = "the backend lists {string} with capacity {int} and participants {string}")]
fn backend_lists_activity(world: &mut BoardWorld, name: String, capacity: i64, emails: String) {
    add_activity(world, name, capacity, split_emails(&emails));
}

#[given(expr = "the backend lists {string} with capacity {int} and no participants")]
fn backend_lists_empty_activity(world: &mut BoardWorld, name: String, capacity: i64) {
    add_activity(world, name, capacity, Vec::new());
}

#[given("the activity list request fails with a network error")]
fn list_unreachable(world: &mut BoardWorld) {
    *world.backend.list.lock().unwrap() = Outcome::Unreachable;
}

#[given(expr = "the activity list request fails with status {int}")]
fn list_rejected(world: &mut BoardWorld, status: u16) {
    *world.backend.list.lock().unwrap() = Outcome::Respond {
        status,
        body: r#"{"detail": "unavailable"}"#.to_string(),
    };
}

#[given(expr = "the backend accepts signups with message {string}")]
fn signup_accepted(world: &mut BoardWorld, message: String) {
    *world.backend.signup.lock().unwrap() = Outcome::Respond {
        status: 200,
        body: serde_json::json!({ "message": message }).to_string(),
    };
}

#[given(expr = "the backend rejects signups with status {int} and detail {string}")]
fn signup_rejected(world: &mut BoardWorld, status: u16, detail: String) {
    *world.backend.signup.lock().unwrap() = Outcome::Respond {
        status,
        body: serde_json::json!({ "detail": detail }).to_string(),
    };
}

#[given("the backend is unreachable for signups")]
fn signup_unreachable(world: &mut BoardWorld) {
    *world.backend.signup.lock().unwrap() = Outcome::Unreachable;
}

#[given("the backend never answers signups")]
fn signup_hangs(world: &mut BoardWorld) {
    *world.backend.signup.lock().unwrap() = Outcome::Hang;
}

#[given("the backend accepts removals")]
fn unregister_accepted(world: &mut BoardWorld) {
    *world.backend.unregister.lock().unwrap() = Outcome::Accept;
}

#[given(expr = "the backend rejects removals with status {int} and detail {string}")]
fn unregister_rejected(world: &mut BoardWorld, status: u16, detail: String) {
    *world.backend.unregister.lock().unwrap() = Outcome::Respond {
        status,
        body: serde_json::json!({ "detail": detail }).to_string(),
    };
}

#[given("the backend never answers removals")]
fn unregister_hangs(world: &mut BoardWorld) {
    *world.backend.unregister.lock().unwrap() = Outcome::Hang;
}

#[given("the backend is unreachable for removals")]
fn unregister_unreachable(world: &mut BoardWorld) {
    *world.backend.unregister.lock().unwrap() = Outcome::Unreachable;
}

#[given(expr = "status messages hide after {int} milliseconds")]
fn status_hide_after(world: &mut BoardWorld, millis: u64) {
    world.hide_after = Some(Duration::from_millis(millis));
}
