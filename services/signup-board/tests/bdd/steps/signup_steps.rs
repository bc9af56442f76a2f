//! BDD step definitions for signup submissions and the status area

use std::time::Duration;

use cucumber::{then, when};
use signup_board::render::render_status;
use signup_board::status::StatusKind;
use signup_board::view::SignupForm;

use crate::world::BoardWorld;

fn parse_kind(s: &str) -> StatusKind {
    match s {
        "success" => StatusKind::Success,
        "error" => StatusKind::Error,
        other => panic!("Unknown status kind: {}", other),
    }
}

#[when(expr = "{string} signs up for {string}")]
async fn sign_up(world: &mut BoardWorld, email: String, activity: String) {
    match world.sync().submit_signup(&email, &activity).await {
        Ok(outcome) => {
            world.last_status = Some(outcome.status);
            world.last_form = Some(outcome.form);
        }
        Err(e) => world.last_error = Some(e),
    }
}

#[when(expr = "a signup of {string} for {string} is already in flight")]
async fn signup_in_flight(world: &mut BoardWorld, email: String, activity: String) {
    let board = world.sync().board().clone();
    board
        .write()
        .await
        .begin_submit(&SignupForm::new(&email, &activity))
        .expect("submission already pending");
}

#[when(expr = "{string} gives up on a signup for {string} before the backend answers")]
async fn signup_abandoned(world: &mut BoardWorld, email: String, activity: String) {
    let abandoned = tokio::time::timeout(
        Duration::from_millis(20),
        world.sync().submit_signup(&email, &activity),
    )
    .await;
    assert!(abandoned.is_err(), "signup should still have been waiting");
}

#[when(expr = "{int} milliseconds pass")]
async fn time_passes(_world: &mut BoardWorld, millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}

#[then(expr = "the status area should show {string} as {word}")]
async fn status_shows(world: &mut BoardWorld, text: String, kind: String) {
    let board = world.board().await;
    let message = &board.status.message;
    assert_eq!(message.text(), Some(text.as_str()));
    assert_eq!(message.kind(), Some(parse_kind(&kind)));
    assert!(render_status(message).contains(&format!(r#"class="{}""#, kind)));
}

#[then("the status area should be hidden")]
async fn status_hidden(world: &mut BoardWorld) {
    let board = world.board().await;
    assert!(!board.status.message.is_visible());
    assert_eq!(
        render_status(&board.status.message),
        r#"<div id="message" class="hidden"></div>"#
    );
}

#[then("the signup form should be cleared")]
fn form_cleared(world: &mut BoardWorld) {
    let form = world.last_form.as_ref().expect("no signup settled");
    assert!(form.email.is_empty());
    assert!(form.activity.is_empty());
}

#[then(expr = "the signup form should still hold {string} for {string}")]
fn form_kept(world: &mut BoardWorld, email: String, activity: String) {
    let form = world.last_form.as_ref().expect("no signup settled");
    assert_eq!(form.email, email);
    assert_eq!(form.activity, activity);
}

#[then("no signup should be pending")]
async fn no_signup_pending(world: &mut BoardWorld) {
    assert!(world.board().await.pending_signups.is_empty());
}

#[then("the submission should be refused as busy")]
fn submission_busy(world: &mut BoardWorld) {
    match world.last_error.as_ref() {
        Some(signup_board::BoardError::Busy(_)) => {}
        other => panic!("expected Busy, got {:?}", other),
    }
}

#[then(expr = "the backend should have received {int} signup request(s)")]
fn signup_requests(world: &mut BoardWorld, count: usize) {
    assert_eq!(world.backend.posts_to("/signup?"), count);
}
