//! HTML projection of the view model
//!
//! Every function here is pure: same view in, same markup out. All text that
//! came from the server or the user goes through [`escape_html`].

use crate::escape::escape_html;
use crate::status::StatusMessage;
use crate::synchronizer::{REMOVE_UNREACHABLE_MESSAGE, SIGNUP_UNREACHABLE_MESSAGE};
use crate::view::{ActivityCard, BoardView, ListState, ParticipantRow};

pub const LOADING_MESSAGE: &str = "Loading activities...";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load activities. Please try again later.";
pub const EMPTY_PARTICIPANTS_MESSAGE: &str = "No participants yet";

/// Markup for one activity card, tagged with `data-activity`
pub fn render_card(card: &ActivityCard) -> String {
    let name = escape_html(&card.name);
    let participants = if card.participants.is_empty() {
        format!(r#"<p class="participants-empty">{EMPTY_PARTICIPANTS_MESSAGE}</p>"#)
    } else {
        let rows: String = card
            .participants
            .iter()
            .map(|row| render_participant_row(card, row))
            .collect();
        format!(r#"<ul class="participants-list">{rows}</ul>"#)
    };

    format!(
        r#"<div class="activity-card" data-activity="{name}">
<h4>{name}</h4>
<p>{description}</p>
<p><strong>Schedule:</strong> {schedule}</p>
{availability}
<div class="participants-section">
<h5>Participants <span class="participants-count">{count}</span></h5>
{participants}
</div>
</div>"#,
        name = name,
        description = escape_html(&card.description),
        schedule = escape_html(&card.schedule),
        availability = render_availability(card.spots_left),
        count = card.participant_count,
        participants = participants,
    )
}

pub fn render_availability(spots_left: i64) -> String {
    format!(r#"<p class="availability"><strong>Availability:</strong> {spots_left} spots left</p>"#)
}

fn render_participant_row(card: &ActivityCard, row: &ParticipantRow) -> String {
    let control = card.remove_control(&row.email);
    let email = escape_html(&control.email);
    let disabled = if row.pending_removal { " disabled" } else { "" };
    format!(
        r#"<li class="participant-item"><span class="participant-email">{email}</span> <button class="participant-remove" data-email="{email}" data-activity="{activity}" title="Remove participant"{disabled}>&#x2716;</button></li>"#,
        email = email,
        activity = escape_html(&control.activity),
        disabled = disabled,
    )
}

/// Contents of the activity list area
pub fn render_activity_list(board: &BoardView) -> String {
    match board.list {
        ListState::Loading => format!("<p>{LOADING_MESSAGE}</p>"),
        ListState::Failed => format!("<p>{LOAD_FAILED_MESSAGE}</p>"),
        ListState::Loaded => board.cards.iter().map(render_card).collect::<Vec<_>>().join("\n"),
    }
}

/// Options for the activity selector, placeholder first
pub fn render_options(board: &BoardView) -> String {
    let mut options = String::from(r#"<option value="">-- Select an activity --</option>"#);
    for name in &board.options {
        let escaped = escape_html(name);
        options.push_str(&format!(r#"<option value="{escaped}">{escaped}</option>"#));
    }
    options
}

/// The status area element
pub fn render_status(status: &StatusMessage) -> String {
    match status {
        StatusMessage::Hidden => r#"<div id="message" class="hidden"></div>"#.to_string(),
        StatusMessage::Visible { kind, text } => {
            format!(r#"<div id="message" class="{kind}">{}</div>"#, escape_html(text))
        }
    }
}

/// The full document served at `/`. Form fields start empty for every
/// visitor; `hide_after_ms` is the status delay the page's script uses.
pub fn render_page(board: &BoardView, hide_after_ms: u64) -> String {
    let unreachable_status = render_status(&StatusMessage::Visible {
        kind: crate::status::StatusKind::Error,
        text: SIGNUP_UNREACHABLE_MESSAGE.to_string(),
    });

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Mergington High School Activities</title>
    <style>
        body {{ font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem; }}
        .activity-card {{ border: 1px solid #dee2e6; border-radius: 0.25rem; padding: 0.75rem; margin-bottom: 0.75rem; }}
        .participants-list {{ list-style: none; padding-left: 0; }}
        .participant-remove {{ border: none; background: none; color: #721c24; cursor: pointer; }}
        .participant-remove:disabled {{ color: #adb5bd; cursor: wait; }}
        .success {{ color: #155724; background-color: #d4edda; padding: 0.5rem; }}
        .error {{ color: #721c24; background-color: #f8d7da; padding: 0.5rem; }}
        .hidden {{ display: none; }}
    </style>
    <script>
        const HIDE_AFTER_MS = {hide_after_ms};
        const UNREACHABLE_STATUS = '{unreachable_status}';
        const REMOVE_UNREACHABLE = '{remove_unreachable}';
        let hideTimer = null;
        function showStatus(html, hideAfterMs) {{
            document.getElementById('message').outerHTML = html;
            clearTimeout(hideTimer);
            hideTimer = setTimeout(() => {{
                document.getElementById('message').className = 'hidden';
            }}, hideAfterMs);
        }}
        function replaceCard(activity, html) {{
            const card = document.querySelector(`.activity-card[data-activity="${{CSS.escape(activity)}}"]`);
            if (card && html) card.outerHTML = html;
        }}
        document.addEventListener('DOMContentLoaded', () => {{
            const form = document.getElementById('signup-form');
            form.addEventListener('submit', async (event) => {{
                event.preventDefault();
                const button = form.querySelector('button[type="submit"]');
                button.disabled = true;
                try {{
                    const resp = await fetch('/api/signup', {{ method: 'POST', body: new URLSearchParams(new FormData(form)) }});
                    const json = await resp.json();
                    if (json.card_html) replaceCard(json.activity, json.card_html);
                    if (json.form) {{
                        form.elements.email.value = json.form.email;
                        form.elements.activity.value = json.form.activity;
                    }}
                    showStatus(json.status_html || UNREACHABLE_STATUS, json.hide_after_ms || HIDE_AFTER_MS);
                }} catch (err) {{
                    console.error('Error signing up:', err);
                    showStatus(UNREACHABLE_STATUS, HIDE_AFTER_MS);
                }} finally {{
                    button.disabled = false;
                }}
            }});
            document.getElementById('activities-list').addEventListener('click', async (event) => {{
                const btn = event.target.closest('.participant-remove');
                if (!btn || btn.disabled) return;
                btn.disabled = true;
                const body = new URLSearchParams({{ activity: btn.dataset.activity, email: btn.dataset.email }});
                try {{
                    const resp = await fetch('/api/remove', {{ method: 'POST', body }});
                    const json = await resp.json();
                    if (resp.ok) {{
                        replaceCard(btn.dataset.activity, json.card_html);
                    }} else {{
                        btn.disabled = false;
                        alert(json.alert);
                    }}
                }} catch (err) {{
                    console.error('Error removing participant:', err);
                    btn.disabled = false;
                    alert(REMOVE_UNREACHABLE);
                }}
            }});
        }});
    </script>
</head>
<body>
    <header>
        <h1>Mergington High School</h1>
        <h2>Extracurricular Activities</h2>
    </header>
    <main>
        <section id="activities-container">
            <h3>Available Activities</h3>
            <div id="activities-list">
{list}
            </div>
        </section>
        <section id="signup-container">
            <h3>Sign Up for an Activity</h3>
            <form id="signup-form">
                <label for="email">Student Email:</label>
                <input type="email" id="email" name="email" required placeholder="your-email@mergington.edu">
                <label for="activity">Select Activity:</label>
                <select id="activity" name="activity" required>{options}</select>
                <button type="submit">Sign Up</button>
            </form>
            {status}
        </section>
    </main>
</body>
</html>"#,
        hide_after_ms = hide_after_ms,
        unreachable_status = unreachable_status,
        remove_unreachable = REMOVE_UNREACHABLE_MESSAGE,
        list = render_activity_list(board),
        options = render_options(board),
        status = render_status(&board.status.message),
    )
}
