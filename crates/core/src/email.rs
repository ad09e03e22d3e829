//! Notification composition.
//!
//! The body is built incrementally: the base summary, then an optional
//! new-device note, then an optional warning. Fragments are HTML.

use serde::{Deserialize, Serialize};

use crate::events::UploadEvent;

/// Email summarising one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailReport {
    pub subject: String,
    pub body_html: String,
    #[serde(default)]
    warned: bool,
}

impl EmailReport {
    pub fn new(subject: impl Into<String>, body_html: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body_html: body_html.into(),
            warned: false,
        }
    }

    /// Base report for an event. `row_count` is `None` when the object was
    /// never loaded.
    pub fn for_event(event: &UploadEvent, row_count: Option<usize>) -> Self {
        let rows = row_count
            .map(|n| n.to_string())
            .unwrap_or_else(|| "unavailable".to_string());

        let body_html = format!(
            "Email notification regarding {action} event.<br>\
             Bucket : {bucket}<br>\
             File Key: {key}.<br>\
             Number of lines: {rows}.<br>",
            action = escape_html(&event.action),
            bucket = escape_html(&event.bucket_name),
            key = escape_html(&event.object_key),
            rows = rows,
        );

        Self::new(
            format!("{}. Event from bucket: {}", event.action, event.bucket_name),
            body_html,
        )
    }

    pub fn note_new_device(&mut self, device: &str) {
        self.body_html
            .push_str(&format!("New Device: {}.<br>", escape_html(device)));
    }

    pub fn warn(&mut self, error: &str) {
        self.warned = true;
        self.body_html.push_str(&format!(
            "WARNING!: error appeared processing the file: {}<br>",
            escape_html(error)
        ));
    }

    pub fn has_warning(&self) -> bool {
        self.warned
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
