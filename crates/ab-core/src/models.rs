//! # Domain Models
//!
//! These structs represent the documents persisted by a `ThreadStore`.
//! A Thread is the unit of storage; its replies live inside it.
//! We use UUID v7 for time-ordered, globally unique identification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Text written over a reply when its author deletes it.
pub const REDACTED_TEXT: &str = "[deleted]";

/// A top-level post on a board, together with every reply made to it.
///
/// Serialized as-is this is the full document, password included. Only the
/// thread creation endpoint hands it out in this shape; everything else goes
/// through a projection in `views`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Board tag (e.g. "b" for /b/). Fixed at creation.
    pub board: String,
    pub text: String,
    pub created_on: DateTime<Utc>,
    /// The timestamp used for sorting threads by activity
    pub bumped_on: DateTime<Utc>,
    pub reported: bool,
    pub delete_password: String,
    /// Chronological; only ever appended to.
    pub replies: Vec<Reply>,
}

/// A child post. Has no existence outside its thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub text: String,
    pub created_on: DateTime<Utc>,
    pub reported: bool,
    pub delete_password: String,
}

impl Thread {
    /// Builds a fresh thread with no replies, bumped at its creation instant.
    pub fn new(board: String, text: String, delete_password: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            board,
            text,
            created_on: now,
            bumped_on: now,
            reported: false,
            delete_password,
            replies: Vec::new(),
        }
    }

    /// Appends a reply and bumps the thread using the same instant.
    pub fn push_reply(
        &mut self,
        text: String,
        delete_password: String,
        now: DateTime<Utc>,
    ) -> &Reply {
        self.replies.push(Reply {
            id: Uuid::now_v7(),
            text,
            created_on: now,
            reported: false,
            delete_password,
        });
        self.bumped_on = now;
        // Just pushed, so the vector is non-empty.
        &self.replies[self.replies.len() - 1]
    }

    pub fn reply_mut(&mut self, reply_id: Uuid) -> Option<&mut Reply> {
        self.replies.iter_mut().find(|r| r.id == reply_id)
    }

    pub fn password_matches(&self, candidate: &str) -> bool {
        self.delete_password == candidate
    }
}

impl Reply {
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.delete_password == candidate
    }

    /// Soft delete: the slot, id and timestamps stay, only the text goes.
    pub fn redact(&mut self) {
        self.text = REDACTED_TEXT.to_string();
    }
}
