//! # Public Projections
//!
//! Shapes handed to clients. Only `ReplyReceipt` carries a password, and only
//! because it acknowledges the reply that was just created.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Reply, Thread};

/// Maximum number of threads returned for a board listing.
pub const THREAD_LIST_LIMIT: usize = 10;

/// Number of trailing replies previewed per thread in a board listing.
pub const REPLY_PREVIEW_LIMIT: usize = 3;

/// Reply as shown in listings and thread pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub text: String,
    pub created_on: DateTime<Utc>,
}

/// Reply as echoed back after posting, credential included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyReceipt {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub text: String,
    pub created_on: DateTime<Utc>,
    pub delete_password: String,
    pub reported: bool,
}

/// Thread header plus replies of type `R`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadProjection<R> {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub text: String,
    pub created_on: DateTime<Utc>,
    pub bumped_on: DateTime<Utc>,
    pub replies: Vec<R>,
}

/// Board index entry: the last `REPLY_PREVIEW_LIMIT` replies only.
pub type ThreadSummary = ThreadProjection<ReplyView>;

/// Thread page: every reply, no credentials.
pub type ThreadView = ThreadProjection<ReplyView>;

/// Reply-post acknowledgement: every reply with its credential.
pub type ThreadWithReplies = ThreadProjection<ReplyReceipt>;

impl From<&Reply> for ReplyView {
    fn from(reply: &Reply) -> Self {
        Self {
            id: reply.id,
            text: reply.text.clone(),
            created_on: reply.created_on,
        }
    }
}

impl From<&Reply> for ReplyReceipt {
    fn from(reply: &Reply) -> Self {
        Self {
            id: reply.id,
            text: reply.text.clone(),
            created_on: reply.created_on,
            delete_password: reply.delete_password.clone(),
            reported: reply.reported,
        }
    }
}

impl<R> ThreadProjection<R>
where
    R: for<'a> From<&'a Reply>,
{
    fn from_replies<'a>(thread: &Thread, replies: impl Iterator<Item = &'a Reply>) -> Self {
        Self {
            id: thread.id,
            text: thread.text.clone(),
            created_on: thread.created_on,
            bumped_on: thread.bumped_on,
            replies: replies.map(R::from).collect(),
        }
    }

    /// Projects every reply, oldest first.
    pub fn full(thread: &Thread) -> Self {
        Self::from_replies(thread, thread.replies.iter())
    }
}

impl ThreadProjection<ReplyView> {
    /// Projects the most recent `REPLY_PREVIEW_LIMIT` replies, still oldest first.
    pub fn preview(thread: &Thread) -> Self {
        let skip = thread.replies.len().saturating_sub(REPLY_PREVIEW_LIMIT);
        Self::from_replies(thread, thread.replies[skip..].iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn thread_with_replies(n: usize) -> Thread {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut thread = Thread::new("b".into(), "op".into(), "pw".into(), t0);
        for i in 0..n {
            let at = t0 + Duration::seconds(i as i64 + 1);
            thread.push_reply(format!("reply {i}"), format!("pw{i}"), at);
        }
        thread
    }

    #[test]
    fn preview_keeps_last_three_in_order() {
        let thread = thread_with_replies(5);
        let summary = ThreadSummary::preview(&thread);
        let texts: Vec<_> = summary.replies.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["reply 2", "reply 3", "reply 4"]);
    }

    #[test]
    fn preview_with_few_replies_keeps_all() {
        let thread = thread_with_replies(2);
        assert_eq!(ThreadSummary::preview(&thread).replies.len(), 2);
        assert!(ThreadSummary::preview(&thread_with_replies(0)).replies.is_empty());
    }

    #[test]
    fn public_views_hide_passwords() {
        let thread = thread_with_replies(4);
        let json = serde_json::to_value(ThreadView::full(&thread)).unwrap();
        assert!(json.get("delete_password").is_none());
        assert!(json.get("reported").is_none());
        for reply in json["replies"].as_array().unwrap() {
            assert!(reply.get("delete_password").is_none());
            assert!(reply.get("reported").is_none());
        }
        assert_eq!(json["replies"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn receipt_carries_reply_credentials() {
        let thread = thread_with_replies(1);
        let json = serde_json::to_value(ThreadWithReplies::full(&thread)).unwrap();
        assert_eq!(json["replies"][0]["delete_password"], "pw0");
        assert_eq!(json["replies"][0]["reported"], false);
        assert_eq!(json["_id"], thread.id.to_string());
    }
}
