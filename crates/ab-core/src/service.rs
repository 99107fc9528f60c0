//! # BoardService
//!
//! Thread and reply lifecycle. Every operation is an independent
//! read-modify-write against the injected `ThreadStore`.

use std::sync::Arc;

use log::{debug, info};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::Thread;
use crate::outcome::{Found, Outcome};
use crate::traits::{Clock, SystemClock, ThreadStore};
use crate::views::{ThreadSummary, ThreadView, ThreadWithReplies, THREAD_LIST_LIMIT};

#[derive(Clone)]
pub struct BoardService {
    store: Arc<dyn ThreadStore>,
    clock: Arc<dyn Clock>,
}

/// Client-supplied ids are free-form strings; anything that isn't one of ours
/// simply doesn't exist.
fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}

impl BoardService {
    pub fn new(store: Arc<dyn ThreadStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn ThreadStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Starts a thread. The returned document includes the delete password;
    /// it is the poster's only copy of it.
    pub async fn create_thread(
        &self,
        board: &str,
        text: &str,
        delete_password: &str,
    ) -> Result<Thread> {
        require("board", board)?;
        require("text", text)?;
        require("delete_password", delete_password)?;

        let thread = Thread::new(
            board.to_string(),
            text.to_string(),
            delete_password.to_string(),
            self.clock.now(),
        );
        self.store.create(&thread).await?;

        info!("Thread {} created on /{}/", thread.id, board);
        Ok(thread)
    }

    /// Board index: newest-bumped threads with a short tail of replies each.
    pub async fn list_threads(&self, board: &str) -> Result<Vec<ThreadSummary>> {
        let threads = self.store.find_by_board(board, THREAD_LIST_LIMIT).await?;
        Ok(threads
            .iter()
            .take(THREAD_LIST_LIMIT)
            .map(ThreadSummary::preview)
            .collect())
    }

    /// Flags a thread. No password; the board is not checked.
    pub async fn report_thread(&self, thread_id: &str) -> Result<Outcome> {
        let Some(mut thread) = self.find(thread_id).await? else {
            return Ok(Outcome::ThreadNotFound);
        };

        thread.reported = true;
        if !self.store.save(&thread).await? {
            return Ok(Outcome::ThreadNotFound);
        }

        info!("Thread {} reported", thread.id);
        Ok(Outcome::Reported)
    }

    /// Removes a thread and all of its replies. The board is not checked.
    pub async fn delete_thread(&self, thread_id: &str, delete_password: &str) -> Result<Outcome> {
        let Some(thread) = self.find(thread_id).await? else {
            return Ok(Outcome::ThreadNotFound);
        };

        if !thread.password_matches(delete_password) {
            debug!("Rejected delete of thread {}: password mismatch", thread.id);
            return Ok(Outcome::IncorrectPassword);
        }

        // Someone else may have deleted it between find and delete.
        if !self.store.delete(thread.id).await? {
            return Ok(Outcome::ThreadNotFound);
        }

        info!("Thread {} deleted", thread.id);
        Ok(Outcome::Success)
    }

    /// Appends a reply and bumps the thread to the reply's timestamp.
    pub async fn create_reply(
        &self,
        board: &str,
        thread_id: &str,
        text: &str,
        delete_password: &str,
    ) -> Result<Found<ThreadWithReplies>> {
        let Some(mut thread) = self.find_on_board(thread_id, board).await? else {
            return Ok(Found::ThreadNotFound);
        };

        require("text", text)?;
        require("delete_password", delete_password)?;

        let now = self.clock.now();
        let reply_id = thread
            .push_reply(text.to_string(), delete_password.to_string(), now)
            .id;
        if !self.store.save(&thread).await? {
            return Ok(Found::ThreadNotFound);
        }

        info!("Reply {} added to thread {}", reply_id, thread.id);
        Ok(Found::Found(ThreadWithReplies::full(&thread)))
    }

    /// Thread page with every reply. Looked up by id alone.
    pub async fn get_thread_with_replies(&self, thread_id: &str) -> Result<Found<ThreadView>> {
        let thread = self.find(thread_id).await?;
        Ok(thread.as_ref().map(ThreadView::full).into())
    }

    /// Flags a reply. No password.
    pub async fn report_reply(
        &self,
        board: &str,
        thread_id: &str,
        reply_id: &str,
    ) -> Result<Outcome> {
        let Some(mut thread) = self.find_on_board(thread_id, board).await? else {
            return Ok(Outcome::ThreadNotFound);
        };
        let Some(reply) = parse_id(reply_id).and_then(|id| thread.reply_mut(id)) else {
            return Ok(Outcome::ReplyNotFound);
        };

        reply.reported = true;
        let reply_id = reply.id;
        if !self.store.save(&thread).await? {
            return Ok(Outcome::ThreadNotFound);
        }

        info!("Reply {} in thread {} reported", reply_id, thread.id);
        Ok(Outcome::Reported)
    }

    /// Redacts a reply's text. The reply keeps its slot, id and flags.
    pub async fn delete_reply(
        &self,
        board: &str,
        thread_id: &str,
        reply_id: &str,
        delete_password: &str,
    ) -> Result<Outcome> {
        let Some(mut thread) = self.find_on_board(thread_id, board).await? else {
            return Ok(Outcome::ThreadNotFound);
        };
        let Some(reply) = parse_id(reply_id).and_then(|id| thread.reply_mut(id)) else {
            return Ok(Outcome::ReplyNotFound);
        };

        if !reply.password_matches(delete_password) {
            debug!("Rejected delete of reply {}: password mismatch", reply.id);
            return Ok(Outcome::IncorrectPassword);
        }

        reply.redact();
        let reply_id = reply.id;
        if !self.store.save(&thread).await? {
            return Ok(Outcome::ThreadNotFound);
        }

        info!("Reply {} in thread {} redacted", reply_id, thread.id);
        Ok(Outcome::Success)
    }

    async fn find(&self, thread_id: &str) -> Result<Option<Thread>> {
        match parse_id(thread_id) {
            Some(id) => Ok(self.store.find_by_id(id).await?),
            None => Ok(None),
        }
    }

    async fn find_on_board(&self, thread_id: &str, board: &str) -> Result<Option<Thread>> {
        match parse_id(thread_id) {
            Some(id) => Ok(self.store.find_by_id_and_board(id, board).await?),
            None => Ok(None),
        }
    }
}
