//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

use crate::models::Thread;

/// Document persistence contract for threads (replies are embedded).
///
/// Implementations only need per-call consistency; the service does
/// find-then-save for reply mutations and accepts the lost-update window.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ThreadStore: Send + Sync {
    /// Inserts a new thread document.
    async fn create(&self, thread: &Thread) -> anyhow::Result<()>;

    /// Threads of a board, most recently bumped first, at most `limit`.
    async fn find_by_board(&self, board: &str, limit: usize) -> anyhow::Result<Vec<Thread>>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Thread>>;

    /// Like `find_by_id`, but a thread on another board counts as absent.
    async fn find_by_id_and_board(&self, id: Uuid, board: &str) -> anyhow::Result<Option<Thread>>;

    /// Removes the document. Returns whether anything was removed.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;

    /// Overwrites the stored document with `thread`. Returns `false` when the
    /// thread no longer exists; a deleted thread is never written back.
    async fn save(&self, thread: &Thread) -> anyhow::Result<bool>;
}

/// Wall-clock source.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Real time, truncated to milliseconds so that timestamps survive every
/// store and JSON round-trip unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }
}
