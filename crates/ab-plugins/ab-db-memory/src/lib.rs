//! # ab-db-memory
//!
//! In-process implementation of `ThreadStore`. Nothing survives a restart;
//! used by the test-suite and for throwaway deployments.

use ab_core::models::Thread;
use ab_core::traits::ThreadStore;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryThreadStore {
    threads: DashMap<Uuid, Thread>,
}

impl MemoryThreadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }
}

#[async_trait]
impl ThreadStore for MemoryThreadStore {
    async fn create(&self, thread: &Thread) -> anyhow::Result<()> {
        match self.threads.entry(thread.id) {
            Entry::Occupied(_) => anyhow::bail!("duplicate thread id {}", thread.id),
            Entry::Vacant(slot) => {
                slot.insert(thread.clone());
                Ok(())
            }
        }
    }

    async fn find_by_board(&self, board: &str, limit: usize) -> anyhow::Result<Vec<Thread>> {
        let mut threads: Vec<Thread> = self
            .threads
            .iter()
            .filter(|entry| entry.board == board)
            .map(|entry| entry.value().clone())
            .collect();

        // v7 ids are time-ordered, so id breaks bump ties newest-first.
        threads.sort_by(|a, b| b.bumped_on.cmp(&a.bumped_on).then_with(|| b.id.cmp(&a.id)));
        threads.truncate(limit);
        Ok(threads)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Thread>> {
        Ok(self.threads.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_id_and_board(
        &self,
        id: Uuid,
        board: &str,
    ) -> anyhow::Result<Option<Thread>> {
        Ok(self
            .threads
            .get(&id)
            .filter(|entry| entry.board == board)
            .map(|entry| entry.value().clone()))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.threads.remove(&id).is_some())
    }

    async fn save(&self, thread: &Thread) -> anyhow::Result<bool> {
        match self.threads.get_mut(&thread.id) {
            Some(mut stored) => {
                *stored = thread.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
