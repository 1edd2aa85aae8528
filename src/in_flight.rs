//! # Feature: In-Flight Gate
//!
//! At most one generation per session at a time. A second request while the
//! first is outstanding is refused rather than queued. The slot is released
//! when the returned guard drops, including when a client disconnects and its
//! handler future is dropped.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release with per-session DashMap slots

use dashmap::DashMap;
use log::debug;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone, Default)]
pub struct InFlightGate {
    active: Arc<DashMap<String, Instant>>,
}

/// Holds a session's slot until dropped.
pub struct InFlightGuard {
    active: Arc<DashMap<String, Instant>>,
    session_id: String,
}

impl InFlightGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the slot for `session_id`, or returns `None` if it is taken.
    pub fn try_acquire(&self, session_id: &str) -> Option<InFlightGuard> {
        match self.active.entry(session_id.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => None,
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(Instant::now());
                Some(InFlightGuard {
                    active: self.active.clone(),
                    session_id: session_id.to_string(),
                })
            }
        }
    }

    pub fn is_busy(&self, session_id: &str) -> bool {
        self.active.contains_key(session_id)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

impl InFlightGuard {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Some((_, started)) = self.active.remove(&self.session_id) {
            debug!("Released generation slot for {} after {:?}", self.session_id, started.elapsed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_refused() {
        let gate = InFlightGate::new();

        let guard = gate.try_acquire("session1");
        assert!(guard.is_some());
        assert!(gate.try_acquire("session1").is_none());
        assert!(gate.is_busy("session1"));
    }

    #[test]
    fn test_slot_released_on_drop() {
        let gate = InFlightGate::new();

        let guard = gate.try_acquire("session1").unwrap();
        assert_eq!(guard.session_id(), "session1");
        drop(guard);

        assert!(!gate.is_busy("session1"));
        assert!(gate.try_acquire("session1").is_some());
    }

    #[test]
    fn test_sessions_are_independent() {
        let gate = InFlightGate::new();

        let _first = gate.try_acquire("session1").unwrap();
        let _second = gate.try_acquire("session2").unwrap();
        assert_eq!(gate.active_count(), 2);
    }

    #[tokio::test]
    async fn test_released_when_task_is_aborted() {
        let gate = InFlightGate::new();
        let task_gate = gate.clone();

        let handle = tokio::spawn(async move {
            let _guard = task_gate.try_acquire("session1").unwrap();
            tokio::time::sleep(std::time::Duration::from_secs(10)).await;
        });

        while !gate.is_busy("session1") {
            tokio::task::yield_now().await;
        }
        handle.abort();
        let _ = handle.await;

        assert!(!gate.is_busy("session1"));
    }
}
