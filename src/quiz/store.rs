// src/quiz/store.rs

use std::{
    sync::{Arc, Mutex, MutexGuard, TryLockError},
    time::Duration,
};

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::{error::AppError, models::session::Session};

type SessionHandle = Arc<Mutex<Session>>;

/// Live sessions keyed by id.
///
/// The map only hands out `Arc` handles; the shard lock is released before a
/// session's own mutex is taken, so work on one session never blocks another.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<Uuid, SessionHandle>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, session: Session) -> Uuid {
        let id = session.id();
        self.sessions.insert(id, Arc::new(Mutex::new(session)));
        id
    }

    /// Snapshot of the session.
    pub fn get(&self, id: &Uuid) -> Result<Session, AppError> {
        self.read(id, Session::clone)
    }

    /// Runs `f` with shared access to the session and marks it active.
    pub fn read<R>(&self, id: &Uuid, f: impl FnOnce(&Session) -> R) -> Result<R, AppError> {
        let handle = self.handle(id)?;
        let mut session = lock(&handle)?;
        session.touch();
        Ok(f(&*session))
    }

    /// Runs `f` with exclusive access to the session. Calls on the same id are serialized.
    pub fn mutate<R>(
        &self,
        id: &Uuid,
        f: impl FnOnce(&mut Session) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let handle = self.handle(id)?;
        let mut session = lock(&handle)?;
        session.touch();
        f(&mut *session)
    }

    pub fn delete(&self, id: &Uuid) -> Result<(), AppError> {
        self.sessions
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::SessionNotFound(id.to_string()))
    }

    /// Drops every session whose last activity is older than `max_idle` before `now`.
    /// Sessions that are locked right now are in use and stay.
    pub fn evict_idle(&self, now: DateTime<Utc>, max_idle: Duration) -> usize {
        let Some(cutoff) = TimeDelta::from_std(max_idle)
            .ok()
            .and_then(|idle| now.checked_sub_signed(idle))
        else {
            return 0;
        };

        // Counted per removal: sessions created during the sweep must not offset the total.
        let mut evicted = 0;
        self.sessions.retain(|_, handle| {
            let keep = match handle.try_lock() {
                Ok(session) => session.last_active > cutoff,
                Err(TryLockError::WouldBlock) => true,
                Err(TryLockError::Poisoned(_)) => false,
            };
            if !keep {
                evicted += 1;
            }
            keep
        });
        evicted
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn handle(&self, id: &Uuid) -> Result<SessionHandle, AppError> {
        self.sessions
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| AppError::SessionNotFound(id.to_string()))
    }
}

fn lock(handle: &SessionHandle) -> Result<MutexGuard<'_, Session>, AppError> {
    handle
        .lock()
        .map_err(|_| AppError::InternalServerError("session lock poisoned".to_string()))
}
