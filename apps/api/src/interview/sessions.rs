use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::steps::{StepError, StepState};

/// Upper bound on how often idle sessions are swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

struct Entry {
    state: StepState,
    /// Last create or successful transition. Reads do not count.
    touched: Instant,
}

impl Entry {
    fn new(state: StepState) -> Self {
        Self {
            state,
            touched: Instant::now(),
        }
    }
}

/// In-process registry of interview sessions. Each entry holds the latest
/// `StepState`; handlers replace it after a successful transition.
///
/// Sessions that see no transition for the configured idle time are evicted by
/// the sweeper started with `spawn_sweeper`.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Entry>>>,
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, initial: StepState) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.write().await.insert(id, Entry::new(initial));
        id
    }

    pub async fn get(&self, id: Uuid) -> Result<StepState, AppError> {
        self.inner
            .read()
            .await
            .get(&id)
            .map(|entry| entry.state.clone())
            .ok_or_else(|| not_found(id))
    }

    /// Applies `transition` to the session's current state and stores the result.
    /// On error the stored state is left untouched.
    pub async fn advance<F>(&self, id: Uuid, transition: F) -> Result<StepState, AppError>
    where
        F: FnOnce(&StepState) -> Result<StepState, StepError>,
    {
        let (next, ()) = self
            .advance_and_commit(
                id,
                |s| transition(s).map(|next| (next, ())),
                |()| async { Ok(()) },
            )
            .await?;
        Ok(next)
    }

    /// Like `advance`, but runs `commit` on the transition's output before the new
    /// state is stored. The session stays write-locked throughout, so no other
    /// transition can interleave; if `commit` fails the stored state is unchanged.
    pub async fn advance_and_commit<T, F, C, Fut>(
        &self,
        id: Uuid,
        transition: F,
        commit: C,
    ) -> Result<(StepState, T), AppError>
    where
        F: FnOnce(&StepState) -> Result<(StepState, T), StepError>,
        C: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let mut sessions = self.inner.write().await;
        let current = sessions.get(&id).ok_or_else(|| not_found(id))?;
        let (next, output) = transition(&current.state)?;
        let output = commit(output).await?;
        sessions.insert(id, Entry::new(next.clone()));
        Ok((next, output))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.inner
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Drops sessions untouched for longer than `max_idle`. Returns how many went.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.touched.elapsed() <= max_idle);
        before - sessions.len()
    }

    /// Periodically evicts sessions idle for longer than `max_idle`.
    pub fn spawn_sweeper(&self, max_idle: Duration) -> JoinHandle<()> {
        let store = self.clone();
        let period = SWEEP_INTERVAL.min(max_idle);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let evicted = store.evict_idle(max_idle).await;
                if evicted > 0 {
                    info!("Evicted {evicted} idle interview sessions");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::steps::{give_consent, save_resume, set_participant_id, Step};
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_create_and_get() {
        let store = SessionStore::new();
        let id = store.create(StepState::default()).await;
        let state = store.get(id).await.unwrap();
        assert!(!state.consent);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_advance_replaces_state() {
        let store = SessionStore::new();
        let id = store.create(StepState::default()).await;
        store.advance(id, |s| Ok(give_consent(s))).await.unwrap();
        let next = store
            .advance(id, |s| save_resume(s, "my resume"))
            .await
            .unwrap();
        assert_eq!(next.active_step, Step::Scenario);
        assert_eq!(store.get(id).await.unwrap().resume_text, "my resume");
    }

    #[tokio::test]
    async fn test_failed_transition_keeps_state() {
        let store = SessionStore::new();
        let id = store.create(give_consent(&StepState::default())).await;
        let err = store.advance(id, |s| save_resume(s, "")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let state = store.get(id).await.unwrap();
        assert_eq!(state.active_step, Step::Resume);
        assert!(!state.resume_done);
    }

    #[tokio::test]
    async fn test_failed_commit_keeps_state() {
        let store = SessionStore::new();
        let id = store.create(StepState::default()).await;
        let err = store
            .advance_and_commit(
                id,
                |s| Ok((give_consent(s), ())),
                |()| async { Err(AppError::Unauthorized) },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
        assert!(!store.get(id).await.unwrap().consent);
    }

    #[tokio::test]
    async fn test_transition_waits_for_pending_commit() {
        let store = SessionStore::new();
        let id = store.create(StepState::default()).await;
        let (started_tx, started_rx) = oneshot::channel::<()>();
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let committing = store.clone();
        let submit = tokio::spawn(async move {
            committing
                .advance_and_commit(
                    id,
                    |s| Ok((set_participant_id(s, "P01"), ())),
                    move |()| async move {
                        let _ = started_tx.send(());
                        let _ = release_rx.await;
                        Ok(())
                    },
                )
                .await
        });
        started_rx.await.unwrap();

        let advancing = store.clone();
        let consent = tokio::spawn(async move {
            advancing.advance(id, |s| Ok(give_consent(s))).await
        });
        release_tx.send(()).unwrap();

        submit.await.unwrap().unwrap();
        consent.await.unwrap().unwrap();

        // The later transition saw the committed state instead of overwriting it.
        let state = store.get(id).await.unwrap();
        assert_eq!(state.participant_id.as_deref(), Some("P01"));
        assert!(state.consent);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let store = SessionStore::new();
        assert!(matches!(
            store.get(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            store.remove(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_remove_resets_session() {
        let store = SessionStore::new();
        let id = store.create(StepState::default()).await;
        store.remove(id).await.unwrap();
        assert!(store.get(id).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_evicted() {
        let store = SessionStore::new();
        let stale = store.create(StepState::default()).await;
        let active = store.create(StepState::default()).await;

        tokio::time::advance(Duration::from_secs(50 * 60)).await;
        store.advance(active, |s| Ok(give_consent(s))).await.unwrap();
        tokio::time::advance(Duration::from_secs(20 * 60)).await;

        assert_eq!(store.evict_idle(Duration::from_secs(60 * 60)).await, 1);
        assert!(store.get(stale).await.is_err());
        assert!(store.get(active).await.unwrap().consent);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_in_background() {
        let store = SessionStore::new();
        store.create(StepState::default()).await;
        let sweeper = store.spawn_sweeper(Duration::from_secs(120));

        tokio::time::sleep(Duration::from_secs(200)).await;
        assert_eq!(store.len().await, 0);
        sweeper.abort();
    }
}
