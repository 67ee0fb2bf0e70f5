//! # Editing Session
//!
//! Holds the capture being edited, its style, and the debounced auto-save.
//!
//! ## Lifecycle
//!
//! ```text
//! begin(capture) ──→ edit(style) ─→ edit(style) ─→ ... quiet period ... ─→ compose + put
//!       │                 └─── each edit cancels and re-arms the timer
//!       └─ a new begin/reopen/close abandons anything pending
//!
//! reopen(id) ──→ fresh copy of the stored raw + style, saves update the same id
//! ```
//!
//! Pending saves carry the session generation they were armed in. A save
//! whose generation is no longer current is discarded before it touches the
//! store, even if its compose was already running. The generation only
//! changes under the store lock, so the check and the write are one step.
//!
//! Removing the moment being edited, or clearing everything, also ends the
//! session: nothing pending can write a deleted moment back.
//!
//! The raw capture is encoded once per session. A reopened moment keeps the
//! exact `raw` it was stored with, so re-edits never re-compress it.
//!
//! Storage failures are logged and never surface through `edit` or `flush`:
//! the composed print is still returned.

mod debounce;

pub use debounce::Debouncer;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::capture::RawCapture;
use crate::compose::{PrintArtifact, PrintComposer};
use crate::error::{ComposeError, PolaroidError, StorageError};
use crate::storage::{MomentStore, RecentMoments, StoredMoment};
use crate::style::StyleParameters;

/// Default quiet period before an auto-save.
pub const AUTOSAVE_DELAY: Duration = Duration::from_millis(1000);

/// What happened to the persistence half of a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persisted {
    Saved,
    /// The session moved on before the save landed.
    Stale,
    /// The store rejected the write. Already logged.
    Failed,
}

/// The capture currently being edited.
#[derive(Debug, Clone)]
pub struct EditingSession {
    pub id: u64,
    pub capture: Arc<RawCapture>,
    pub style: StyleParameters,
    pub captured_at: DateTime<Utc>,
    raw_uri: Arc<OnceLock<String>>,
}

impl EditingSession {
    fn new(
        id: u64,
        capture: RawCapture,
        style: StyleParameters,
        captured_at: DateTime<Utc>,
        raw_uri: Option<String>,
    ) -> Self {
        Self {
            id,
            capture: Arc::new(capture),
            style,
            captured_at,
            raw_uri: Arc::new(raw_uri.map(OnceLock::from).unwrap_or_default()),
        }
    }

    /// Data URI persisted as the moment's `raw`. Encoded on first use and
    /// shared by every clone of the session after that.
    pub fn raw_data_uri(&self) -> Result<String, image::ImageError> {
        if let Some(uri) = self.raw_uri.get() {
            return Ok(uri.clone());
        }
        let uri = self.capture.to_data_uri()?;
        Ok(self.raw_uri.get_or_init(|| uri).clone())
    }
}

/// A compose-and-persist job bound to one session generation.
struct SaveJob<S> {
    composer: Arc<PrintComposer>,
    moments: Arc<Mutex<RecentMoments<S>>>,
    generation: Arc<AtomicU64>,
    armed_at: u64,
    session: EditingSession,
}

impl<S: MomentStore> SaveJob<S> {
    fn run(self) -> Result<(PrintArtifact, Persisted), ComposeError> {
        let session = &self.session;
        let artifact = self
            .composer
            .compose(&session.capture, &session.style, session.captured_at)?;
        let raw = session
            .raw_data_uri()
            .map_err(|e| ComposeError::Encode(e.to_string()))?;
        let moment = StoredMoment::from_artifact(session.id, &artifact, raw);

        let mut moments = lock(&self.moments);
        if self.generation.load(Ordering::SeqCst) != self.armed_at {
            tracing::debug!(id = session.id, "discarding stale auto-save");
            return Ok((artifact, Persisted::Stale));
        }

        let persisted = match moments.put(moment) {
            Ok(()) => {
                tracing::info!(id = session.id, "moment saved");
                Persisted::Saved
            }
            Err(e) => {
                tracing::warn!(id = session.id, error = %e, "failed to save moment");
                Persisted::Failed
            }
        };
        Ok((artifact, persisted))
    }
}

fn lock<S>(moments: &Mutex<RecentMoments<S>>) -> MutexGuard<'_, RecentMoments<S>> {
    moments.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Owns the composer, the recent-moments collection and the active session.
pub struct Studio<S> {
    composer: Arc<PrintComposer>,
    moments: Arc<Mutex<RecentMoments<S>>>,
    generation: Arc<AtomicU64>,
    debouncer: Debouncer,
    session: Option<EditingSession>,
    last_id: u64,
}

impl<S: MomentStore + 'static> Studio<S> {
    pub fn new(composer: PrintComposer, store: S, autosave_delay: Duration) -> Self {
        let moments = RecentMoments::new(store);
        let last_id = match moments.list() {
            Ok(list) => list.iter().map(|m| m.id).max().unwrap_or(0),
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored moments");
                0
            }
        };

        Self {
            composer: Arc::new(composer),
            moments: Arc::new(Mutex::new(moments)),
            generation: Arc::new(AtomicU64::new(0)),
            debouncer: Debouncer::new(autosave_delay),
            session: None,
            last_id,
        }
    }

    pub fn composer(&self) -> &PrintComposer {
        &self.composer
    }

    pub fn session(&self) -> Option<&EditingSession> {
        self.session.as_ref()
    }

    pub fn autosave_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Start editing a new capture and arm an auto-save for it.
    ///
    /// Anything pending for the previous capture is abandoned.
    pub fn begin(&mut self, capture: RawCapture, captured_at: DateTime<Utc>) -> u64 {
        self.abandon_pending();
        let id = self.next_id(captured_at);
        tracing::debug!(id, width = capture.width(), height = capture.height(), "new capture");
        self.session = Some(EditingSession::new(
            id,
            capture,
            StyleParameters::default(),
            captured_at,
            None,
        ));
        self.arm_autosave();
        id
    }

    /// Reopen a stored moment for editing. Later saves replace it in place.
    pub fn reopen(&mut self, id: u64) -> Result<&EditingSession, PolaroidError> {
        let moment = lock(&self.moments)
            .get(id)?
            .ok_or(PolaroidError::MomentNotFound(id))?;
        let capture = moment.raw_capture()?;

        self.abandon_pending();
        tracing::debug!(id, "reopened moment");
        let style = moment.style();
        Ok(self.session.insert(EditingSession::new(
            id,
            capture,
            style,
            moment.timestamp,
            Some(moment.raw),
        )))
    }

    /// Replace the style of the active session and re-arm the auto-save.
    ///
    /// Invalid styles are rejected and leave the session untouched.
    pub fn edit(&mut self, style: StyleParameters) -> Result<(), PolaroidError> {
        style.validate()?;
        let session = self.session.as_mut().ok_or(PolaroidError::NoCapture)?;
        session.style = style;
        self.abandon_pending();
        self.arm_autosave();
        Ok(())
    }

    /// Compose the active session without saving.
    pub fn preview(&self) -> Result<PrintArtifact, PolaroidError> {
        let session = self.session.as_ref().ok_or(PolaroidError::NoCapture)?;
        Ok(self
            .composer
            .compose(&session.capture, &session.style, session.captured_at)?)
    }

    /// Cancel the timer and compose + save right away.
    pub async fn flush(&mut self) -> Result<(PrintArtifact, Persisted), PolaroidError> {
        self.abandon_pending();
        let job = self.job().ok_or(PolaroidError::NoCapture)?;
        let result = tokio::task::spawn_blocking(move || job.run())
            .await
            .map_err(|e| PolaroidError::Task(e.to_string()))??;
        Ok(result)
    }

    /// [`Studio::preview`] on the blocking pool.
    pub async fn preview_async(&self) -> Result<PrintArtifact, PolaroidError> {
        let session = self.session.clone().ok_or(PolaroidError::NoCapture)?;
        let composer = self.composer.clone();
        let artifact = tokio::task::spawn_blocking(move || {
            composer.compose(&session.capture, &session.style, session.captured_at)
        })
        .await
        .map_err(|e| PolaroidError::Task(e.to_string()))??;
        Ok(artifact)
    }

    /// Drop the active session and anything pending for it.
    pub fn close(&mut self) {
        self.abandon_pending();
        self.session = None;
    }

    pub fn list(&self) -> Result<Vec<StoredMoment>, StorageError> {
        lock(&self.moments).list()
    }

    pub fn get(&self, id: u64) -> Result<Option<StoredMoment>, StorageError> {
        lock(&self.moments).get(id)
    }

    /// Remove one moment. Ends the session if it is the one being edited.
    pub fn remove(&mut self, id: u64) -> Result<bool, StorageError> {
        let mut moments = lock(&self.moments);
        if self.session.as_ref().is_some_and(|s| s.id == id) {
            self.generation.fetch_add(1, Ordering::SeqCst);
            self.debouncer.cancel();
            self.session = None;
            tracing::debug!(id, "closed session of removed moment");
        }
        moments.remove(id)
    }

    /// Remove every moment and end the active session.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        let mut moments = lock(&self.moments);
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.debouncer.cancel();
        self.session = None;
        moments.clear()
    }

    fn abandon_pending(&mut self) {
        {
            let _moments = lock(&self.moments);
            self.generation.fetch_add(1, Ordering::SeqCst);
        }
        if self.debouncer.cancel() {
            tracing::debug!("cancelled pending auto-save");
        }
    }

    fn job(&self) -> Option<SaveJob<S>> {
        let session = self.session.clone()?;
        Some(SaveJob {
            composer: self.composer.clone(),
            moments: self.moments.clone(),
            generation: self.generation.clone(),
            armed_at: self.generation.load(Ordering::SeqCst),
            session,
        })
    }

    fn arm_autosave(&mut self) {
        let Some(job) = self.job() else {
            return;
        };
        self.debouncer.schedule(async move {
            match tokio::task::spawn_blocking(move || job.run()).await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => tracing::error!(error = %e, "auto-save compose failed"),
                Err(e) => tracing::error!(error = %e, "auto-save task failed"),
            }
        });
    }

    /// Millisecond capture time, bumped past the last issued id on collision.
    fn next_id(&mut self, captured_at: DateTime<Utc>) -> u64 {
        let millis = u64::try_from(captured_at.timestamp_millis()).unwrap_or(0);
        let id = millis.max(self.last_id + 1);
        self.last_id = id;
        id
    }
}

impl<S> Drop for Studio<S> {
    fn drop(&mut self) {
        let _moments = lock(&self.moments);
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}
