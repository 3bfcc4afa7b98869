//! Mutation pipeline
//!
//! Every create/update/delete runs through the same sequence:
//! claim the loading flag, submit to the backend, apply to the store,
//! notify, and return to idle. Validation happens before `run` is called.
//!
//! A submission started from a dialog carries that dialog's
//! [`CancelSignal`]. Closing the dialog before the backend answers
//! abandons the submission: nothing is applied and nothing is announced.

use crate::database::{EntityId, EntityKind};
use crate::error::{AppError, Result};
use crate::services::activity::ActivityLog;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};

/// Capacity of the notification channel before slow listeners lag
const NOTIFICATION_BUFFER: usize = 64;

// ===== Operations =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

/// A mutation about to be submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    pub kind: MutationKind,
    pub entity: EntityKind,
    pub id: Option<EntityId>,
    /// Human-readable name of the record, used in the activity feed
    pub subject: Option<String>,
}

impl Operation {
    pub fn create(entity: EntityKind) -> Self {
        Self {
            kind: MutationKind::Create,
            entity,
            id: None,
            subject: None,
        }
    }

    pub fn update(entity: EntityKind, id: EntityId) -> Self {
        Self {
            kind: MutationKind::Update,
            entity,
            id: Some(id),
            subject: None,
        }
    }

    pub fn delete(entity: EntityKind, id: EntityId) -> Self {
        Self {
            kind: MutationKind::Delete,
            entity,
            id: Some(id),
            subject: None,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    fn verb(&self) -> (&'static str, &'static str) {
        match self.kind {
            MutationKind::Create => ("add", "added"),
            MutationKind::Update => ("update", "updated"),
            MutationKind::Delete => ("delete", "deleted"),
        }
    }

    /// e.g. "Client added successfully!"
    pub fn success_message(&self) -> String {
        format!("{} {} successfully!", self.entity.label(), self.verb().1)
    }

    /// e.g. "Failed to add client"
    pub fn failure_message(&self) -> String {
        format!(
            "Failed to {} {}",
            self.verb().0,
            self.entity.label().to_lowercase()
        )
    }

    /// Title shown in the recent-activity feed
    pub fn activity_title(&self) -> &'static str {
        match (self.entity, self.kind) {
            (EntityKind::Client, MutationKind::Create) => "New Client Registered",
            (EntityKind::Client, MutationKind::Update) => "Client Details Updated",
            (EntityKind::Client, MutationKind::Delete) => "Client Removed",
            (EntityKind::Document, MutationKind::Create) => "Document Uploaded",
            (EntityKind::Document, MutationKind::Update) => "Document Updated",
            (EntityKind::Document, MutationKind::Delete) => "Document Deleted",
            (EntityKind::Note, MutationKind::Create) => "Note Added",
            (EntityKind::Note, MutationKind::Update) => "Note Updated",
            (EntityKind::Note, MutationKind::Delete) => "Note Deleted",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.verb().0, self.entity.label().to_lowercase())?;
        if let Some(id) = self.id {
            write!(f, " #{}", id)?;
        }
        Ok(())
    }
}

// ===== Backend =====

/// The persistence collaborator a mutation is submitted to.
///
/// The store is only mutated after `submit` returns `Ok`.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn submit(&self, operation: &Operation) -> Result<()>;
}

/// Stand-in backend that accepts everything after a fixed delay
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    latency: Duration,
}

impl SimulatedBackend {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

#[async_trait]
impl Backend for SimulatedBackend {
    async fn submit(&self, operation: &Operation) -> Result<()> {
        tracing::debug!("Simulating backend call: {} ({:?})", operation, self.latency);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(())
    }
}

// ===== Notifications =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A transient message for the user (toast)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Broadcasts notifications to whoever renders them
#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(NOTIFICATION_BUFFER);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.emit(NotificationLevel::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(NotificationLevel::Error, message.into());
    }

    fn emit(&self, level: NotificationLevel, message: String) {
        // Nobody listening is fine; the message is also logged by the caller
        let _ = self.tx.send(Notification { level, message });
    }
}

// ===== Dialog lifetime =====

/// Handle to an open modal dialog.
///
/// Clones share the same open/closed state. Closing the dialog, or
/// dropping every handle, cancels submissions started from it.
#[derive(Clone, Debug)]
pub struct Dialog {
    closed: Arc<watch::Sender<bool>>,
}

impl Default for Dialog {
    fn default() -> Self {
        Self::open()
    }
}

impl Dialog {
    pub fn open() -> Self {
        let (tx, _) = watch::channel(false);
        Self {
            closed: Arc::new(tx),
        }
    }

    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    pub fn is_open(&self) -> bool {
        !*self.closed.borrow()
    }

    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            rx: self.closed.subscribe(),
        }
    }
}

/// Resolves once the owning dialog is closed or gone
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    pub async fn cancelled(mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

// ===== Pipeline =====

/// Submission state of one page's mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelineState {
    Idle,
    Submitting,
    Success,
    Failed,
}

/// Resets the state to Idle however the submission ends, including when
/// the caller drops the future mid-flight.
struct IdleOnDrop<'a> {
    state: &'a watch::Sender<PipelineState>,
}

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        self.state.send_replace(PipelineState::Idle);
    }
}

/// Runs mutations for one page; the loading flag is per pipeline
#[derive(Clone)]
pub struct MutationPipeline {
    backend: Arc<dyn Backend>,
    notifier: Notifier,
    activity: ActivityLog,
    state: Arc<watch::Sender<PipelineState>>,
}

impl MutationPipeline {
    pub fn new(backend: Arc<dyn Backend>, notifier: Notifier, activity: ActivityLog) -> Self {
        let (state, _) = watch::channel(PipelineState::Idle);
        Self {
            backend,
            notifier,
            activity,
            state: Arc::new(state),
        }
    }

    pub fn state(&self) -> PipelineState {
        *self.state.borrow()
    }

    /// True while a submission is in flight; callers disable resubmission
    pub fn is_loading(&self) -> bool {
        self.state() == PipelineState::Submitting
    }

    /// Subscribe to state transitions
    pub fn watch_state(&self) -> watch::Receiver<PipelineState> {
        self.state.subscribe()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Submit `operation`, then apply it to the store with `apply`.
    ///
    /// Fails with `Busy` if this pipeline is already submitting and with
    /// `Cancelled` if `cancel` fires before the backend answers. Backend
    /// and apply errors are announced as error notifications.
    pub async fn run<T, F, Fut>(
        &self,
        operation: Operation,
        cancel: Option<CancelSignal>,
        apply: F,
    ) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let claimed = self.state.send_if_modified(|state| {
            if *state == PipelineState::Submitting {
                false
            } else {
                *state = PipelineState::Submitting;
                true
            }
        });
        if !claimed {
            tracing::warn!("Rejected {}: another submission is in flight", operation);
            return Err(AppError::Busy);
        }
        let _idle = IdleOnDrop { state: &self.state };

        tracing::info!("Submitting: {}", operation);

        let submitted = match cancel {
            Some(signal) if signal.is_cancelled() => None,
            Some(signal) => tokio::select! {
                biased;
                _ = signal.cancelled() => None,
                result = self.backend.submit(&operation) => Some(result),
            },
            None => Some(self.backend.submit(&operation).await),
        };

        let outcome = match submitted {
            None => {
                tracing::warn!("Cancelled before commit: {}", operation);
                return Err(AppError::Cancelled);
            }
            Some(Ok(())) => apply().await,
            Some(Err(e)) => Err(e),
        };

        match &outcome {
            Ok(_) => {
                self.state.send_replace(PipelineState::Success);
                tracing::info!("Committed: {}", operation);
                self.notifier.success(operation.success_message());
                self.activity.record(&operation).await;
            }
            Err(e) => {
                self.state.send_replace(PipelineState::Failed);
                tracing::warn!("Failed: {}: {}", operation, e);
                self.notifier.error(operation.failure_message());
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingBackend;

    #[async_trait]
    impl Backend for FailingBackend {
        async fn submit(&self, _operation: &Operation) -> Result<()> {
            Err(AppError::Backend("service unavailable".to_string()))
        }
    }

    fn pipeline_with(backend: Arc<dyn Backend>) -> MutationPipeline {
        MutationPipeline::new(backend, Notifier::new(), ActivityLog::default())
    }

    fn instant_pipeline() -> MutationPipeline {
        pipeline_with(Arc::new(SimulatedBackend::new(Duration::ZERO)))
    }

    #[test]
    fn test_operation_messages() {
        let op = Operation::create(EntityKind::Document);
        assert_eq!(op.success_message(), "Document added successfully!");
        assert_eq!(op.failure_message(), "Failed to add document");

        let op = Operation::delete(EntityKind::Client, 3);
        assert_eq!(op.success_message(), "Client deleted successfully!");
        assert_eq!(op.to_string(), "delete client #3");
    }

    #[tokio::test]
    async fn test_success_applies_and_notifies() {
        let pipeline = instant_pipeline();
        let mut notifications = pipeline.notifier().subscribe();

        let value = pipeline
            .run(Operation::create(EntityKind::Client), None, || async {
                Ok(7)
            })
            .await
            .unwrap();

        assert_eq!(value, 7);
        assert_eq!(pipeline.state(), PipelineState::Idle);

        let notification = notifications.recv().await.unwrap();
        assert_eq!(notification.level, NotificationLevel::Success);
        assert_eq!(notification.message, "Client added successfully!");
    }

    #[tokio::test]
    async fn test_backend_failure_skips_apply() {
        let pipeline = pipeline_with(Arc::new(FailingBackend));
        let mut notifications = pipeline.notifier().subscribe();
        let applied = AtomicUsize::new(0);

        let result = pipeline
            .run(Operation::update(EntityKind::Document, 1), None, || async {
                applied.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(AppError::Backend(_))));
        assert_eq!(applied.load(Ordering::SeqCst), 0);
        assert_eq!(pipeline.state(), PipelineState::Idle);

        let notification = notifications.recv().await.unwrap();
        assert_eq!(notification.level, NotificationLevel::Error);
        assert_eq!(notification.message, "Failed to update document");
    }

    #[tokio::test]
    async fn test_apply_error_is_announced() {
        let pipeline = instant_pipeline();
        let mut notifications = pipeline.notifier().subscribe();

        let result: Result<()> = pipeline
            .run(Operation::delete(EntityKind::Client, 99), None, || async {
                Err(AppError::not_found("Client", 99))
            })
            .await;

        assert!(result.unwrap_err().is_not_found());
        assert_eq!(
            notifications.recv().await.unwrap().level,
            NotificationLevel::Error
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_flag_blocks_resubmission() {
        let pipeline = pipeline_with(Arc::new(SimulatedBackend::new(Duration::from_millis(500))));

        let in_flight = {
            let pipeline = pipeline.clone();
            tokio::spawn(async move {
                pipeline
                    .run(Operation::create(EntityKind::Client), None, || async { Ok(1) })
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(pipeline.is_loading());

        let second = pipeline
            .run(Operation::create(EntityKind::Client), None, || async { Ok(2) })
            .await;
        assert!(matches!(second, Err(AppError::Busy)));

        assert_eq!(in_flight.await.unwrap().unwrap(), 1);
        assert!(!pipeline.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_closing_dialog_cancels_submission() {
        let pipeline = pipeline_with(Arc::new(SimulatedBackend::new(Duration::from_millis(500))));
        let mut notifications = pipeline.notifier().subscribe();
        let dialog = Dialog::open();
        let applied = AtomicUsize::new(0);

        let closer = dialog.clone();
        let (result, ()) = tokio::join!(
            pipeline.run(
                Operation::create(EntityKind::Client),
                Some(dialog.signal()),
                || async {
                    applied.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                },
            ),
            async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                closer.close();
            }
        );

        assert!(matches!(result, Err(AppError::Cancelled)));
        assert_eq!(applied.load(Ordering::SeqCst), 0);
        assert!(!dialog.is_open());
        assert_eq!(pipeline.state(), PipelineState::Idle);
        assert!(notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_dialog_never_commits() {
        let pipeline = instant_pipeline();
        let mut notifications = pipeline.notifier().subscribe();
        let dialog = Dialog::open();
        dialog.close();
        let applied = AtomicUsize::new(0);

        for _ in 0..200 {
            let result = pipeline
                .run(
                    Operation::create(EntityKind::Client),
                    Some(dialog.signal()),
                    || async {
                        applied.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    },
                )
                .await;
            assert!(matches!(result, Err(AppError::Cancelled)));
        }

        assert_eq!(applied.load(Ordering::SeqCst), 0);
        assert!(notifications.try_recv().is_err());
        assert!(pipeline.activity.is_empty().await);
    }

    #[tokio::test]
    async fn test_state_transitions_are_observable() {
        let pipeline = instant_pipeline();
        let mut state = pipeline.watch_state();
        let observer = pipeline.watch_state();
        assert_eq!(*state.borrow_and_update(), PipelineState::Idle);

        pipeline
            .run(Operation::create(EntityKind::Client), None, || async {
                assert_eq!(*observer.borrow(), PipelineState::Submitting);
                Ok(())
            })
            .await
            .unwrap();

        assert!(state.has_changed().unwrap());
        assert_eq!(*state.borrow_and_update(), PipelineState::Idle);
    }

    #[tokio::test]
    async fn test_open_dialog_does_not_cancel() {
        let pipeline = instant_pipeline();
        let dialog = Dialog::open();

        let result = pipeline
            .run(
                Operation::create(EntityKind::Note),
                Some(dialog.signal()),
                || async { Ok("saved") },
            )
            .await;

        assert_eq!(result.unwrap(), "saved");
    }

    #[tokio::test]
    async fn test_success_is_recorded_in_activity_feed() {
        let activity = ActivityLog::default();
        let pipeline = MutationPipeline::new(
            Arc::new(SimulatedBackend::new(Duration::ZERO)),
            Notifier::new(),
            activity.clone(),
        );

        pipeline
            .run(
                Operation::create(EntityKind::Client).with_subject("Obras Norte"),
                None,
                || async { Ok(()) },
            )
            .await
            .unwrap();

        let recent = activity.recent(5).await;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].title, "New Client Registered");
        assert_eq!(recent[0].description, "Obras Norte");
    }
}
