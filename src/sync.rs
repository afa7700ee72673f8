//! Remote document sync.
//!
//! Authentication and the remote document store are collaborators behind
//! async traits. [`RemoteSync`] pushes the latest document once writes have
//! been quiet for the debounce window. Failures are logged and surfaced
//! through a [`Notifier`]; nothing is retried.

use crate::document::SheetDocument;
use crate::error::RemoteError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Identity of a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Email and password sign-in.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Exchanges credentials for a user identity.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<UserId, RemoteError>;
}

/// Per-user remote document store.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch the user's document, if one exists.
    async fn pull(&self, user: &UserId) -> Result<Option<SheetDocument>, RemoteError>;

    /// Replace the user's document.
    async fn push(&self, user: &UserId, document: &SheetDocument) -> Result<(), RemoteError>;
}

/// Receives short, user-facing notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Drops every notice.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _message: &str) {}
}

/// Keeps notices for inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

/// Authenticator over a fixed set of accounts.
#[derive(Debug, Default)]
pub struct StaticAuthenticator {
    accounts: HashMap<String, (String, UserId)>,
}

impl StaticAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(
        mut self,
        email: impl Into<String>,
        password: impl Into<String>,
        user: UserId,
    ) -> Self {
        self.accounts.insert(email.into(), (password.into(), user));
        self
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn sign_in(&self, credentials: &Credentials) -> Result<UserId, RemoteError> {
        match self.accounts.get(&credentials.email) {
            Some((password, user)) if *password == credentials.password => Ok(user.clone()),
            _ => Err(RemoteError::Auth("invalid email or password".to_string())),
        }
    }
}

/// In-memory remote store.
#[derive(Debug, Default)]
pub struct MemoryRemoteStore {
    documents: Mutex<HashMap<UserId, SheetDocument>>,
    pushes: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: UserId, document: SheetDocument) {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user, document);
    }

    pub fn document(&self, user: &UserId) -> Option<SheetDocument> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user)
            .cloned()
    }

    /// Number of successful pushes so far.
    pub fn push_count(&self) -> usize {
        self.pushes.load(Ordering::SeqCst)
    }

    /// Make every subsequent request fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), RemoteError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RemoteError::Store("remote store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn pull(&self, user: &UserId) -> Result<Option<SheetDocument>, RemoteError> {
        self.check()?;
        Ok(self.document(user))
    }

    async fn push(&self, user: &UserId, document: &SheetDocument) -> Result<(), RemoteError> {
        self.check()?;
        self.insert(user.clone(), document.clone());
        self.pushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Debounced pusher for one signed-in user.
///
/// Each [`schedule`](Self::schedule) replaces any pending push, so a burst
/// of writes produces one push of the last document.
pub struct RemoteSync {
    user: UserId,
    remote: Arc<dyn RemoteStore>,
    notifier: Arc<dyn Notifier>,
    debounce: Duration,
    runtime: Option<Handle>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl RemoteSync {
    /// Create a pusher bound to the current tokio runtime.
    ///
    /// Pushes are spawned on that runtime, so [`schedule`](Self::schedule)
    /// may be called from any thread afterwards.
    pub fn new(
        user: UserId,
        remote: Arc<dyn RemoteStore>,
        notifier: Arc<dyn Notifier>,
        debounce: Duration,
    ) -> Self {
        Self {
            user,
            remote,
            notifier,
            debounce,
            runtime: Handle::try_current().ok(),
            pending: Mutex::new(None),
        }
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Push `document` once the debounce window passes without another
    /// schedule.
    ///
    /// Runs on the runtime captured at construction, falling back to the
    /// caller's runtime. With neither the push is skipped.
    pub fn schedule(&self, document: SheetDocument) {
        let Some(handle) = self.runtime.clone().or_else(|| Handle::try_current().ok()) else {
            tracing::warn!(user = %self.user, "no runtime, remote push skipped");
            return;
        };

        let user = self.user.clone();
        let remote = Arc::clone(&self.remote);
        let notifier = Arc::clone(&self.notifier);
        let debounce = self.debounce;

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(handle.spawn(async move {
            tokio::time::sleep(debounce).await;
            push_or_notify(&*remote, &*notifier, &user, &document).await;
        }));
    }

    /// Push `document` now, dropping any pending push.
    pub async fn flush(&self, document: &SheetDocument) -> Result<(), RemoteError> {
        self.cancel();
        let result = self.remote.push(&self.user, document).await;
        if let Err(e) = &result {
            tracing::warn!(user = %self.user, error = %e, "remote push failed");
            self.notifier.notify(&format!("Sync failed: {}", e));
        }
        result
    }

    /// Drop any pending push.
    pub fn cancel(&self) {
        let pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = pending {
            task.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl Drop for RemoteSync {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for RemoteSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSync")
            .field("user", &self.user)
            .field("debounce", &self.debounce)
            .finish_non_exhaustive()
    }
}

async fn push_or_notify(
    remote: &dyn RemoteStore,
    notifier: &dyn Notifier,
    user: &UserId,
    document: &SheetDocument,
) {
    match remote.push(user, document).await {
        Ok(()) => tracing::debug!(user = %user, "remote push complete"),
        Err(e) => {
            tracing::warn!(user = %user, error = %e, "remote push failed");
            notifier.notify(&format!("Sync failed: {}", e));
        }
    }
}
