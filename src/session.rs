//! Sheet session.
//!
//! A [`SheetSession`] ties a shared [`CharacterSheet`] to its local store,
//! the roll resolver and, once signed in, a debounced remote sync. It is
//! the place where "persist now" happens: after every change that was
//! applied and after every completed roll.

use crate::config::SheetConfig;
use crate::document::SheetDocument;
use crate::error::{RemoteError, SheetError};
use crate::resolved::Resolution;
use crate::resolver::{RollResolver, RollSink};
use crate::roller::{DieRoller, RngRoller};
use crate::sheet::{CharacterSheet, SheetAction};
use crate::stat::Stat;
use crate::storage::KeyValueStore;
use crate::sync::{
    Authenticator, Credentials, Notifier, NullNotifier, RemoteStore, RemoteSync, UserId,
};
use std::sync::{Arc, Mutex, PoisonError};

/// A live character sheet with persistence.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use diesheet::storage::{KeyValueStore, MemoryStore};
/// use diesheet::{SheetAction, SheetConfig, SheetSession, Stat};
///
/// let store = Arc::new(MemoryStore::new());
/// let session = SheetSession::open(SheetConfig::default(), store.clone());
/// session.apply(SheetAction::SelectBackground(Some(Stat::Style)));
///
/// let saved = store.get("megaMechaState").unwrap().unwrap();
/// assert!(saved.contains("\"Style\""));
/// ```
pub struct SheetSession {
    config: SheetConfig,
    sheet: Arc<Mutex<CharacterSheet>>,
    store: Arc<dyn KeyValueStore>,
    resolver: RollResolver,
    roller: Mutex<Box<dyn DieRoller + Send>>,
    notifier: Arc<dyn Notifier>,
    sync: Mutex<Option<Arc<RemoteSync>>>,
}

impl SheetSession {
    /// Open a session, loading any document saved under the configured
    /// key. A missing or malformed document leaves a blank sheet.
    pub fn open(config: SheetConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let mut sheet = CharacterSheet::new(&config);
        match load_document(&*store, &config.storage_key) {
            Ok(Some(doc)) => {
                sheet.load_document(&doc);
                tracing::info!(key = %config.storage_key, rank = %sheet.rank(), "sheet loaded");
            }
            Ok(None) => tracing::debug!(key = %config.storage_key, "no saved sheet"),
            Err(e) => {
                tracing::error!(key = %config.storage_key, error = %e, "failed to load sheet")
            }
        }

        Self {
            resolver: RollResolver::new(config.roll_delay()),
            config,
            sheet: Arc::new(Mutex::new(sheet)),
            store,
            roller: Mutex::new(Box::new(RngRoller::from_entropy())),
            notifier: Arc::new(NullNotifier),
            sync: Mutex::new(None),
        }
    }

    /// Replace the die roller.
    pub fn with_roller(mut self, roller: impl DieRoller + Send + 'static) -> Self {
        self.roller = Mutex::new(Box::new(roller));
        self
    }

    /// Replace the notice sink used for remote failures.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    /// A copy of the current sheet.
    pub fn snapshot(&self) -> CharacterSheet {
        self.lock_sheet().clone()
    }

    /// Shared handle to the sheet.
    pub fn sheet(&self) -> Arc<Mutex<CharacterSheet>> {
        Arc::clone(&self.sheet)
    }

    /// Apply an action, persisting if it changed anything.
    pub fn apply(&self, action: SheetAction) -> bool {
        let document = {
            let mut sheet = self.lock_sheet();
            if !sheet.apply(action) {
                return false;
            }
            sheet.to_document()
        };
        self.persist(document);
        true
    }

    /// Roll a stat, pausing between steps, then persist.
    ///
    /// A roll requested while the same stat is resolving returns
    /// [`Resolution::Busy`] and changes nothing.
    pub async fn roll(&self, stat: Stat, sink: &dyn RollSink) -> Resolution {
        let resolution = self
            .resolver
            .resolve(&*self.sheet, stat, &self.roller, sink)
            .await;
        if !resolution.is_busy() {
            let document = self.lock_sheet().to_document();
            self.persist(document);
        }
        resolution
    }

    /// Write the current sheet to the local store.
    pub fn save(&self) -> Result<(), SheetError> {
        let document = self.lock_sheet().to_document();
        self.store
            .set(&self.config.storage_key, &document.to_json()?)?;
        Ok(())
    }

    /// Sign in and pull the remote document.
    ///
    /// A remote document overwrites the local sheet. With no remote
    /// document the local sheet is pushed instead. Failures are reported
    /// to the notifier and leave the session signed out.
    pub async fn sign_in(
        &self,
        auth: &dyn Authenticator,
        remote: Arc<dyn RemoteStore>,
        credentials: &Credentials,
    ) -> Result<UserId, SheetError> {
        let user = match auth.sign_in(credentials).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(email = %credentials.email, error = %e, "sign-in failed");
                self.notifier.notify(&format!("Sign-in failed: {}", e));
                return Err(e.into());
            }
        };

        let pulled = match remote.pull(&user).await {
            Ok(pulled) => pulled,
            Err(e) => {
                tracing::warn!(user = %user, error = %e, "remote pull failed");
                self.notifier.notify(&format!("Sync failed: {}", e));
                return Err(e.into());
            }
        };

        let sync = RemoteSync::new(
            user.clone(),
            remote,
            Arc::clone(&self.notifier),
            self.config.sync_debounce(),
        );

        match pulled {
            Some(doc) => {
                let document = {
                    let mut sheet = self.lock_sheet();
                    sheet.load_document(&doc);
                    sheet.to_document()
                };
                self.save_local(&document);
                tracing::info!(user = %user, "signed in, remote sheet loaded");
            }
            None => {
                let document = self.lock_sheet().to_document();
                sync.flush(&document).await?;
                tracing::info!(user = %user, "signed in, local sheet uploaded");
            }
        }

        if let Some(previous) = self.lock_sync().replace(Arc::new(sync)) {
            previous.cancel();
        }
        Ok(user)
    }

    /// Stop syncing. Any pending push is dropped.
    pub fn sign_out(&self) {
        if let Some(sync) = self.lock_sync().take() {
            sync.cancel();
            tracing::info!(user = %sync.user(), "signed out");
        }
    }

    /// Push the current sheet to the remote store now, dropping any
    /// pending debounced push.
    pub async fn sync_now(&self) -> Result<(), SheetError> {
        let sync = self
            .lock_sync()
            .clone()
            .ok_or(SheetError::Remote(RemoteError::NotSignedIn))?;
        let document = self.lock_sheet().to_document();
        sync.flush(&document).await?;
        Ok(())
    }

    pub fn user(&self) -> Option<UserId> {
        self.lock_sync().as_ref().map(|sync| sync.user().clone())
    }

    fn persist(&self, document: SheetDocument) {
        self.save_local(&document);
        if let Some(sync) = self.lock_sync().as_ref() {
            sync.schedule(document);
        }
    }

    fn save_local(&self, document: &SheetDocument) {
        let result = document
            .to_json()
            .map_err(SheetError::from)
            .and_then(|json| Ok(self.store.set(&self.config.storage_key, &json)?));
        if let Err(e) = result {
            tracing::error!(key = %self.config.storage_key, error = %e, "failed to save sheet");
        }
    }

    fn lock_sheet(&self) -> std::sync::MutexGuard<'_, CharacterSheet> {
        self.sheet.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_sync(&self) -> std::sync::MutexGuard<'_, Option<Arc<RemoteSync>>> {
        self.sync.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn load_document(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<SheetDocument>, SheetError> {
    match store.get(key)? {
        Some(json) => Ok(Some(SheetDocument::from_json(&json)?)),
        None => Ok(None),
    }
}
