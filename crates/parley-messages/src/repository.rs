//! Message repository
//!
//! Saves messages and looks them up by sender/recipient pair, by recipient,
//! or across all conversations. Every lookup is shaped by the
//! [`SelectionPolicy`]; see [`SelectionMode`] for the two modes.

use crate::clock::{Clock, SystemClock};
use crate::fields::{MessageField, MESSAGES_COLLECTION};
use crate::selection::{SelectionMode, SelectionPolicy};
use crate::settings::MessageSettings;
use crate::types::{Message, NewMessage};
use parley_storage::{Criteria, DocumentStore, LibSqlStore, StoreError};
use tracing::{debug, instrument};

/// Repository for message persistence and lookup
///
/// Holds no state besides its store handle, clock and policy, so one instance
/// can be shared (e.g. behind an `Arc`) by any number of concurrent callers.
pub struct MessageRepository<S, C = SystemClock> {
    store: S,
    clock: C,
    policy: SelectionPolicy,
}

impl<S: DocumentStore> MessageRepository<S> {
    /// Create a repository using the wall clock and default policy
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: SystemClock,
            policy: SelectionPolicy::default(),
        }
    }
}

impl MessageRepository<LibSqlStore> {
    /// Open the configured libSQL store and apply the configured policy
    pub async fn connect(settings: &MessageSettings) -> Result<Self, StoreError> {
        let store = LibSqlStore::open(MESSAGES_COLLECTION, &settings.store).await?;
        store.ensure_collection(MESSAGES_COLLECTION).await?;
        Ok(Self::new(store).with_policy(settings.selection_policy()))
    }
}

impl<S: DocumentStore, C: Clock> MessageRepository<S, C> {
    /// Replace the clock used to stamp and window messages
    pub fn with_clock<C2: Clock>(self, clock: C2) -> MessageRepository<S, C2> {
        MessageRepository {
            store: self.store,
            clock,
            policy: self.policy,
        }
    }

    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Save a message stamped with the current instant
    ///
    /// Performs exactly one insert. Store failures are returned as-is.
    #[instrument(skip(self, request))]
    pub async fn save(&self, request: NewMessage) -> Result<Message, StoreError> {
        let mut message = request.into_message(self.clock.now());

        let id = self
            .store
            .insert(MESSAGES_COLLECTION, message.to_document())
            .await?;

        debug!(
            id = %id,
            sender = %message.sender_id,
            recipient = %message.recipient_id,
            "Saved message"
        );
        message.id = Some(id);
        Ok(message)
    }

    /// Messages from `sender_id` to `recipient_id`
    #[instrument(skip(self, mode))]
    pub async fn find_by_sender_and_recipient(
        &self,
        sender_id: &str,
        recipient_id: &str,
        mode: impl Into<SelectionMode>,
    ) -> Result<Vec<Message>, StoreError> {
        let criteria = Criteria::new()
            .eq(MessageField::SenderId.name(), sender_id)
            .eq(MessageField::RecipientId.name(), recipient_id);
        self.find(criteria, mode.into()).await
    }

    /// Messages addressed to `recipient_id`, from anyone
    #[instrument(skip(self, mode))]
    pub async fn find_by_recipient(
        &self,
        recipient_id: &str,
        mode: impl Into<SelectionMode>,
    ) -> Result<Vec<Message>, StoreError> {
        let criteria = Criteria::new().eq(MessageField::RecipientId.name(), recipient_id);
        self.find(criteria, mode.into()).await
    }

    /// All messages
    #[instrument(skip(self, mode))]
    pub async fn find_all(
        &self,
        mode: impl Into<SelectionMode>,
    ) -> Result<Vec<Message>, StoreError> {
        self.find(Criteria::new(), mode.into()).await
    }

    async fn find(
        &self,
        criteria: Criteria,
        mode: SelectionMode,
    ) -> Result<Vec<Message>, StoreError> {
        let query = self.policy.shape(mode, criteria, self.clock.now());
        let documents = self.store.find(MESSAGES_COLLECTION, &query).await?;

        let messages = documents
            .iter()
            .map(Message::from_document)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(?mode, count = messages.len(), "Found messages");
        Ok(messages)
    }
}
