//! Message persistence for Parley
//!
//! This crate provides:
//! - Message domain types ([`Message`], [`NewMessage`])
//! - [`MessageRepository`] for saving messages and looking them up by
//!   sender/recipient pair, by recipient, or globally
//! - The selection policy shared by every lookup: either capped at
//!   `result_cap` records or restricted to the last `recent_window`
//! - Settings loading for the store and policy thresholds
//!
//! # Architecture
//!
//! The repository is written against [`parley_storage::DocumentStore`] and
//! keeps no local copy of anything it persists. Stored field names are
//! defined once in [`MessageField`].
//!
//! # Example
//!
//! ```ignore
//! use parley_messages::{MessageRepository, MessageSettings, NewMessage, SelectionMode};
//!
//! let repo = MessageRepository::connect(&MessageSettings::load()?).await?;
//! repo.save(NewMessage::new("alice", "bob", "Hello, world!")).await?;
//! let inbox = repo.find_by_recipient("bob", SelectionMode::RecentWindow).await?;
//! ```

mod clock;
mod fields;
mod repository;
mod selection;
mod settings;
pub mod timestamp;
mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use fields::{MessageField, MESSAGES_COLLECTION};
pub use repository::MessageRepository;
pub use selection::{
    SelectionMode, SelectionPolicy, DEFAULT_RECENT_WINDOW_DAYS, DEFAULT_RESULT_CAP,
};
pub use settings::{MessageSettings, SettingsError};
pub use types::{Message, NewMessage};

pub use parley_storage::StoreError;
