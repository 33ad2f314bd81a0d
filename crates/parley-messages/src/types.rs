//! Message domain types
//!
//! - `Message`: a persisted chat message
//! - `NewMessage`: the caller's request to save one

use crate::fields::MessageField;
use crate::timestamp;
use chrono::{DateTime, Utc};
use parley_storage::{Document, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A chat message as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Store-assigned identifier; `None` until inserted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub sender_id: String,
    pub recipient_id: String,
    /// Opaque payload
    pub content: String,
    /// Stamped from the accessor's clock at insert time
    pub sent_at: DateTime<Utc>,
}

/// Request to save a message
///
/// Accepts both snake_case and camelCase keys when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    #[serde(alias = "senderId")]
    pub sender_id: String,
    #[serde(alias = "recipientId")]
    pub recipient_id: String,
    pub content: String,
}

impl NewMessage {
    pub fn new(
        sender_id: impl Into<String>,
        recipient_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            sender_id: sender_id.into(),
            recipient_id: recipient_id.into(),
            content: content.into(),
        }
    }

    /// Turn the request into an unsaved message sent at `sent_at`
    pub fn into_message(self, sent_at: DateTime<Utc>) -> Message {
        Message {
            id: None,
            sender_id: self.sender_id,
            recipient_id: self.recipient_id,
            content: self.content,
            sent_at,
        }
    }
}

impl Message {
    /// Convert to a store document. `_id` is only written when already known.
    pub fn to_document(&self) -> Document {
        let mut document = Document::new();
        if let Some(id) = &self.id {
            document.insert(MessageField::Id.name().to_string(), Value::from(id.as_str()));
        }
        document.insert(
            MessageField::SenderId.name().to_string(),
            Value::from(self.sender_id.as_str()),
        );
        document.insert(
            MessageField::RecipientId.name().to_string(),
            Value::from(self.recipient_id.as_str()),
        );
        document.insert(
            MessageField::Content.name().to_string(),
            Value::from(self.content.as_str()),
        );
        document.insert(
            MessageField::SentAt.name().to_string(),
            Value::from(timestamp::encode(self.sent_at)),
        );
        document
    }

    /// Build a message from a stored document
    pub fn from_document(document: &Document) -> Result<Self, StoreError> {
        let id = match document.get(MessageField::Id.name()) {
            None | Some(Value::Null) => None,
            Some(_) => Some(string_field(document, MessageField::Id)?),
        };

        let sent_at_raw = string_field(document, MessageField::SentAt)?;
        let sent_at = timestamp::decode(&sent_at_raw).map_err(|e| {
            StoreError::Rejected(format!(
                "invalid {} value {:?}: {}",
                MessageField::SentAt,
                sent_at_raw,
                e
            ))
        })?;

        Ok(Self {
            id,
            sender_id: string_field(document, MessageField::SenderId)?,
            recipient_id: string_field(document, MessageField::RecipientId)?,
            content: string_field(document, MessageField::Content)?,
            sent_at,
        })
    }
}

fn string_field(document: &Document, field: MessageField) -> Result<String, StoreError> {
    match document.get(field.name()) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(other) => Err(StoreError::Rejected(format!(
            "message field {} is not a string: {}",
            field, other
        ))),
        None => Err(StoreError::Rejected(format!(
            "message document missing field {}",
            field
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sent_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_to_document_uses_storage_names() {
        let message = NewMessage::new("alice", "bob", "hi").into_message(sent_at());
        let document = message.to_document();

        assert_eq!(
            Value::Object(document),
            json!({
                "sender_id": "alice",
                "recipient_id": "bob",
                "content": "hi",
                "sent_at": "2026-10-16T09:30:00.000000Z",
            })
        );
    }

    #[test]
    fn test_to_document_includes_known_id() {
        let mut message = NewMessage::new("alice", "bob", "hi").into_message(sent_at());
        message.id = Some("m-1".to_string());
        assert_eq!(message.to_document()["_id"], "m-1");
    }

    #[test]
    fn test_from_document() {
        let document = json!({
            "_id": "m-1",
            "sender_id": "alice",
            "recipient_id": "bob",
            "content": "hi",
            "sent_at": "2026-10-16T09:30:00.000Z",
        });
        let message = Message::from_document(document.as_object().unwrap()).unwrap();

        assert_eq!(message.id.as_deref(), Some("m-1"));
        assert_eq!(message.sender_id, "alice");
        assert_eq!(message.recipient_id, "bob");
        assert_eq!(message.content, "hi");
        assert_eq!(message.sent_at, sent_at());
    }

    #[test]
    fn test_from_document_missing_field_is_rejected() {
        let document = json!({"_id": "m-1", "sender_id": "alice", "sent_at": "2026-10-16T09:30:00Z"});
        let err = Message::from_document(document.as_object().unwrap()).unwrap_err();
        assert!(err.is_rejected());
        assert!(err.to_string().contains("recipient_id"));
    }

    #[test]
    fn test_from_document_bad_timestamp_is_rejected() {
        let document = json!({
            "sender_id": "alice",
            "recipient_id": "bob",
            "content": "hi",
            "sent_at": "last tuesday",
        });
        let err = Message::from_document(document.as_object().unwrap()).unwrap_err();
        assert!(err.is_rejected());
    }

    #[test]
    fn test_new_message_accepts_camel_case() {
        let request: NewMessage = serde_json::from_str(
            r#"{"senderId": "alice", "recipientId": "bob", "content": "hi"}"#,
        )
        .unwrap();
        assert_eq!(request, NewMessage::new("alice", "bob", "hi"));
    }
}
