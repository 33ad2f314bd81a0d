//! Storage names for message documents
//!
//! Every query and document conversion goes through [`MessageField::name`];
//! the strings below are the only place the stored names appear.

/// Collection holding message documents
pub const MESSAGES_COLLECTION: &str = "messages";

/// Logical fields of a stored message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageField {
    Id,
    SenderId,
    RecipientId,
    SentAt,
    Content,
}

impl MessageField {
    pub const ALL: [MessageField; 5] = [
        MessageField::Id,
        MessageField::SenderId,
        MessageField::RecipientId,
        MessageField::SentAt,
        MessageField::Content,
    ];

    /// Name of the field in stored documents
    pub const fn name(self) -> &'static str {
        match self {
            MessageField::Id => parley_storage::ID_FIELD,
            MessageField::SenderId => "sender_id",
            MessageField::RecipientId => "recipient_id",
            MessageField::SentAt => "sent_at",
            MessageField::Content => "content",
        }
    }
}

impl std::fmt::Display for MessageField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
