use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a message. The conversation only ever has two parties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// Payload kind. Image and file attachments exist in the data model but the
/// engine only ever produces `Text`; the attachment controls are placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
    File,
}

/// Delivery lifecycle of a message. Transitions only move forward:
/// Pending -> Delivered -> Completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Pending,
    Delivered,
    Completed,
}

impl DeliveryStatus {
    /// The only legal successor of this status, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            DeliveryStatus::Pending => Some(DeliveryStatus::Delivered),
            DeliveryStatus::Delivered => Some(DeliveryStatus::Completed),
            DeliveryStatus::Completed => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub content: String,
    pub sender: Sender,
    pub created_at: DateTime<Utc>,
    pub status: DeliveryStatus,
    pub kind: MessageKind,
}

impl Message {
    /// A freshly submitted user message, awaiting simulated delivery.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            sender: Sender::User,
            created_at: Utc::now(),
            status: DeliveryStatus::Pending,
            kind: MessageKind::Text,
        }
    }

    /// An assistant reply. Replies are born settled; there is no delivery
    /// simulation on the assistant side.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            sender: Sender::Assistant,
            created_at: Utc::now(),
            status: DeliveryStatus::Completed,
            kind: MessageKind::Text,
        }
    }
}
