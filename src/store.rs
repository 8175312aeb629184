use crate::message::{DeliveryStatus, Message, Sender};
use crate::resolver;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

/// Read-only view of the conversation handed to the render surface. Holds
/// clones, so the surface can never mutate store internals through it.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSnapshot {
    pub messages: Vec<Message>,
    pub composing: bool,
}

/// The authoritative, append-only message sequence of the single in-memory
/// conversation, plus the "assistant is composing" indicator.
///
/// The store is a closed state machine: none of its operations can fail.
/// Invalid transitions (e.g. completing a message that was never delivered)
/// are silently ignored rather than surfaced as errors.
#[derive(Debug)]
pub struct ConversationStore {
    messages: Vec<Message>,
    /// Most recently initiated unsettled exchange, if any. When exchanges
    /// overlap the indicator tracks the last-submitted one; see `mark_completed`.
    composing_for: Option<Uuid>,
}

impl ConversationStore {
    /// A fresh conversation, seeded with the assistant greeting.
    pub fn new() -> Self {
        Self {
            messages: vec![Message::assistant(resolver::GREETING_SEED)],
            composing_for: None,
        }
    }

    /// Append a user message and flag the assistant as composing.
    ///
    /// Whitespace-only input is dropped without error, mirroring a disabled
    /// send button. Returns the new message's id, or `None` if dropped.
    pub fn submit_user_message(&mut self, text: &str) -> Option<Uuid> {
        if text.trim().is_empty() {
            debug!("ignoring empty submission");
            return None;
        }
        let msg = Message::user(text);
        let id = msg.id;
        self.messages.push(msg);
        self.composing_for = Some(id);
        Some(id)
    }

    /// Transition a user message from Pending to Delivered. No-op for any
    /// other state, so repeated calls with the same id are harmless.
    pub fn mark_delivered(&mut self, id: Uuid) {
        self.advance(id, DeliveryStatus::Pending);
    }

    /// Transition a user message from Delivered to Completed, settling its
    /// exchange. Clears the composing indicator only if this exchange is the
    /// one the indicator currently tracks (last-submitted-wins when exchanges
    /// overlap).
    pub fn mark_completed(&mut self, id: Uuid) {
        self.advance(id, DeliveryStatus::Delivered);
        if self.composing_for == Some(id) {
            self.composing_for = None;
        }
    }

    /// Append a settled assistant reply. The caller pairs this with
    /// `mark_completed` on the originating user message under a single lock
    /// acquisition so the whole exchange settles atomically for observers.
    pub fn append_assistant_reply(&mut self, text: &str) -> Uuid {
        let msg = Message::assistant(text);
        let id = msg.id;
        self.messages.push(msg);
        id
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        ConversationSnapshot {
            messages: self.messages.clone(),
            composing: self.is_composing(),
        }
    }

    pub fn is_composing(&self) -> bool {
        self.composing_for.is_some()
    }

    pub fn get(&self, id: Uuid) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Advance a user message one stage, but only if it currently sits at
    /// `from`. Anything else (unknown id, assistant message, wrong stage) is
    /// ignored, which makes repeated and out-of-order calls harmless.
    fn advance(&mut self, id: Uuid, from: DeliveryStatus) {
        let Some(to) = from.next() else {
            return;
        };
        let Some(msg) = self.messages.iter_mut().find(|m| m.id == id) else {
            debug!(%id, "status transition for unknown message ignored");
            return;
        };
        if msg.sender != Sender::User || msg.status != from {
            debug!(%id, current = ?msg.status, requested = ?to, "status transition ignored");
            return;
        }
        msg.status = to;
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_holds_only_the_seeded_greeting() {
        let store = ConversationStore::new();
        let snap = store.snapshot();
        assert_eq!(snap.messages.len(), 1);
        assert_eq!(snap.messages[0].sender, Sender::Assistant);
        assert_eq!(snap.messages[0].status, DeliveryStatus::Completed);
        assert_eq!(snap.messages[0].content, resolver::GREETING_SEED);
        assert!(!snap.composing);
    }

    #[test]
    fn submit_appends_one_pending_message() {
        let mut store = ConversationStore::new();
        let before = store.snapshot().messages.len();
        let id = store.submit_user_message("hello").expect("non-empty submit");
        assert_eq!(store.snapshot().messages.len(), before + 1);
        let msg = store.get(id).unwrap();
        assert_eq!(msg.sender, Sender::User);
        assert_eq!(msg.status, DeliveryStatus::Pending);
        assert!(store.is_composing());
    }

    #[test]
    fn whitespace_submit_is_a_no_op() {
        let mut store = ConversationStore::new();
        let before = store.snapshot().messages.len();
        assert!(store.submit_user_message("   ").is_none());
        assert!(store.submit_user_message("").is_none());
        assert!(store.submit_user_message("\n\t ").is_none());
        assert_eq!(store.snapshot().messages.len(), before);
        assert!(!store.is_composing());
    }

    #[test]
    fn status_never_skips_or_regresses() {
        let mut store = ConversationStore::new();
        let id = store.submit_user_message("hi").unwrap();

        // Completing a pending message must not skip the delivered stage.
        store.mark_completed(id);
        assert_eq!(store.get(id).unwrap().status, DeliveryStatus::Pending);

        store.mark_delivered(id);
        assert_eq!(store.get(id).unwrap().status, DeliveryStatus::Delivered);

        // Re-delivering a delivered message changes nothing.
        store.mark_delivered(id);
        assert_eq!(store.get(id).unwrap().status, DeliveryStatus::Delivered);

        store.mark_completed(id);
        assert_eq!(store.get(id).unwrap().status, DeliveryStatus::Completed);

        // Terminal state is sticky.
        store.mark_delivered(id);
        store.mark_completed(id);
        assert_eq!(store.get(id).unwrap().status, DeliveryStatus::Completed);
    }

    #[test]
    fn mark_delivered_is_idempotent_per_state() {
        let mut store = ConversationStore::new();
        let id = store.submit_user_message("hi").unwrap();
        store.mark_delivered(id);
        store.mark_delivered(id);
        assert_eq!(store.get(id).unwrap().status, DeliveryStatus::Delivered);
    }

    #[test]
    fn settling_clears_the_composing_flag() {
        let mut store = ConversationStore::new();
        let id = store.submit_user_message("hello").unwrap();
        store.mark_delivered(id);
        store.append_assistant_reply(resolver::GREETING_REPLY);
        store.mark_completed(id);
        assert!(!store.is_composing());
    }

    #[test]
    fn composing_tracks_the_last_submitted_exchange() {
        let mut store = ConversationStore::new();
        let first = store.submit_user_message("hello").unwrap();
        let second = store.submit_user_message("asdkjasd").unwrap();

        // The earlier exchange settling must not clear the indicator while
        // the later one is still in flight.
        store.mark_delivered(first);
        store.append_assistant_reply(resolver::GREETING_REPLY);
        store.mark_completed(first);
        assert!(store.is_composing());

        store.mark_delivered(second);
        store.append_assistant_reply(resolver::FALLBACK_REPLY);
        store.mark_completed(second);
        assert!(!store.is_composing());
    }

    #[test]
    fn transitions_on_assistant_messages_are_ignored() {
        let mut store = ConversationStore::new();
        let seed_id = store.snapshot().messages[0].id;
        store.mark_delivered(seed_id);
        assert_eq!(store.get(seed_id).unwrap().status, DeliveryStatus::Completed);
    }
}
