use crate::bus::{Event, EventBus};
use crate::message::DeliveryStatus;
use crate::resolver;
use crate::store::{ConversationSnapshot, ConversationStore};
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

/// Simulated latency profile for an exchange. The defaults reproduce the
/// original product feel: half a second to "deliver", then 1.5s plus up to a
/// second of jitter of "thinking".
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    pub delivery: Duration,
    pub thinking: Duration,
    pub thinking_jitter: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            delivery: Duration::from_millis(500),
            thinking: Duration::from_millis(1500),
            thinking_jitter: Duration::from_millis(1000),
        }
    }
}

impl Timing {
    /// Thinking delay for one exchange, with the random jitter applied.
    fn thinking_delay(&self) -> Duration {
        if self.thinking_jitter.is_zero() {
            return self.thinking;
        }
        let jitter_ms = self.thinking_jitter.as_millis() as u64;
        self.thinking + Duration::from_millis(rand::thread_rng().gen_range(0..jitter_ms))
    }
}

/// Lifecycle of a single exchange, driven by the two delay timers.
#[derive(Debug, Clone, Copy)]
enum ExchangePhase {
    AwaitingDeliveryAck,
    AwaitingReply,
    Settled,
}

/// Drives exchanges through the store: append the user message, wait out the
/// simulated delivery delay, mark it delivered, wait out the thinking delay,
/// then resolve and append the reply.
///
/// Each submission spawns its own delay task keyed by the user message id, so
/// overlapping exchanges run independently and each one runs to Settled; there
/// is no cancellation path today, but the handles are kept so one could be
/// added.
pub struct ExchangeEngine {
    store: Arc<Mutex<ConversationStore>>,
    bus: Arc<EventBus>,
    timing: Timing,
    in_flight: Arc<Mutex<HashMap<Uuid, JoinHandle<()>>>>,
}

impl ExchangeEngine {
    pub fn new(store: Arc<Mutex<ConversationStore>>, bus: Arc<EventBus>, timing: Timing) -> Self {
        Self {
            store,
            bus,
            timing,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Submit a user utterance and kick off its exchange. Returns the id of
    /// the appended user message, or `None` if the input was whitespace-only
    /// and dropped by the store.
    pub fn submit(&self, text: &str) -> Option<Uuid> {
        let msg = {
            let mut store = self.store.lock().unwrap();
            let id = store.submit_user_message(text)?;
            store.get(id).cloned()?
        };
        let id = msg.id;
        let content = msg.content.clone();

        self.bus.publish(Event::MessageAppended(msg));
        self.bus.publish(Event::ComposingChanged { composing: true });

        let store = self.store.clone();
        let bus = self.bus.clone();
        let in_flight = self.in_flight.clone();
        let delivery = self.timing.delivery;
        let thinking = self.timing.thinking_delay();

        // Hold the map lock across the spawn so the task cannot try to remove
        // its entry before it has been inserted.
        let mut tasks = self.in_flight.lock().unwrap();
        let handle = tokio::spawn(async move {
            debug!(%id, phase = ?ExchangePhase::AwaitingDeliveryAck, "exchange started");
            tokio::time::sleep(delivery).await;
            {
                store.lock().unwrap().mark_delivered(id);
            }
            bus.publish(Event::StatusChanged {
                id,
                status: DeliveryStatus::Delivered,
            });

            debug!(%id, phase = ?ExchangePhase::AwaitingReply, "message delivered");
            tokio::time::sleep(thinking).await;

            let reply_text = resolver::resolve(&content);
            // Append the reply and settle the user message under one lock so
            // observers never see a half-settled exchange.
            let (reply, composing) = {
                let mut store = store.lock().unwrap();
                let reply_id = store.append_assistant_reply(reply_text);
                store.mark_completed(id);
                (store.get(reply_id).cloned(), store.is_composing())
            };
            bus.publish(Event::StatusChanged {
                id,
                status: DeliveryStatus::Completed,
            });
            if let Some(reply) = reply {
                bus.publish(Event::MessageAppended(reply));
            }
            bus.publish(Event::ComposingChanged { composing });

            debug!(%id, phase = ?ExchangePhase::Settled, "exchange settled");
            in_flight.lock().unwrap().remove(&id);
        });
        tasks.insert(id, handle);

        Some(id)
    }

    /// Number of exchanges that have not yet settled.
    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().unwrap().len()
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        self.store.lock().unwrap().snapshot()
    }
}
