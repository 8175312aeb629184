use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

mod bus;
mod engine;
mod message;
mod resolver;
mod store;

use bus::{Event, EventBus, NotificationLevel};
use engine::{ExchangeEngine, Timing};
use message::{Message, Sender};
use store::ConversationStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with default filter if RUST_LOG is not set
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    info!("DecentraGPT conversation core starting...");

    let bus = Arc::new(EventBus::new());
    let store = Arc::new(Mutex::new(ConversationStore::new()));
    let engine = Arc::new(ExchangeEngine::new(
        store.clone(),
        bus.clone(),
        Timing::default(),
    ));

    let render_handle = tokio::spawn(render_loop(bus.subscribe()));

    bus.publish(Event::SystemNotification {
        level: NotificationLevel::Success,
        message: "Conversation core ready".to_string(),
    });

    // Show the seeded greeting and the quick-reply prompts, the way the chat
    // panel does before the first user message.
    for msg in engine.snapshot().messages {
        render_message(&msg);
    }
    println!("Try: {}", resolver::QUICK_REPLIES.join(" | "));

    let input_engine = engine.clone();
    let input_bus = bus.clone();
    let input_handle = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    // Empty lines are dropped by the store; nothing to report.
                    input_engine.submit(&line);
                }
                Ok(None) => break,
                Err(e) => {
                    input_bus.publish(Event::SystemNotification {
                        level: NotificationLevel::Error,
                        message: format!("Failed to read input: {}", e),
                    });
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = render_handle => {
            error!("Render loop stopped unexpectedly");
        }
        _ = input_handle => {
            info!("Input closed, draining in-flight exchanges...");
            while engine.in_flight() > 0 {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
    }

    Ok(())
}

/// Minimal terminal render surface: draws assistant bubbles and the typing
/// indicator from bus events. A real UI would consume the same stream.
async fn render_loop(mut rx: broadcast::Receiver<Event>) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                if let Ok(json) = serde_json::to_string(&event) {
                    debug!(event = %json, "bus event");
                }
                render_event(&event);
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "render surface lagged behind the bus");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn render_event(event: &Event) {
    match event {
        Event::MessageAppended(msg) => render_message(msg),
        Event::ComposingChanged { composing: true } => {
            println!("DecentraGPT is typing...");
        }
        Event::ComposingChanged { composing: false } => {}
        Event::StatusChanged { id, status } => {
            debug!(%id, ?status, "delivery status changed");
        }
        Event::SystemNotification { level, message } => match level {
            NotificationLevel::Warning | NotificationLevel::Error => warn!("{}", message),
            NotificationLevel::Info | NotificationLevel::Success => info!("{}", message),
        },
    }
}

fn render_message(msg: &Message) {
    let who = match msg.sender {
        Sender::User => "You",
        Sender::Assistant => "DecentraGPT",
    };
    println!("[{}] {}: {}", msg.created_at.format("%H:%M:%S"), who, msg.content);
}
