use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Cloneable handle for emitting domain events from services.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing when the consumer is
    /// gone. Event delivery never fails a business operation.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            error!("Event delivery failed: {}", e);
        }
    }
}

// The events emitted by the storefront services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Catalog events
    ProductCreated(Uuid),
    CategoryCreated(Uuid),

    // Cart events
    CartItemAdded {
        session_id: String,
        product_id: Uuid,
        quantity: i32,
    },
    CartItemUpdated {
        session_id: String,
        item_id: Uuid,
    },
    CartItemRemoved {
        session_id: String,
        item_id: Uuid,
    },
    CartCleared {
        session_id: String,
    },

    // Order events
    OrderCreated(Uuid),
    OrderStatusChanged {
        order_id: Uuid,
        old_status: String,
        new_status: String,
    },

    // User events
    UserRegistered(Uuid),
}

// Consumes events off the channel and reacts to them. Today the
// reactions are log lines; anything heavier (mail, webhooks) would hang
// off the same match.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::OrderCreated(order_id) => {
                info!("Order placed: {}", order_id);
            }
            Event::OrderStatusChanged {
                order_id,
                old_status,
                new_status,
            } => {
                info!(
                    "Order {} moved from {} to {}",
                    order_id, old_status, new_status
                );
            }
            Event::CartItemAdded {
                session_id,
                product_id,
                quantity,
            } => {
                info!(
                    "Cart for session {} gained {} x {}",
                    session_id, quantity, product_id
                );
            }
            Event::UserRegistered(user_id) => {
                info!("User registered: {}", user_id);
            }
            _ => {
                info!("No specific handler for event: {:?}", event);
            }
        }
    }

    warn!("Event processing loop has ended");
}
