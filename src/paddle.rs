pub mod signature;

// -----------------------------------------------------------------------------

use derive_more::Display;
use serde_json::Value;

/// The closed set of provider events this system reacts to. Everything else
/// parses to `Unknown` and is acknowledged without side effects, so new
/// provider versions stay additive.
///
#[derive(Debug, Clone, Copy, PartialEq, Display)]
pub enum EventKind {
    SubscriptionCreated,
    SubscriptionUpdated,
    SubscriptionCancelled,
    PaymentSucceeded,
    Unknown,
}

impl From<&str> for EventKind {
    fn from(value: &str) -> Self {
        match value {
            "subscription_created" | "subscription.created" => EventKind::SubscriptionCreated,
            "subscription_updated" | "subscription.updated" => EventKind::SubscriptionUpdated,
            "subscription_cancelled" | "subscription.canceled" => EventKind::SubscriptionCancelled,
            "subscription_payment_succeeded" | "transaction.completed" => {
                EventKind::PaymentSucceeded
            }
            _ => EventKind::Unknown,
        }
    }
}

/// A provider event reduced to the fields the account store cares about.
///
#[derive(Debug, Clone)]
pub struct WebhookEvent {
    pub kind: EventKind,
    pub subscription_id: Option<String>,
    pub plan_id: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
}

/// Parses either payload generation into a [`WebhookEvent`].
///
/// Billing payloads carry `event_type` and nest their fields under `data`;
/// classic alerts are flat and use `alert_name`. Field names differ between
/// the two, the meaning does not.
///
pub fn parse_event(payload: &Value) -> WebhookEvent {
    if payload.get("event_type").is_some() {
        WebhookEvent {
            kind: kind_at(payload, "/event_type"),
            subscription_id: string_at(payload, "/data/id"),
            plan_id: string_at(payload, "/data/items/0/price/id"),
            email: string_at(payload, "/data/custom_data/email"),
            status: string_at(payload, "/data/status"),
        }
    } else {
        WebhookEvent {
            kind: kind_at(payload, "/alert_name"),
            subscription_id: string_at(payload, "/subscription_id"),
            plan_id: string_at(payload, "/subscription_plan_id"),
            email: string_at(payload, "/email"),
            status: string_at(payload, "/status"),
        }
    }
}

fn kind_at(payload: &Value, pointer: &str) -> EventKind {
    payload
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(EventKind::from)
        .unwrap_or(EventKind::Unknown)
}

// Classic alerts stringify numeric identifiers inconsistently.
fn string_at(payload: &Value, pointer: &str) -> Option<String> {
    match payload.pointer(pointer)? {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

// -----------------------------------------------------------------------------
