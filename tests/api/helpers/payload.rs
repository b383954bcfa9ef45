use serde_json::{Value, json};

pub fn register_user() -> Value {
    json!({
        "username": "john_doe",
        "email": "john.doe@example.com",
        "password": "secure_password_123",
    })
}

pub fn login_user() -> Value {
    json!({
        "username": "john_doe",
        "password": "secure_password_123",
    })
}

pub fn analyze_email() -> Value {
    json!({
        "email_text": "Thanks so much, this is great!",
    })
}

// -----------------------------------------------------------------------------

/// Billing-generation creation event, keyed by the customer's email.
///
pub fn subscription_created(email: &str) -> Value {
    json!({
        "event_type": "subscription.created",
        "data": {
            "id": "sub_123",
            "status": "active",
            "items": [{ "price": { "id": "pri_456" } }],
            "custom_data": { "email": email }
        }
    })
}

/// Billing-generation update event, keyed by the subscription id.
///
pub fn subscription_updated(subscription_id: &str, status: &str) -> Value {
    json!({
        "event_type": "subscription.updated",
        "data": {
            "id": subscription_id,
            "status": status,
        }
    })
}

/// Classic-generation cancellation alert with flat, numeric-ish fields.
///
pub fn subscription_cancelled(subscription_id: &str) -> Value {
    json!({
        "alert_name": "subscription_cancelled",
        "subscription_id": subscription_id,
        "email": "john.doe@example.com",
        "status": "deleted",
    })
}
