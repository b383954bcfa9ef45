use crate::model::queries;
use crate::model::types::SubscriptionStatus;
use crate::paddle::{EventKind, WebhookEvent};
use crate::prelude::{Error, Result};
use sqlx::PgPool;

/// Applies one provider event to the account store.
///
/// Creation events are keyed by email, everything else by subscription id.
/// Events referencing unknown users or subscriptions are logged no-ops; the
/// webhook endpoint acknowledges the provider either way.
///
/// # Arguments
///
/// * `pool`: Database connection pool.
/// * `event`: Parsed provider event.
///
pub async fn apply(pool: &PgPool, event: &WebhookEvent) -> Result<()> {
    match event.kind {
        EventKind::SubscriptionCreated => {
            let email = required(event.email.as_deref(), "email")?;
            let subscription_id = required(event.subscription_id.as_deref(), "subscription id")?;

            let updated =
                queries::start_subscription(pool, email, subscription_id, event.plan_id.as_deref())
                    .await?;
            match updated {
                true => {
                    tracing::info!(target: "service", subscription_id, "Subscription activated")
                }
                false => {
                    tracing::warn!(target: "service", "Creation event for unknown email")
                }
            }
        }
        EventKind::SubscriptionUpdated => {
            let subscription_id = required(event.subscription_id.as_deref(), "subscription id")?;
            let status = SubscriptionStatus::from(required(event.status.as_deref(), "status")?);

            let updated =
                queries::update_subscription_status(pool, subscription_id, status).await?;
            match updated {
                true => {
                    tracing::info!(target: "service", subscription_id, %status, "Subscription updated")
                }
                false => {
                    tracing::warn!(target: "service", subscription_id, "Update event for unknown subscription")
                }
            }
        }
        EventKind::SubscriptionCancelled => {
            let subscription_id = required(event.subscription_id.as_deref(), "subscription id")?;

            let updated = queries::cancel_subscription(pool, subscription_id).await?;
            match updated {
                true => {
                    tracing::info!(target: "service", subscription_id, "Subscription cancelled")
                }
                false => {
                    tracing::warn!(target: "service", subscription_id, "Cancellation event for unknown subscription")
                }
            }
        }
        EventKind::PaymentSucceeded => {
            // No state transition for payments in this system.
            tracing::info!(target: "service", subscription_id = ?event.subscription_id, "Payment succeeded");
        }
        EventKind::Unknown => {
            tracing::debug!(target: "service", "Ignoring unknown webhook event");
        }
    }

    Ok(())
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str> {
    value.ok_or_else(|| Error::Any(format!("Webhook event missing {field}")))
}
