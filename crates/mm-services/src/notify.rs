//! Best-effort notification delivery

use mm_notifications::EmailMessage;

use crate::context::ServiceContext;

/// Send `message`, logging instead of failing when delivery does not work
pub async fn deliver(ctx: &ServiceContext, message: EmailMessage) {
    if !ctx.send_notifications {
        return;
    }
    match ctx.email.send(&message).await {
        Ok(id) => tracing::debug!(id = %id, subject = %message.subject, "notification sent"),
        Err(e) => tracing::warn!(
            error = %e,
            to = %message.recipients(),
            subject = %message.subject,
            "notification could not be delivered"
        ),
    }
}
