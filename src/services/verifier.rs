use {
    crate::domain::{
        error::VerifyError,
        id::{ProductId, PurchaseToken},
        provider::PlayProvider,
        purchase::{AccessToken, OrderRecord, SubscriptionRecord},
    },
    std::io::Write,
};

/// One run's input: which subscription purchase to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub product_id: ProductId,
    pub purchase_token: PurchaseToken,
}

/// Everything gathered by a successful run.
#[derive(Debug)]
pub struct Verification {
    pub token: AccessToken,
    pub subscription: SubscriptionRecord,
    pub order: OrderRecord,
}

/// Token → subscription → order. Each line of the report is written as soon
/// as its step succeeds; the first failing step ends the run.
pub async fn verify(
    provider: &dyn PlayProvider,
    invocation: &Invocation,
    out: &mut impl Write,
) -> Result<Verification, VerifyError> {
    let token = provider.acquire_token().await?;
    writeln!(out, "Auth Token: {token}")?;

    let subscription = provider
        .fetch_subscription(&token, &invocation.product_id, &invocation.purchase_token)
        .await?;
    writeln!(out, "Subscription Details: {subscription}")?;

    let Some(order_id) = subscription.order_id() else {
        tracing::warn!(
            product_id = %invocation.product_id,
            "subscription has no orderId"
        );
        return Err(VerifyError::MissingOrderId);
    };
    tracing::info!(order_id = %order_id, "subscription resolved to order");

    let order = provider.fetch_order(&token, &order_id).await?;
    writeln!(out, "Order Details: {order}")?;

    Ok(Verification {
        token,
        subscription,
        order,
    })
}

/// Prints a failure the way the report does: the summary line, then the raw
/// response body when there is one.
pub fn report_failure(err: &VerifyError, out: &mut impl Write) {
    // Nothing sensible left to do if stdout itself is gone.
    let _ = writeln!(out, "{err}");
    if let Some(body) = err.body() {
        let _ = writeln!(out, "{body}");
    }
}
