use {
    super::error::VerifyError,
    super::id::{OrderId, ProductId, PurchaseToken},
    super::purchase::{AccessToken, OrderRecord, SubscriptionRecord},
    std::{future::Future, pin::Pin},
};

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, VerifyError>> + Send + 'a>>;

/// The three Play Developer API calls the verifier chains together.
pub trait PlayProvider: Send + Sync {
    /// Exchange the configured refresh token for a short-lived access token.
    fn acquire_token(&self) -> ProviderFuture<'_, AccessToken>;

    fn fetch_subscription<'a>(
        &'a self,
        token: &'a AccessToken,
        product_id: &'a ProductId,
        purchase_token: &'a PurchaseToken,
    ) -> ProviderFuture<'a, SubscriptionRecord>;

    fn fetch_order<'a>(
        &'a self,
        token: &'a AccessToken,
        order_id: &'a OrderId,
    ) -> ProviderFuture<'a, OrderRecord>;
}
