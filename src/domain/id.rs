use derive_more::Display;

use super::error::VerifyError;

fn non_empty(kind: &str, id: String) -> Result<String, VerifyError> {
    if id.is_empty() {
        return Err(VerifyError::Validation(format!("{kind} must not be empty")));
    }
    Ok(id)
}

/// Subscription SKU as configured in the Play Console (`sub_premium`).
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Result<Self, VerifyError> {
        non_empty("ProductId", id.into()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Opaque purchase token handed to the app by Google Play billing.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub struct PurchaseToken(String);

impl PurchaseToken {
    pub fn new(token: impl Into<String>) -> Result<Self, VerifyError> {
        non_empty("PurchaseToken", token.into()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Google order identifier (`GPA.1234-5678-9012-34567`).
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Result<Self, VerifyError> {
        non_empty("OrderId", id.into()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
