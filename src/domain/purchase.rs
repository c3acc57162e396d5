use {
    super::id::OrderId,
    serde::Deserialize,
    serde_json::{Map, Value},
    std::fmt,
};

/// Bearer token returned by the refresh-token grant. Lives for one run.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// `None` for an empty token: the token endpoint answered 200 but gave
    /// us nothing usable.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        (!token.is_empty()).then_some(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `purchases.subscriptions.get` response. Kept opaque apart from `orderId`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionRecord(Map<String, Value>);

impl SubscriptionRecord {
    /// `orderId` if it is a non-empty string. Missing, `null`, `""` and
    /// non-string values all read as absent; whitespace is passed through.
    pub fn order_id(&self) -> Option<OrderId> {
        self.0
            .get("orderId")
            .and_then(Value::as_str)
            .and_then(|id| OrderId::new(id).ok())
    }
}

impl fmt::Display for SubscriptionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.0.clone()))
    }
}

/// `purchases.orders.get` response, opaque.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct OrderRecord(Map<String, Value>);

impl fmt::Display for OrderRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.0.clone()))
    }
}
