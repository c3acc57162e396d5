use {derive_more::Display, thiserror::Error};

/// The three outbound calls, in the order the verifier makes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Step {
    #[display("auth token")]
    Token,
    #[display("subscription details")]
    Subscription,
    #[display("order details")]
    Order,
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("{0}")]
    Usage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("Failed to get {step}: {source}")]
    Transport {
        step: Step,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to get {step}: {status}")]
    Status { step: Step, status: u16, body: String },

    #[error("Failed to get auth token: response has no access_token")]
    MissingAccessToken,

    #[error("Failed to get orderId from subscription details")]
    MissingOrderId,

    #[error("Failed to get {step}: {source}")]
    Serialization {
        step: Step,
        #[source]
        source: serde_json::Error,
    },

    #[error("output: {0}")]
    Io(#[from] std::io::Error),
}

impl VerifyError {
    /// Status 1 for every failure except an order lookup the provider
    /// rejected or never answered: that one is reported and the run still
    /// exits 0.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Status {
                step: Step::Order, ..
            }
            | Self::Transport {
                step: Step::Order, ..
            } => 0,
            _ => 1,
        }
    }

    /// Raw response body of a failed lookup, printed under the status line.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn step(&self) -> Option<Step> {
        match self {
            Self::Transport { step, .. }
            | Self::Status { step, .. }
            | Self::Serialization { step, .. } => Some(*step),
            Self::MissingAccessToken => Some(Step::Token),
            Self::MissingOrderId => Some(Step::Order),
            _ => None,
        }
    }
}
