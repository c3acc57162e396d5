use {
    crate::domain::error::VerifyError,
    std::{env, fmt, str::FromStr, time::Duration},
};

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/androidpublisher/v3";

/// OAuth client credentials for the refresh-token grant.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub token_endpoint: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("refresh_token", &"***")
            .field("token_endpoint", &self.token_endpoint)
            .finish()
    }
}

/// Everything the verifier needs from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub api_base: String,
    pub timeout: Duration,
    /// Extra attempts after the first one; `0` means a single call.
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, VerifyError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't have to
    /// touch the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, VerifyError> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| VerifyError::Config(format!("{key} must be set")))
        };

        let timeout_secs: u64 = parse_or(&lookup, "GOOGLE_PLAY_TIMEOUT_SECS", 30)?;
        if timeout_secs == 0 {
            return Err(VerifyError::Config(
                "GOOGLE_PLAY_TIMEOUT_SECS must be greater than 0".into(),
            ));
        }

        Ok(Config {
            credentials: Credentials {
                client_id: required("GOOGLE_PLAY_CLIENT_ID")?,
                client_secret: required("GOOGLE_PLAY_CLIENT_SECRET")?,
                refresh_token: required("GOOGLE_PLAY_REFRESH_TOKEN")?,
                token_endpoint: required("GOOGLE_PLAY_ACCESS_URL")?,
            },
            api_base: lookup("GOOGLE_PLAY_API_BASE")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_API_BASE.into()),
            timeout: Duration::from_secs(timeout_secs),
            max_retries: parse_or(&lookup, "GOOGLE_PLAY_MAX_RETRIES", 0)?,
            retry_delay: Duration::from_millis(parse_or(
                &lookup,
                "GOOGLE_PLAY_RETRY_DELAY_MS",
                500,
            )?),
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, VerifyError> {
    match lookup(key).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| VerifyError::Config(format!("invalid {key}: {raw}"))),
    }
}
