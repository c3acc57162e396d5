use {
    crate::{
        config::{Config, Credentials},
        domain::{
            error::{Step, VerifyError},
            id::{OrderId, ProductId, PurchaseToken},
            provider::{PlayProvider, ProviderFuture},
            purchase::{AccessToken, OrderRecord, SubscriptionRecord},
        },
    },
    reqwest::{StatusCode, Url, header},
    serde::{Deserialize, de::DeserializeOwned},
    std::time::Duration,
};

/// Android package whose purchases this tool inspects.
pub const PACKAGE_NAME: &str = "com.nettica.agent";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Request context for the Play Developer API: credentials, endpoints and
/// the timeout/retry policy shared by all three calls.
pub struct GooglePlayClient {
    http: reqwest::Client,
    credentials: Credentials,
    api_base: Url,
    max_retries: u32,
    retry_delay: Duration,
}

impl GooglePlayClient {
    pub fn new(config: &Config) -> Result<Self, VerifyError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| VerifyError::Config(format!("http client: {e}")))?;

        let api_base = Url::parse(&config.api_base).map_err(|e| {
            VerifyError::Config(format!("invalid API base {}: {e}", config.api_base))
        })?;
        if api_base.cannot_be_a_base() {
            return Err(VerifyError::Config(format!(
                "invalid API base: {}",
                config.api_base
            )));
        }

        Ok(Self {
            http,
            credentials: config.credentials.clone(),
            api_base,
            max_retries: config.max_retries,
            retry_delay: config.retry_delay,
        })
    }

    /// `{api_base}/applications/{package}/purchases/subscriptions/{product}/tokens/{token}`
    pub fn subscription_url(&self, product_id: &ProductId, purchase_token: &PurchaseToken) -> Url {
        self.endpoint(&[
            "applications",
            PACKAGE_NAME,
            "purchases",
            "subscriptions",
            product_id.as_str(),
            "tokens",
            purchase_token.as_str(),
        ])
    }

    /// `{api_base}/applications/{package}/purchases/orders/{order_id}`
    pub fn order_url(&self, order_id: &OrderId) -> Url {
        self.endpoint(&[
            "applications",
            PACKAGE_NAME,
            "purchases",
            "orders",
            order_id.as_str(),
        ])
    }

    // Each segment is percent-encoded on its own, so ids can't inject '/' or '?'.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn acquire_token_inner(&self) -> Result<AccessToken, VerifyError> {
        let creds = &self.credentials;
        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("refresh_token", creds.refresh_token.as_str()),
        ];

        let body: TokenResponse = self
            .send_json(Step::Token, || self.http.post(&creds.token_endpoint).form(&form))
            .await?;

        let token = body
            .access_token
            .and_then(AccessToken::new)
            .ok_or(VerifyError::MissingAccessToken)?;
        tracing::debug!("access token acquired");
        Ok(token)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        step: Step,
        token: &AccessToken,
        url: Url,
    ) -> Result<T, VerifyError> {
        self.send_json(step, || {
            self.http
                .get(url.clone())
                .header(header::AUTHORIZATION, token.bearer())
                .header(header::ACCEPT, "application/json")
        })
        .await
    }

    /// Sends the request built by `build`, retrying transport errors, 429 and
    /// 5xx with a linear backoff. Any other non-200 is returned as-is.
    async fn send_json<T: DeserializeOwned>(
        &self,
        step: Step,
        build: impl Fn() -> reqwest::RequestBuilder,
    ) -> Result<T, VerifyError> {
        let attempts = self.max_retries.saturating_add(1);
        let mut attempt = 1;

        loop {
            let last = attempt >= attempts;
            let response = match build().send().await {
                Ok(response) => response,
                Err(source) if !last => {
                    self.backoff(step, attempt, attempts, &source).await;
                    attempt += 1;
                    continue;
                }
                Err(source) => return Err(VerifyError::Transport { step, source }),
            };

            let status = response.status();
            if status == StatusCode::OK {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|source| VerifyError::Transport { step, source })?;
                return serde_json::from_slice(&bytes)
                    .map_err(|source| VerifyError::Serialization { step, source });
            }

            let body = response.text().await.unwrap_or_default();
            if is_transient(status) && !last {
                self.backoff(step, attempt, attempts, &status).await;
                attempt += 1;
                continue;
            }

            tracing::warn!(%step, status = status.as_u16(), attempt, "request failed");
            return Err(VerifyError::Status {
                step,
                status: status.as_u16(),
                body,
            });
        }
    }

    async fn backoff(
        &self,
        step: Step,
        attempt: u32,
        attempts: u32,
        cause: impl std::fmt::Display,
    ) {
        let delay = self.retry_delay.saturating_mul(attempt);
        tracing::warn!(
            %step,
            attempt,
            max_attempts = attempts,
            delay_ms = delay.as_millis() as u64,
            "request failed; retrying: {cause}"
        );
        tokio::time::sleep(delay).await;
    }
}

fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

impl PlayProvider for GooglePlayClient {
    fn acquire_token(&self) -> ProviderFuture<'_, AccessToken> {
        Box::pin(self.acquire_token_inner())
    }

    fn fetch_subscription<'a>(
        &'a self,
        token: &'a AccessToken,
        product_id: &'a ProductId,
        purchase_token: &'a PurchaseToken,
    ) -> ProviderFuture<'a, SubscriptionRecord> {
        let url = self.subscription_url(product_id, purchase_token);
        Box::pin(self.get_json(Step::Subscription, token, url))
    }

    fn fetch_order<'a>(
        &'a self,
        token: &'a AccessToken,
        order_id: &'a OrderId,
    ) -> ProviderFuture<'a, OrderRecord> {
        let url = self.order_url(order_id);
        Box::pin(self.get_json(Step::Order, token, url))
    }
}
