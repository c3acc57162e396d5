use {
    crate::{
        adapters::google_play::GooglePlayClient,
        config::Config,
        domain::{
            error::VerifyError,
            id::{ProductId, PurchaseToken},
        },
        services::verifier::{Invocation, report_failure, verify},
    },
    std::io::Write,
};

pub const USAGE: &str = "Usage: play_verify <product_id> <subscription_token>";

/// Parses the full argv (program name first). Anything other than exactly
/// two non-empty positional arguments is a usage error.
pub fn parse_args<I, S>(args: I) -> Result<Invocation, VerifyError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().skip(1).map(Into::into).collect();
    let usage = || VerifyError::Usage(USAGE.to_string());

    let [product_id, purchase_token]: [String; 2] = args.try_into().map_err(|_| usage())?;

    Ok(Invocation {
        product_id: ProductId::new(product_id).map_err(|_| usage())?,
        purchase_token: PurchaseToken::new(purchase_token).map_err(|_| usage())?,
    })
}

/// Runs one verification against the configured endpoints and returns the
/// process exit status. Report and diagnostics both go to `out`.
pub async fn run(invocation: &Invocation, config: &Config, out: &mut impl Write) -> u8 {
    let result = match GooglePlayClient::new(config) {
        Ok(client) => verify(&client, invocation, out).await.map(|_| ()),
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => 0,
        Err(err) => {
            tracing::debug!(step = ?err.step(), error = %err, "verification failed");
            report_failure(&err, out);
            err.exit_code()
        }
    }
}
