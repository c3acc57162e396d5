use {
    play_verify::{cli, config::Config, services::verifier::report_failure},
    std::{env, io, process::ExitCode},
    tracing_subscriber::EnvFilter,
};

#[tokio::main]
async fn main() -> ExitCode {
    let mut stdout = io::stdout().lock();

    // Argument check first: a usage error never touches config or network.
    let invocation = match cli::parse_args(env::args()) {
        Ok(invocation) => invocation,
        Err(err) => {
            report_failure(&err, &mut stdout);
            return ExitCode::from(err.exit_code());
        }
    };

    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "play_verify=warn".into()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            report_failure(&err, &mut stdout);
            return ExitCode::from(err.exit_code());
        }
    };
    tracing::debug!(
        token_endpoint = %config.credentials.token_endpoint,
        api_base = %config.api_base,
        max_retries = config.max_retries,
        "configuration loaded"
    );

    ExitCode::from(cli::run(&invocation, &config, &mut stdout).await)
}
