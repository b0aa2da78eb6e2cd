//! Retry policy walkthrough
//!
//! Builds a strategy registry from TOML, then runs a flaky simulated
//! connection through the blocking and async drivers, including a
//! cancelled run.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --example retry_policies
//!
//! # Show per-attempt driver logs
//! RUST_LOG=turboretry=debug cargo run --example retry_policies
//! ```

use anyhow::Context;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use turboretry::prelude::*;

const CONFIG: &str = r#"
default_strategy = "commands"

[categories]
connection = "connect"

[[strategies]]
name = "connect"
type = "exponential_backoff"
retry_count = 5
min_backoff_ms = 50
max_backoff_ms = 2000
delta_backoff_ms = 100

[[strategies]]
name = "commands"
type = "fixed_interval"
retry_count = 3
retry_interval_ms = 100
"#;

#[derive(Debug)]
enum LinkError {
    Refused,
    BadCredentials,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Refused => write!(f, "connection refused"),
            Self::BadCredentials => write!(f, "bad credentials"),
        }
    }
}

impl std::error::Error for LinkError {}

fn is_refused(err: &LinkError) -> bool {
    matches!(err, LinkError::Refused)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let registry = RetryConfig::from_toml_str(CONFIG)
        .context("parsing retry configuration")?
        .into_registry()
        .context("building strategy registry")?;
    println!("Registered strategies: {:?}\n", registry.names());

    let connect = registry.policy_for_category(category::CONNECTION, is_refused)?;
    connect.on_retry(|event| {
        println!(
            "  retry #{} in {:?} after: {}",
            event.attempt, event.delay, event.error
        );
    });

    println!("Async connect, refused three times:");
    let attempts = AtomicU32::new(0);
    let completion = connect
        .execute_async(
            || {
                let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n <= 3 {
                        return Err(AttemptError::Error(LinkError::Refused));
                    }
                    Ok(format!("session-{n}"))
                }
            },
            None,
        )
        .await;
    println!("  -> {completion:?}\n");

    println!("Blocking command, fatal error:");
    let command = registry.policy_for_category(category::COMMAND, is_refused)?;
    let result: Result<(), LinkError> =
        command.execute(|| Err(AttemptError::Error(LinkError::BadCredentials)));
    println!("  -> {result:?}\n");

    println!("Async connect, cancelled during a wait:");
    let token = CancellationToken::new();
    let refused = Arc::new(AtomicU32::new(0));
    let handle = connect.spawn(
        {
            let refused = Arc::clone(&refused);
            move || {
                refused.fetch_add(1, Ordering::SeqCst);
                async { Err::<String, _>(AttemptError::Error(LinkError::Refused)) }
            }
        },
        Some(token.clone()),
    );
    tokio::time::sleep(Duration::from_millis(150)).await;
    token.cancel();
    let completion = handle.await?;
    println!(
        "  -> {completion:?} after {} attempts",
        refused.load(Ordering::SeqCst)
    );

    Ok(())
}
