//! Redeem one ticket against the configured database.
//!
//! ```text
//! redeem-ticket <ticket-id> <actor-user-id>
//! ```
//!
//! Prints the redeemed ticket as JSON. Exits non-zero with the error message
//! when the redemption is refused.

use anyhow::{Context, bail};
use community_tickets::stores::postgres;
use community_tickets::{Config, TicketRedemptionService, UserId, UserTicketId};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    format!("{},community_tickets=debug,sqlx=warn", config.log_level).into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(ticket_id), Some(actor_id), None) = (args.next(), args.next(), args.next()) else {
        bail!("usage: redeem-ticket <ticket-id> <actor-user-id>");
    };
    let ticket_id: UserTicketId = ticket_id.parse().context("invalid ticket id")?;
    let actor_id: UserId = actor_id.parse().context("invalid actor user id")?;

    tracing::info!(
        max_connections = config.postgres.max_connections,
        timeout_ms = config.redemption.timeout_ms,
        "Configuration loaded"
    );

    let pool = postgres::connect(&config.postgres).await?;
    postgres::migrate(&pool).await?;

    let service = TicketRedemptionService::new(postgres::environment(&pool))
        .with_timeout(config.redemption.timeout());

    match service.redeem_user_ticket(ticket_id, actor_id).await {
        Ok(ticket) => {
            println!("{}", serde_json::to_string_pretty(&ticket)?);
            Ok(())
        },
        Err(error) => bail!(error),
    }
}
