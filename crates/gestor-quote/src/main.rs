use anyhow::{Context, Result};
use chrono::Utc;
use gestor_inventory::valuate_inventory;
use gestor_platform::{PricingConfig, QuoteRequest, QuoteResponse};
use gestor_pricing::{PricingEngine, overhead_pool, round_currency};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "gestor_quote=info".to_string()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = PricingConfig::from_env()?;
    let engine = PricingEngine::new(config.policy.clone())?;

    let raw = match std::env::args().nth(1) {
        Some(path) if path != "-" => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read quote request from {path}"))?,
        _ => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("failed to read quote request from stdin")?;
            buffer
        }
    };

    let response = match build_response(&engine, &raw, config.business_id.as_deref()) {
        Ok(response) => response,
        Err(err) => {
            error!("quote rejected: {err:#}");
            return Err(err);
        }
    };
    info!(
        "quote ready: sale price {} for {}",
        response.quote.effective_sale_price,
        response.business_id.as_deref().unwrap_or("unnamed business")
    );

    let mut rendered = serde_json::to_string_pretty(&response)?;
    rendered.push('\n');
    let mut stdout = tokio::io::stdout();
    stdout.write_all(rendered.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

fn build_response(
    engine: &PricingEngine,
    raw: &str,
    default_business: Option<&str>,
) -> Result<QuoteResponse> {
    let request: QuoteRequest =
        serde_json::from_str(raw).context("quote request is not valid JSON")?;
    let quote = engine.quote(&request.input)?;

    Ok(QuoteResponse {
        business_id: request
            .business_id
            .or_else(|| default_business.map(str::to_string)),
        generated_at: Utc::now(),
        total_inventory_value: round_currency(valuate_inventory(
            &request.input.inventory_records,
        )?),
        total_fixed_expenses: round_currency(overhead_pool(&request.input.fixed_expenses)?),
        quote: quote.rounded(),
    })
}
