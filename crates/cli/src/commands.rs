//! Subcommand handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use modelcat_client::{
    CachedFetcher, CatalogQuery, CatalogResponse, FetcherConfig, HttpConfig, HttpTransport, JsonDecoder,
};
use modelcat_core::AppConfig;

use crate::cli::Command;

type CatalogFetcher = CachedFetcher<JsonDecoder<CatalogResponse>>;

pub async fn run(command: Command) -> Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    let fetcher = build_fetcher(&config)?;

    match command {
        Command::Fetch { filters, json } => fetch(&fetcher, &filters.into(), json).await,
        Command::Invalidate { filters } => {
            let query: CatalogQuery = filters.into();
            if fetcher.invalidate(&query) {
                println!("removed {}", fetcher.request_for(&query).as_str());
            } else {
                println!("nothing cached for {}", fetcher.request_for(&query).as_str());
            }
            Ok(())
        }
        Command::Clear => {
            let removed = fetcher.invalidate_all();
            println!("removed {removed} entries from {}", fetcher.store().dir().display());
            Ok(())
        }
        Command::Status => status(&config, &fetcher),
    }
}

fn build_fetcher(config: &AppConfig) -> Result<CatalogFetcher> {
    let fetcher_config = FetcherConfig::try_from(config)?;
    let transport = HttpTransport::new(HttpConfig {
        user_agent: config.user_agent.clone(),
        timeout: config.timeout(),
        auth_token: config.auth_token.clone(),
    })?;

    Ok(CachedFetcher::new(fetcher_config, Arc::new(transport), JsonDecoder::new()))
}

async fn fetch(fetcher: &CatalogFetcher, query: &CatalogQuery, json: bool) -> Result<()> {
    let fetched = fetcher.fetch_with_source(query).await?;
    tracing::info!(source = ?fetched.source, "catalog ready");

    if json {
        println!("{}", serde_json::to_string_pretty(&fetched.value)?);
        return Ok(());
    }

    for model in &fetched.value.data.models {
        match model.context_length {
            Some(context) => println!("{}\t{}\t{context}", model.id, model.provider),
            None => println!("{}\t{}", model.id, model.provider),
        }
    }
    Ok(())
}

fn status(config: &AppConfig, fetcher: &CatalogFetcher) -> Result<()> {
    let policy = fetcher.config().policy();
    println!("endpoint: {}", fetcher.config().endpoint());
    println!("cache dir: {}", fetcher.store().dir().display());
    println!("ttl: {}s", policy.ttl.as_secs());
    println!("conditional validation: {}", policy.conditional_validation);
    println!("stale on error: {}", policy.stale_on_error);
    println!("timeout: {}ms", config.timeout_ms);

    let keys = fetcher.store().keys().context("failed to list cache entries")?;
    println!("entries: {}", keys.len());
    for key in keys {
        println!("  {key}");
    }
    Ok(())
}
