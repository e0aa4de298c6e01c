use std::sync::Arc;

use anyhow::Context;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use clap::Parser;
use dynamo_client::{Client, ClientConfig, ClientError, SortKeyFilter};
use query_tool::types::Environment;
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Lists the records stored under one partition key
#[derive(Parser, Debug)]
#[command(name = "query-tool")]
#[command(version, about, long_about = None)]
struct Args {
    /// Partition key value
    partition_key: String,

    /// Sort key condition (`BEGINS_WITH`, `EQUALS`, `GREATER_THAN`, ...)
    #[arg(long, short, requires = "sort_key")]
    condition: Option<String>,

    /// Value compared against the sort key
    #[arg(long, short, requires = "condition")]
    sort_key: Option<String>,

    /// Maximum number of items evaluated per page, overriding `DYNAMODB_QUERY_PAGE_SIZE`
    #[arg(long)]
    page_size: Option<i32>,

    /// Secondary index to query
    #[arg(long)]
    index: Option<String>,

    /// Return records in descending sort key order
    #[arg(long)]
    reverse: bool,

    /// Print all records at once instead of page by page
    #[arg(long)]
    all: bool,

    /// Skip the table existence check
    #[arg(long)]
    skip_ping: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let environment = Environment::from_env();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(environment.tracing_level().to_string()));

    // Use JSON format for staging/production, regular format for development
    if environment.json_logs() {
        fmt().json().with_env_filter(env_filter).init();
    } else {
        fmt().with_env_filter(env_filter).init();
    }

    let config = client_config(&args)?;
    let dynamodb_client = Arc::new(DynamoDbClient::from_conf(
        environment.dynamodb_client_config().await,
    ));
    let client = Client::new(dynamodb_client, config);

    if !args.skip_ping {
        client.ping_table().await?;
    }

    let filter = match (args.condition, args.sort_key) {
        (Some(condition), Some(sort_key)) => Some(SortKeyFilter::parse(&condition, sort_key)?),
        _ => None,
    };

    if args.all {
        let records: Vec<Value> = client
            .query_all(&args.partition_key, filter.as_ref())
            .await
            .map_err(query_failed)?;
        info!("Fetched {} records", records.len());
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    let mut cursor = client.query(&args.partition_key, filter.as_ref())?;
    let mut records: Vec<Value> = Vec::new();
    while cursor.has_next() {
        cursor.next(&mut records).await.map_err(query_failed)?;
        info!(
            "Page {} returned {} records",
            cursor.pages_fetched(),
            records.len()
        );
        for record in &records {
            println!("{record}");
        }
    }

    Ok(())
}

/// Table configuration from the environment with the command line overrides applied
fn client_config(args: &Args) -> anyhow::Result<ClientConfig> {
    let mut config = ClientConfig::try_from_env()
        .context("DYNAMODB_TABLE_NAME environment variable is not set")?;

    if let Some(page_size) = args.page_size.filter(|size| *size > 0) {
        config.query_options.page_size = Some(page_size);
    }
    if let Some(index) = &args.index {
        config.query_options.index_name = Some(index.clone());
    }
    if args.reverse {
        config.query_options.scan_forward = false;
    }

    Ok(config)
}

fn query_failed(err: ClientError) -> anyhow::Error {
    if err.is_retryable() {
        warn!(
            page = ?err.page(),
            upstream = err.is_upstream_error(),
            "Query page fetch failed: {err}"
        );
    }
    err.into()
}
