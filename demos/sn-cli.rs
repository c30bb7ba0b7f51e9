use clap::{Parser, Subcommand};
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sn_client::{
    models::{RecordOptions, RecordsQuery},
    SNClient,
};

#[derive(Parser)]
#[command(name = "sn-cli")]
#[command(about = "ServiceNow Table API CLI client", long_about = None)]
struct Cli {
    /// ServiceNow instance URL
    #[arg(short, long, env = "SN_INSTANCE_URL")]
    instance_url: String,

    /// Username for basic authentication
    #[arg(short, long, env = "SN_USERNAME")]
    username: String,

    /// Password for basic authentication
    #[arg(short, long, env = "SN_PASSWORD", hide_env_values = true)]
    password: String,

    /// Enable verbose logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List records from a table
    Records {
        /// Table name, e.g. incident
        #[arg(value_name = "TABLE")]
        table: String,

        /// Encoded query, e.g. active=true
        #[arg(short, long)]
        query: Option<String>,

        /// Comma-separated list of fields to return
        #[arg(short, long)]
        fields: Option<String>,

        /// Maximum number of records to retrieve
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },

    /// Fetch a single record by sys_id
    Record {
        /// Table name, e.g. incident
        #[arg(value_name = "TABLE")]
        table: String,

        /// Record sys_id
        #[arg(value_name = "SYS_ID")]
        sys_id: String,

        /// Comma-separated list of fields to return
        #[arg(short, long)]
        fields: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging
    let filter_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_level)))
        .init();

    // Read-only exploration: mutating requests stay disabled
    let client = SNClient::builder(&cli.instance_url, &cli.username, &cli.password)
        .with_push_changes(false)
        .with_timeout(Duration::from_secs(60))
        .build()?;

    match cli.command {
        Commands::Records {
            table,
            query,
            fields,
            limit,
        } => {
            println!("Fetching records from table: {}", table);

            let mut records_query = RecordsQuery::new().with_limit(limit);
            if let Some(query) = query {
                records_query = records_query.with_query(query);
            }
            if let Some(fields) = fields {
                records_query = records_query.with_fields(fields);
            }

            match client.get_table_records(&table, &records_query).await {
                Ok(records) => {
                    println!("{}", serde_json::to_string_pretty(&records)?);
                }
                Err(e) => {
                    eprintln!("✗ Failed to fetch records: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Record {
            table,
            sys_id,
            fields,
        } => {
            println!("Fetching record {} from table: {}", sys_id, table);

            let mut options = RecordOptions::new();
            if let Some(fields) = fields {
                options = options.with_fields(fields);
            }

            match client.get_table_record(&table, &sys_id, &options).await {
                Ok(record) => {
                    println!("{}", serde_json::to_string_pretty(&record)?);
                }
                Err(e) => {
                    eprintln!("✗ Failed to fetch record: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
