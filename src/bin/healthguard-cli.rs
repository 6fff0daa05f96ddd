use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "healthguard-cli")]
#[command(about = "Management CLI for the HealthGuard gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show circuit breakers and configured services
    Status,
    /// Check gateway and dependency health
    Health,
    /// Ask the assistant a question
    Query {
        /// The question text
        text: String,
        #[arg(long)]
        user_id: Option<String>,
    },
    /// Close every circuit breaker
    ResetBreakers,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Status => client.get(format!("{}/api/status", base)).send().await?,
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
        Commands::Query { text, user_id } => {
            client
                .post(format!("{}/api/query", base))
                .json(&json!({ "query": text, "user_id": user_id }))
                .send()
                .await?
        }
        Commands::ResetBreakers => {
            client
                .post(format!("{}/api/admin/reset-breakers", base))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
