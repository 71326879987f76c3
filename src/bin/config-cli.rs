use clap::{Parser, Subcommand};
use reqwest::header::{ETAG, IF_NONE_MATCH, LAST_MODIFIED};
use reqwest::StatusCode;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "config-cli")]
#[command(about = "Query a running configuration service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Send this ETag as If-None-Match.
    #[arg(long)]
    if_none_match: Option<String>,

    /// Print ETag and Last-Modified to stderr.
    #[arg(long)]
    headers: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search with level=value terms, e.g. `search device=phone country=NL,DE`
    Search {
        #[arg(required = true, value_parser = parse_term)]
        terms: Vec<(String, String)>,
    },
    /// Fetch the node at a literal path, e.g. `node phone/NL`
    Node {
        #[arg(default_value = "")]
        path: String,
    },
    /// Check service health
    Health,
}

fn parse_term(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(level, value)| (level.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected level=value, got '{raw}'"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let mut request = match &cli.command {
        Commands::Search { terms } => {
            let query: String = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(terms.iter())
                .finish();
            client.get(format!("{base}/tree?{query}"))
        }
        Commands::Node { path } => {
            client.get(format!("{base}/tree/{}", path.trim_start_matches('/')))
        }
        Commands::Health => client.get(format!("{base}/health")),
    };
    if let Some(tag) = &cli.if_none_match {
        request = request.header(IF_NONE_MATCH, tag);
    }

    let res = request.send().await?;
    if cli.headers {
        for name in [ETAG, LAST_MODIFIED] {
            if let Some(value) = res.headers().get(&name) {
                eprintln!("{}: {}", name, value.to_str().unwrap_or("<invalid>"));
            }
        }
    }
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if status == StatusCode::NOT_MODIFIED {
        println!("Not modified");
        return Ok(());
    }
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
