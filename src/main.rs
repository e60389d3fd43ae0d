use clap::{Parser, Subcommand};
use serp_relay::config::Config;
use serp_relay::location::LocationResolver;
use serp_relay::relay::{Relay, RelayError};
use serp_relay::serp::SearchRequest;
use std::net::IpAddr;

/// SERP relay: Google search results via HasData, localized to the caller.
///
/// Examples:
///   serp-relay serve --port 8000
///   serp-relay search Exhibition --location "Lahore,Punjab,Pakistan"
///   serp-relay search "coffee shops" --ip 8.8.8.8 --num 20
///   serp-relay locate 8.8.8.8
#[derive(Parser)]
#[command(name = "serp-relay", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (POST /serp).
    Serve {
        #[arg(long, env = "HOST", default_value = "127.0.0.1")]
        host: String,

        #[arg(long, short = 'p', env = "PORT", default_value_t = 8000)]
        port: u16,
    },

    /// Run one search and print the response envelope as JSON.
    Search {
        query: String,

        /// Explicit "City,Region,Country". Skips IP detection.
        #[arg(long)]
        location: Option<String>,

        /// IP to detect the location from when --location is absent.
        #[arg(long, default_value = "127.0.0.1")]
        ip: IpAddr,

        #[arg(long, default_value = "pk")]
        gl: String,

        #[arg(long, default_value = "desktop")]
        device_type: String,

        #[arg(long, default_value = "qdr:w")]
        tbs: String,

        #[arg(long, default_value = "lcl")]
        tbm: String,

        #[arg(long, default_value_t = 50)]
        num: u32,
    },

    /// Resolve an IP address to "City,Region,Country".
    Locate { ip: IpAddr },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    serp_relay::telemetry::init_tracing()?;
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { host, port } => serp_relay::server::start(&host, port, &cli.config).await,
        Command::Search {
            query,
            location,
            ip,
            gl,
            device_type,
            tbs,
            tbm,
            num,
        } => {
            let request = SearchRequest {
                query,
                location,
                country_code: gl,
                device_type,
                recency_filter: tbs,
                result_type: tbm,
                result_count: num,
            };
            let relay = Relay::from_config(&cli.config);
            let outcome = tokio::task::spawn_blocking(move || relay.handle(&request, ip)).await?;

            match outcome {
                Ok(envelope) => {
                    println!("{}", serde_json::to_string_pretty(&envelope)?);
                    Ok(())
                }
                Err(RelayError::Upstream(failure)) => {
                    eprintln!("{}", serde_json::to_string_pretty(&failure)?);
                    std::process::exit(1);
                }
                Err(e) => Err(e.into()),
            }
        }
        Command::Locate { ip } => {
            let resolver = LocationResolver::from_config(&cli.config);
            let resolved = tokio::task::spawn_blocking(move || resolver.resolve(ip)).await?;
            eprintln!("  {} (via {})", resolved, resolved.source);
            println!("{}", resolved.as_str());
            Ok(())
        }
    }
}
