//! routemap - BGP route discovery CLI.
//!
//! This is the command-line interface for the routemap library.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use routemap::route::RouteLookup;
use routemap::{config, pipeline, AwsIpRanges, Asn, Services};
use std::net::Ipv4Addr;
use std::time::Duration;
use tabled::settings::Style;
use tabled::Table;

/// Command-line arguments for the route discovery tool.
#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "BGP route discovery: company ASNs, originated prefixes, and route metadata",
    long_about = None
)]
struct Args {
    #[clap(subcommand)]
    command: Option<Command>,

    /// Output results in JSON format
    #[clap(long, global = true)]
    json: bool,

    /// Per-request timeout in milliseconds
    #[clap(long, global = true, default_value_t = config::DEFAULT_REQUEST_TIMEOUT_MS)]
    request_timeout_ms: u64,

    /// Attempts per request before giving up on transient failures
    #[clap(long, global = true, default_value_t = config::DEFAULT_RETRY_ATTEMPTS)]
    retries: u32,

    /// Number of concurrent upstream lookups
    #[clap(long, global = true, default_value_t = config::DEFAULT_LOOKUP_CONCURRENCY)]
    concurrency: usize,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Discover the valid ASNs registered for a company name
    #[clap(name = "ASN")]
    Asn {
        /// Company name to search for
        company: String,
    },

    /// List the enriched routes originated by one ASN
    Prefixes {
        /// ASN to collect routes for, e.g. AS13335
        asn: String,
    },

    /// Discover a company's ASNs and enrich every originated route
    Routes {
        /// Company name to search for
        company: String,
    },

    /// Resolve a domain name to IPv4 addresses
    Resolve {
        /// Domain to be resolved
        domain: String,
    },

    /// Look up the BGP route details covering a single address
    #[clap(name = "IP")]
    Ip {
        /// Address to fetch route information for
        address: String,
    },

    /// Check an address against the published AWS IP ranges
    #[clap(name = "AWS")]
    Aws {
        /// Address to search for in the AWS ranges
        address: String,
    },
}

fn main() {
    // Create single-threaded tokio runtime for lower overhead
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to create Tokio runtime");

    // Every failure takes the same path: a message on stderr, no
    // distinguishing exit code
    if let Err(e) = runtime.block_on(async_main()) {
        eprintln!("Error: {e:#}");
    }
}

async fn async_main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Help, version, and usage errors all share one exit path
            let _ = e.print();
            return Ok(());
        }
    };

    let Some(command) = args.command else {
        Args::command().print_help()?;
        return Ok(());
    };

    let _ = config::set_config(config::TimingConfig {
        request_timeout: Duration::from_millis(args.request_timeout_ms),
        retry_attempts: args.retries,
        lookup_concurrency: args.concurrency,
        ..config::TimingConfig::default()
    });

    let services = Services::new();

    match command {
        Command::Asn { company } => cmd_asn(&services, &company, args.json).await,
        Command::Prefixes { asn } => cmd_prefixes(&services, &asn, args.json).await,
        Command::Routes { company } => cmd_routes(&services, &company, args.json).await,
        Command::Resolve { domain } => cmd_resolve(&services, &domain, args.json).await,
        Command::Ip { address } => cmd_ip(&services, &address, args.json).await,
        Command::Aws { address } => cmd_aws(&services, &address, args.json).await,
    }
}

async fn cmd_asn(services: &Services, company: &str, json: bool) -> Result<()> {
    let asns = pipeline::asns_for_company(services, company).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&asns)?);
        return Ok(());
    }
    println!("Number of valid ASNs: {}", asns.len());
    for asn in &asns {
        println!("{asn}");
    }
    Ok(())
}

async fn cmd_prefixes(services: &Services, asn: &str, json: bool) -> Result<()> {
    let asn = Asn::new(asn);
    if !json {
        println!("Collecting routes for ASN: {asn}");
    }
    let records = pipeline::routes_for_asn(services, &asn).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        println!("{}", Table::new(records).with(Style::rounded()));
        println!();
    }
    Ok(())
}

async fn cmd_routes(services: &Services, company: &str, json: bool) -> Result<()> {
    let results = pipeline::routes_for_company(services, company).await?;
    if json {
        let mut object = serde_json::Map::new();
        for (asn, records) in results {
            object.insert(asn.to_string(), serde_json::to_value(records)?);
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::Value::Object(object))?
        );
        return Ok(());
    }
    for (asn, records) in results {
        println!("Routes originated by {asn}:");
        println!("{}", Table::new(records).with(Style::rounded()));
        println!();
    }
    Ok(())
}

async fn cmd_resolve(services: &Services, domain: &str, json: bool) -> Result<()> {
    let addrs = pipeline::resolve_domain(services, domain).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&addrs)?);
        return Ok(());
    }
    for addr in addrs {
        println!("{addr}");
    }
    Ok(())
}

async fn cmd_ip(services: &Services, address: &str, json: bool) -> Result<()> {
    let address: Ipv4Addr = address
        .parse()
        .with_context(|| format!("invalid IPv4 address: {address}"))?;

    match pipeline::detail_for_ip(services, address).await? {
        RouteLookup::Routed(detail) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                println!("{}", Table::new([detail]).with(Style::rounded()));
                println!();
            }
        }
        RouteLookup::Unrouted(address) => {
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "address": address,
                        "routed": false,
                    }))?
                );
            } else {
                println!("{address}");
            }
        }
    }
    Ok(())
}

async fn cmd_aws(services: &Services, address: &str, json: bool) -> Result<()> {
    let address: Ipv4Addr = address
        .parse()
        .with_context(|| format!("invalid IPv4 address: {address}"))?;

    let ranges = AwsIpRanges::load(&services.http).await?;

    match pipeline::classify_cloud(&ranges, address) {
        Some(range) => {
            let service_list: Vec<&str> = range.services.iter().map(String::as_str).collect();
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "address": address,
                        "route": range.prefix.to_string(),
                        "region": range.region,
                        "services": service_list,
                    }))?
                );
            } else {
                println!("{address} found in AWS range");
                println!("Route: {}", range.prefix);
                println!("Region: {}", range.region);
                println!("Services: {}", service_list.join(", "));
            }
        }
        None => {
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "address": address,
                        "found": false,
                    }))?
                );
            } else {
                println!("{address} not found in AWS range");
            }
        }
    }
    Ok(())
}
