//! Triage Control - CLI client for the ticket triage daemon.
//!
//! Submits tickets to triaged over HTTP and prints the pipeline result
//! for human review.

mod client;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use client::TriagedClient;
use owo_colors::OwoColorize;
use std::fs;
use std::path::PathBuf;
use triage_common::ProcessTicketResult;

#[derive(Parser)]
#[command(name = "triagectl")]
#[command(about = "Ticket triage - classify, dedupe, draft, and route support tickets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline on a ticket
    Process {
        /// Ticket text (omit when using --file)
        text: Option<String>,

        /// Read the ticket text from a file
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Classify a ticket into category and severity
    Classify {
        /// Ticket text
        text: String,
    },

    /// Look up the handling team for a category/severity pair
    Route {
        /// Category, e.g. "Billing" or "Feature Request"
        category: String,

        /// Severity: Low, Medium, High, or Critical
        severity: String,
    },

    /// Check daemon health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = TriagedClient::new();

    match cli.command {
        Commands::Process { text, file } => {
            let ticket_text = match (text, file) {
                (Some(text), None) => text,
                (None, Some(path)) => fs::read_to_string(&path)
                    .map_err(|e| anyhow!("cannot read {}: {e}", path.display()))?,
                _ => return Err(anyhow!("provide ticket text or --file, not both")),
            };
            let result = client.process(&ticket_text).await?;
            print_process_result(&result);
        }
        Commands::Classify { text } => {
            let classification = client.classify(&text).await?;
            println!(
                "{} {} / {}",
                "Classification:".bold(),
                classification.category.to_string().cyan(),
                severity_colored(&classification.severity.to_string())
            );
        }
        Commands::Route { category, severity } => {
            let routing = client.route(&category, &severity).await?;
            println!(
                "{} {} ({})",
                "Team:".bold(),
                routing.team_id.green(),
                routing.team_name.as_deref().unwrap_or("-")
            );
            if let Some(reason) = routing.reason {
                println!("{} {}", "Reason:".bold(), reason);
            }
        }
        Commands::Health => {
            let health = client.health().await?;
            println!(
                "{} {} (v{}, up {}s)",
                "Daemon:".bold(),
                health.status.green(),
                health.version,
                health.uptime_seconds
            );
        }
    }

    Ok(())
}

fn severity_colored(severity: &str) -> String {
    match severity {
        "Critical" => severity.red().bold().to_string(),
        "High" => severity.red().to_string(),
        "Medium" => severity.yellow().to_string(),
        _ => severity.green().to_string(),
    }
}

fn print_process_result(result: &ProcessTicketResult) {
    println!(
        "{} {} / {}",
        "Classification:".bold(),
        result.classification.category.to_string().cyan(),
        severity_colored(&result.classification.severity.to_string())
    );

    println!(
        "{} {} ({})",
        "Routed to:".bold(),
        result.routing.team_id.green(),
        result.routing.team_name.as_deref().unwrap_or("-")
    );

    let dedup = &result.deduplication;
    if dedup.is_possible_duplicate {
        println!(
            "{} possible duplicate of {}",
            "Dedup:".bold(),
            dedup
                .related_ticket_id
                .as_deref()
                .unwrap_or("?")
                .yellow()
        );
    } else if let Some(id) = &dedup.current_ticket_id {
        println!("{} new ticket {}", "Dedup:".bold(), id.green());
    } else {
        println!("{} not deduplicable (empty text)", "Dedup:".bold());
    }

    let fields = &result.extracted_fields;
    let mut extracted = Vec::new();
    if let Some(email) = &fields.customer_email {
        extracted.push(format!("email={email}"));
    }
    if let Some(customer_id) = &fields.customer_id {
        extracted.push(format!("customer={customer_id}"));
    }
    if let Some(order_id) = &fields.order_id {
        extracted.push(format!("order={order_id}"));
    }
    if let Some(product) = &fields.product_or_feature {
        extracted.push(format!("product={product}"));
    }
    if let Some(component) = &fields.affected_component_or_error {
        extracted.push(format!("component={component}"));
    }
    if !extracted.is_empty() {
        println!("{} {}", "Extracted:".bold(), extracted.join(", "));
    }
    if let Some(summary) = &fields.summary {
        println!("{} {}", "Summary:".bold(), summary);
    }

    println!("\n{}", "Draft reply (review before sending):".bold());
    println!("{}", result.draft);
}
