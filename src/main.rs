use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use msgscrape::args::{Cli, OutputFormat};
use msgscrape::model::Message;
use msgscrape::scrape;
use msgscrape::session::BrowserSession;
use std::collections::HashMap;
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    msgscrape::logging::init_from_env(cli.verbose);

    if let Err(err) = run(&cli).await {
        error!(error = %format!("{err:#}"), "scrape aborted");
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let config = cli.load_config()?;
    let settle = config.timeouts.settle();
    let delay = config.timeouts.between_conversations();

    let session = BrowserSession::launch(config).await?;
    let results = scrape::scrape_messages(session, settle, delay).await?;

    match cli.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Text => render_text(&results),
    }
    Ok(())
}

fn render_text(results: &HashMap<String, Vec<Message>>) {
    let mut names: Vec<&String> = results.keys().collect();
    names.sort();

    for name in names {
        let messages = &results[name];
        println!(
            "{} ({} messages)",
            name.as_str().cyan().bold(),
            messages.len()
        );
        for message in messages {
            let direction = if message.is_outgoing { "sent" } else { "received" };
            let when = if message.date.is_empty() {
                String::new()
            } else {
                format!(" [{} {}]", message.date, message.time)
            };
            println!(
                "  {}{}: {}",
                direction,
                when.as_str().dimmed(),
                message.text
            );
        }
        println!();
    }
}
