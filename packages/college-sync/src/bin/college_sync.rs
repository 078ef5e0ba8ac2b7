// Domain-driven entry point: pick a domain, fetch its ranking, write its tab.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use console::Term;
use dialoguer::{theme::ColorfulTheme, Select};

use college_sync::sync::{ai_client, fetcher_settings, sheets_sink, sync_domain};
use college_sync::{
    Config, Confirmation, Domain, JsonLinesSink, RecordSink, RetrievalConfig, Retriever,
    StructuredFetcher,
};

#[derive(Parser, Debug)]
#[command(name = "college-sync", about = "Sync ranked college lists into a spreadsheet")]
struct Args {
    /// Domain key (engineering, medical, management, law, pharmacy, architecture).
    /// Prompts interactively when omitted.
    #[arg(short, long)]
    domain: Option<Domain>,

    /// Print records as JSON lines instead of writing the spreadsheet
    #[arg(long)]
    dry_run: bool,

    /// Drop repeated institutions within the run
    #[arg(long)]
    dedupe: bool,

    /// Only confirm a window when it returned a record for every rank
    #[arg(long)]
    strict_confirm: bool,
}

fn prompt_domain() -> Result<Domain> {
    let term = Term::stderr();
    term.write_line(&format!("{}", "🎓 College ranking sync".bright_cyan().bold()))?;

    let labels: Vec<String> = Domain::ALL
        .iter()
        .map(|d| {
            let cfg = d.config();
            format!("{} (top {}, tab \"{}\")", cfg.display_name, cfg.target_count, cfg.sheet_name)
        })
        .collect();

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Which domain should be synced?")
        .items(&labels)
        .default(0)
        .interact_on(&term)
        .context("Domain selection aborted")?;

    Ok(Domain::ALL[selection])
}

async fn run(args: Args) -> Result<()> {
    let config = Config::from_env(!args.dry_run).context("Failed to load configuration")?;

    let domain = match args.domain {
        Some(domain) => domain,
        None => prompt_domain()?,
    };
    let domain_config = domain.config();
    tracing::info!(domain = domain.key(), dry_run = args.dry_run, "Domain selected");

    let client = ai_client(&config.upstream).context("Failed to build upstream client")?;
    let fetcher = StructuredFetcher::new(client, fetcher_settings(&config.upstream));
    let retriever = Retriever::new(
        fetcher,
        RetrievalConfig {
            confirmation: if args.strict_confirm {
                Confirmation::Strict
            } else {
                Confirmation::Optimistic
            },
            dedupe: args.dedupe,
            ..Default::default()
        },
    );

    let sink: Box<dyn RecordSink> = match &config.sheet {
        Some(sheet) if !args.dry_run => Box::new(
            sheets_sink(sheet, config.upstream.request_timeout)
                .context("Failed to load sheet credentials")?,
        ),
        _ => Box::new(JsonLinesSink::new(std::io::stdout())),
    };

    let report = sync_domain(&retriever, sink.as_ref(), domain_config, domain_config.sheet_name)
        .await
        .context("Failed to write records")?;

    let summary = format!(
        "✅ {}: {} of {} records written to \"{}\"",
        domain, report.obtained, report.target, report.sink.destination
    );
    if report.obtained < report.target as usize {
        eprintln!("{}", summary.bright_yellow());
    } else {
        eprintln!("{}", summary.bright_green());
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    college_sync::init_tracing();

    if let Err(e) = run(Args::parse()).await {
        tracing::error!(error = %format!("{:#}", e), "Sync failed");
        std::process::exit(1);
    }
}
