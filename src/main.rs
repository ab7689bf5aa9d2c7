use clap::Parser;
use todo_scheduler::api::server::SchedulerServer;
use todo_scheduler::cli::{Cli, Commands};
use todo_scheduler::config::ServerConfig;
use todo_scheduler::logging::{init_logging, LoggingConfig};
use todo_scheduler::nextdate::{next_date, RepeatContext};
use todo_scheduler::time_utils::{format_date, parse_date, today};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_config = LoggingConfig::from_args(cli.quiet, cli.verbose > 0, cli.json)
        .with_file_output(cli.log_file.clone());

    if let Err(e) = init_logging(log_config) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        tracing::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let config = ServerConfig::from_args(&cli.server)?;
            SchedulerServer::new(config).run().await?;
        },

        Commands::NextDate {
            now,
            date,
            repeat,
            context,
        } => {
            let now = match now.as_deref() {
                Some(raw) => parse_date(raw)?,
                None => today(),
            };
            let context: RepeatContext = context.parse()?;

            let next = next_date(now, &date, &repeat, context)?;
            println!("{}", next.map(format_date).unwrap_or_default());
        },
    }

    Ok(())
}
