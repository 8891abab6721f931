use clap::{CommandFactory, Parser};
use rxlevel_processor::cli::args::Args;
use rxlevel_processor::cli::commands::{self, CommandStatus};
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help
    let Some(command) = args.into_command() else {
        let _ = Args::command().print_help();
        println!();
        process::exit(0);
    };

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        let cancellation_token = CancellationToken::new();

        // Ctrl-C only cancels; the batch still finishes and writes its report
        let signal_token = cancellation_token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nReceived CTRL+C, finishing in-flight files...");
                signal_token.cancel();
            }
        });

        commands::run(command, cancellation_token).await
    });

    match result {
        Ok(CommandStatus::Completed) | Ok(CommandStatus::CompletedWithFailures) => {
            process::exit(0);
        }
        Ok(CommandStatus::Cancelled) => process::exit(130),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
