// crowcom - interactive console for the crow module
use anyhow::Context;
use clap::Parser;
use crowcom::cli::{execute_command, Args, Command};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let interactive = matches!(args.command(), Command::Repl { .. });

    let result = execute_command(args)
        .await
        .context("crowcom stopped with an error");
    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    if interactive {
        println!("bye.");
    }
}
