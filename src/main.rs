mod cli;
mod core;
mod sim;

use clap::Parser;

fn main() {
    tracing_subscriber::fmt::init();

    let args = cli::Cli::parse();
    match cli::execute(args.command) {
        Ok(summary) if summary.all_succeeded() => {}
        Ok(_) => std::process::exit(1),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
