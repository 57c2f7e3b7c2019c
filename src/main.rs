use clap::Parser;
use haplocheck_tools::cli::{self, Commands};
use haplocheck_tools::commands;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = cli::Args::parse();

    let result = match args.command {
        Commands::Contamination {
            input,
            reference,
            output,
            report,
            hsd,
            thresholds,
        } => commands::contamination::run(input, reference, output, report, hsd, thresholds),
        Commands::Classify {
            input,
            reference,
            output,
            hsd,
        } => commands::classify::run(input, reference, output, hsd),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
