use clap::Parser;
use miette::Result;
use sigtrim::cli::{Cli, Commands};
use sigtrim::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.global.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let printer = Printer::new().with_verbose(cli.global.verbose);

    match cli.command {
        Commands::Normalize(args) => {
            sigtrim::cli::normalize::run(args, &cli.global.load()?, &printer)?;
        }
        Commands::Check(args) => {
            sigtrim::cli::check::run(args, &cli.global.load()?, &printer)?;
        }
        Commands::Upload(args) => {
            sigtrim::cli::upload::run(args, &cli.global.load()?, &printer)?;
        }
        Commands::Init(args) => {
            sigtrim::cli::init::run(args, &printer)?;
        }
        Commands::Completions(args) => {
            sigtrim::cli::completions::run(args, &mut std::io::stdout())?;
        }
    }

    Ok(())
}
