use super::args::{Cli, Commands};
use super::handlers;
use crate::config::Config;
use crate::logging;
use anyhow::Result;

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    match cli.command {
        Commands::Replay {
            file,
            format,
            max_lines,
            run_id,
            build_context,
        } => {
            let config = Config::load(cli.config.as_deref())?;
            let options = handlers::replay::ReplayOptions {
                max_lines,
                run_id,
                build_context,
            };
            handlers::replay::handle(&config, &file, format, options)
        }

        Commands::Validation { file, run_id } => {
            let config = Config::load(cli.config.as_deref())?;
            handlers::validation::handle(&config, &file, run_id)
        }

        Commands::Aliases { format } => handlers::aliases::handle(format),
    }
}
