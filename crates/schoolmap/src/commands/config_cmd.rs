//! Config subcommand handlers.

use schoolmap_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_file(global);

    match args.command {
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            schoolmap_config::save_config(&Config::default(), &path)?;
            tracing::info!(path = %path.display(), "wrote default config");
            output::print_output(
                &format!("Wrote default config to {}", path.display()),
                global.quiet,
            );
        }

        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            // Validate so `show` surfaces the same errors a real command would.
            cfg.to_map_config()?;
            let text = toml::to_string_pretty(&cfg)
                .map_err(|e| CliError::Internal(format!("TOML serialization failed: {e}")))?;
            let out = output::render_single(
                &global.output,
                &cfg,
                |_| text.trim_end().to_owned(),
                |c| c.api_url.clone(),
            )?;
            output::print_output(&out, global.quiet);
        }

        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
        }
    }
    Ok(())
}
