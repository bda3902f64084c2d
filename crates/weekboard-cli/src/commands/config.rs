use std::path::Path;

use clap::Subcommand;
use weekboard_core::Config;

use super::load_config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the config file location
    Path,
    /// Print the effective config, or one value
    Show {
        /// Dot-separated key (e.g. "sleep.start", "classes.0.title")
        key: Option<String>,
    },
    /// Write the built-in schedule to the config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(path: Option<&Path>, action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let target = path.map(Path::to_path_buf).unwrap_or_else(Config::default_path);
    match action {
        ConfigAction::Path => println!("{}", target.display()),
        ConfigAction::Show { key: None } => {
            let config = load_config(path)?;
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Show { key: Some(key) } => {
            let config = load_config(path)?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Init { force } => {
            if target.exists() && !force {
                return Err(format!(
                    "{} already exists (use --force to overwrite)",
                    target.display()
                )
                .into());
            }
            Config::default().save_to(&target)?;
            println!("wrote {}", target.display());
        }
    }
    Ok(())
}
