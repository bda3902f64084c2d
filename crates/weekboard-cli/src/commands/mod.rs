pub mod config;
pub mod dashboard;
pub mod depart;

use std::path::Path;

use weekboard_core::{Config, Schedule};

/// Load the config from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(Config::load_from(path)?),
        None => Ok(Config::load()?),
    }
}

/// Load and validate the schedule.
pub fn load_schedule(path: Option<&Path>) -> Result<Schedule, Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    Ok(Schedule::from_config(&config)?)
}
