use std::path::Path;

use chrono::{Duration, Utc};
use chrono_tz::Tz;
use weekboard_core::event::{format_countdown, parse_time_of_day};
use weekboard_core::{ConfigError, DeparturePlan};

use super::load_config;

pub fn run(config: Option<&Path>, time: &str) -> Result<(), Box<dyn std::error::Error>> {
    let target = parse_time_of_day(time)?;
    let config = load_config(config)?;
    let tz: Tz = config
        .timezone
        .parse()
        .map_err(|e| ConfigError::InvalidValue {
            key: "timezone".into(),
            message: format!("{e}"),
        })?;
    let lead = Duration::minutes(i64::from(config.departure_lead_minutes));

    let now = Utc::now().with_timezone(&tz);
    let plan = DeparturePlan::new(now.naive_local(), target, lead);

    println!("Now:           {}", now.format("%Y-%m-%d %I:%M:%S %p %Z"));
    println!("Target time:   {}", plan.target.format("%Y-%m-%d %I:%M %p"));
    println!("Depart time:   {}", plan.depart.format("%Y-%m-%d %I:%M %p"));
    if plan.leave_now {
        println!("Time left:     00:00:00 (leave now)");
    } else {
        println!("Time left:     {} (HH:MM:SS)", format_countdown(plan.until_depart));
    }
    Ok(())
}
