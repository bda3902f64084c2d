//! The validated, immutable schedule handed to every render pass.
//!
//! [`Schedule::from_config`] is the only place configuration strings are
//! parsed. After it succeeds every core operation is total.

use chrono::Duration;
use chrono_tz::Tz;

use crate::config::{Config, EventEntry};
use crate::dashboard::FlavorText;
use crate::error::ConfigError;
use crate::event::{
    parse_time_of_day, parse_timestamp, DeadlineItem, EventId, EventSource, RecurringEvent,
    SourceTier,
};
use crate::expand::{morning_events, sleep_events, MorningPlan, SleepPlan, SECS_PER_DAY};

/// Static schedule configuration, validated.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub timezone: Tz,
    pub slot_minutes: u32,
    pub departure_lead: Duration,
    pub lunch_lead: Duration,
    pub max_deadlines_per_day: usize,
    pub min_column_width: usize,
    pub personal: EventSource,
    pub food: EventSource,
    pub classes: EventSource,
    pub sleep: SleepPlan,
    pub morning: MorningPlan,
    pub deadlines: Vec<DeadlineItem>,
    pub flavor: FlavorText,
}

fn invalid(key: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.into(),
        message: message.into(),
    }
}

fn positive_minutes(key: &str, minutes: i64, max: Option<i64>) -> Result<Duration, ConfigError> {
    if minutes <= 0 {
        return Err(invalid(key, format!("duration must be positive, got {minutes}")));
    }
    if let Some(max) = max {
        if minutes > max {
            return Err(invalid(key, format!("duration must be at most {max} minutes")));
        }
    }
    Ok(Duration::minutes(minutes))
}

fn build_source(tier: SourceTier, entries: &[EventEntry]) -> Result<EventSource, ConfigError> {
    let section = tier.name();
    let events = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let key = |field: &str| format!("{section}[{index}].{field}");
            if entry.weekday > 6 {
                return Err(invalid(
                    key("weekday"),
                    format!("expected 0 (Mon) to 6 (Sun), got {}", entry.weekday),
                ));
            }
            let start = parse_time_of_day(&entry.start)
                .map_err(|e| invalid(key("start"), e.to_string()))?;
            let duration = positive_minutes(
                &key("duration_minutes"),
                entry.duration_minutes,
                Some(SECS_PER_DAY / 60),
            )?;
            let mut event = RecurringEvent::new(
                EventId::new(tier, index),
                entry.title.clone(),
                entry.kind.clone(),
                entry.weekday,
                start,
                duration,
            )
            .with_location(entry.location.clone());
            if entry.color.is_some() {
                event.color = entry.color;
            }
            Ok(event)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(EventSource::new(tier, events))
}

impl Schedule {
    /// Validate `config` and build the schedule.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unknown time zone, a slot
    /// size that does not divide a day, an unparseable time or timestamp, a
    /// weekday outside 0..=6, a non-positive duration, any event longer
    /// than a day, or an empty class list.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let timezone: Tz = config
            .timezone
            .parse()
            .map_err(|e| invalid("timezone", format!("{e}")))?;

        let slot = config.slot_minutes;
        if slot == 0 || (SECS_PER_DAY / 60) % i64::from(slot) != 0 {
            return Err(invalid(
                "slot_minutes",
                format!("{slot} does not divide a 24-hour day"),
            ));
        }

        if config.classes.is_empty() {
            return Err(invalid("classes", "class schedule is empty"));
        }
        let classes = build_source(SourceTier::Class, &config.classes)?;
        let food = build_source(SourceTier::Food, &config.food)?;
        let personal = build_source(SourceTier::Personal, &config.personal)?;

        let day_minutes = Some(SECS_PER_DAY / 60);
        let sleep = SleepPlan {
            enabled: config.sleep.enabled,
            start: parse_time_of_day(&config.sleep.start)
                .map_err(|e| invalid("sleep.start", e.to_string()))?,
            duration: positive_minutes(
                "sleep.duration_minutes",
                config.sleep.duration_minutes,
                day_minutes,
            )?,
            title: config.sleep.title.clone(),
            kind: config.sleep.kind.clone(),
            color: config.sleep.color.or(SourceTier::Sleep.default_color()),
        };
        let morning = MorningPlan {
            enabled: config.morning.enabled,
            duration: positive_minutes(
                "morning.duration_minutes",
                config.morning.duration_minutes,
                day_minutes,
            )?,
            title: config.morning.title.clone(),
            kind: config.morning.kind.clone(),
            color: config.morning.color.or(SourceTier::Morning.default_color()),
        };

        let deadlines = config
            .deadlines
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                parse_timestamp(&entry.due)
                    .map(|due| DeadlineItem::new(entry.title.clone(), entry.kind.clone(), due))
                    .map_err(|e| invalid(format!("deadlines[{i}].due"), e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            timezone,
            slot_minutes: slot,
            departure_lead: Duration::minutes(i64::from(config.departure_lead_minutes)),
            lunch_lead: Duration::minutes(i64::from(config.lunch_lead_minutes)),
            max_deadlines_per_day: config.max_deadlines_per_day,
            min_column_width: config.min_column_width,
            personal,
            food,
            classes,
            sleep,
            morning,
            deadlines,
            flavor: FlavorText::from(&config.flavor),
        })
    }

    /// The class events: the only source considered for "next" and
    /// "current".
    pub fn class_events(&self) -> &[RecurringEvent] {
        &self.classes.events
    }

    /// Every source in declaration order, highest priority first.
    ///
    /// Sleep and morning events are regenerated from their plans on each
    /// call.
    pub fn sources(&self) -> Vec<EventSource> {
        let mut sleep = EventSource::new(SourceTier::Sleep, sleep_events(&self.sleep));
        sleep.color = self.sleep.color;
        let mut morning =
            EventSource::new(SourceTier::Morning, morning_events(&self.sleep, &self.morning));
        morning.color = self.morning.color;

        vec![
            self.personal.clone(),
            self.food.clone(),
            self.classes.clone(),
            sleep,
            morning,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeadlineEntry;
    use chrono::NaiveTime;

    fn config_with(f: impl FnOnce(&mut Config)) -> Config {
        let mut cfg = Config::default();
        f(&mut cfg);
        cfg
    }

    fn expect_invalid_key(cfg: &Config, expected: &str) {
        match Schedule::from_config(cfg) {
            Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, expected),
            other => panic!("expected invalid {expected}, got {other:?}"),
        }
    }

    #[test]
    fn default_config_builds() {
        let schedule = Schedule::from_config(&Config::default()).unwrap();
        assert_eq!(schedule.timezone, chrono_tz::America::Toronto);
        assert_eq!(schedule.class_events().len(), 10);
        assert_eq!(schedule.departure_lead, Duration::minutes(20));
        assert!(schedule.class_events().iter().all(|e| e.priority == 1));
    }

    #[test]
    fn sources_are_in_priority_order_with_generated_tiers() {
        let schedule = Schedule::from_config(&Config::default()).unwrap();
        let sources = schedule.sources();
        let tiers: Vec<SourceTier> = sources.iter().map(|s| s.tier).collect();
        assert_eq!(tiers, SourceTier::ALL.to_vec());
        assert_eq!(sources[3].events.len(), 7);
        assert_eq!(sources[4].events.len(), 7);
        assert!(sources.windows(2).all(|w| w[0].priority >= w[1].priority));
    }

    #[test]
    fn twelve_hour_times_are_accepted() {
        let cfg = config_with(|c| c.classes[0].start = "1:00 PM".into());
        let schedule = Schedule::from_config(&cfg).unwrap();
        assert_eq!(
            schedule.class_events()[0].start,
            NaiveTime::from_hms_opt(13, 0, 0).unwrap()
        );
    }

    #[test]
    fn empty_class_list_is_a_configuration_error() {
        let cfg = config_with(|c| c.classes.clear());
        expect_invalid_key(&cfg, "classes");
    }

    #[test]
    fn rejects_malformed_values() {
        expect_invalid_key(&config_with(|c| c.timezone = "Mars/Olympus".into()), "timezone");
        expect_invalid_key(&config_with(|c| c.slot_minutes = 7), "slot_minutes");
        expect_invalid_key(&config_with(|c| c.slot_minutes = 0), "slot_minutes");
        expect_invalid_key(&config_with(|c| c.classes[2].start = "25:00".into()), "class[2].start");
        expect_invalid_key(&config_with(|c| c.classes[1].weekday = 7), "class[1].weekday");
        expect_invalid_key(
            &config_with(|c| c.food[0].duration_minutes = 0),
            "food[0].duration_minutes",
        );
        expect_invalid_key(
            &config_with(|c| c.sleep.duration_minutes = 25 * 60),
            "sleep.duration_minutes",
        );
        expect_invalid_key(&config_with(|c| c.sleep.start = "late".into()), "sleep.start");
        expect_invalid_key(
            &config_with(|c| {
                c.deadlines.push(DeadlineEntry {
                    title: "x".into(),
                    kind: String::new(),
                    due: "tomorrow".into(),
                })
            }),
            "deadlines[0].due",
        );
    }

    #[test]
    fn events_longer_than_a_day_are_rejected() {
        expect_invalid_key(
            &config_with(|c| c.classes[0].duration_minutes = 1_000_000_000_000),
            "class[0].duration_minutes",
        );
        expect_invalid_key(
            &config_with(|c| {
                c.classes[3].start = "23:00".into();
                c.classes[3].duration_minutes = 3 * 24 * 60;
            }),
            "class[3].duration_minutes",
        );
        expect_invalid_key(
            &config_with(|c| c.personal.push(EventEntry::new("Trip", "", 4, "08:00", 24 * 60 + 1))),
            "personal[0].duration_minutes",
        );
    }

    #[test]
    fn a_full_day_event_still_renders() {
        let cfg = config_with(|c| {
            c.classes[0].start = "23:00".into();
            c.classes[0].duration_minutes = 24 * 60;
        });
        let schedule = Schedule::from_config(&cfg).unwrap();
        let now = chrono::NaiveDate::from_ymd_opt(2026, 10, 13)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let mut dashboard = crate::Dashboard::with_seed(schedule, 1);
        let frame = dashboard.render(now, "EDT").unwrap();
        assert!(frame.grid.contains("CEG 4166 Lecture"));
    }

    #[test]
    fn explicit_event_color_overrides_tier_default() {
        let cfg = config_with(|c| c.classes[0].color = Some(crate::event::ColorTag::Red));
        let schedule = Schedule::from_config(&cfg).unwrap();
        assert_eq!(schedule.class_events()[0].color, Some(crate::event::ColorTag::Red));
        assert_eq!(schedule.class_events()[1].color, Some(crate::event::ColorTag::Blue));
    }
}
