//! # Weekboard Core Library
//!
//! Schedule resolution and grid composition for the Weekboard terminal
//! dashboard. The `weekboard` CLI is a thin loop over this library: it reads
//! the clock once per second and hands that instant to [`Dashboard::render`].
//!
//! ## Architecture
//!
//! - **Event model**: recurring weekly events grouped into priority-ranked
//!   sources, plus one-off deadlines
//! - **Expander**: splits events that cross midnight and generates the sleep
//!   and morning tiers
//! - **Occurrence resolver**: next and current occurrence, countdowns,
//!   progress stage
//! - **Compositor**: collapses overlapping segments into one cell per slot
//! - **Renderers**: the weekly grid and the two-week deadline table, aligned
//!   by terminal display width
//!
//! ## Key Components
//!
//! - [`Config`]: TOML configuration
//! - [`Schedule`]: validated schedule built from a config
//! - [`Compositor`]: overlap resolution
//! - [`Dashboard`]: per-second frame composition

pub mod compositor;
pub mod config;
pub mod dashboard;
pub mod deadline;
pub mod depart;
pub mod error;
pub mod event;
pub mod expand;
pub mod grid;
pub mod occurrence;
pub mod schedule;
pub mod width;

pub use compositor::{Compositor, GridCell, WeekGrid};
pub use config::Config;
pub use dashboard::{Dashboard, Frame};
pub use deadline::DeadlineBoard;
pub use depart::{next_datetime_for_time, DeparturePlan};
pub use error::{ConfigError, CoreError, ValidationError};
pub use event::{DeadlineItem, EventId, EventSource, RecurringEvent, SourceTier};
pub use grid::GridRenderer;
pub use occurrence::{current_event, next_event, Occurrence, Stage};
pub use schedule::Schedule;
