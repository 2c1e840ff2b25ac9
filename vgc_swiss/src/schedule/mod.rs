//! Wall-clock projection of the event.
//!
//! Read-only: consumes recorded round timings and settings and returns an
//! estimated start and end for every Swiss and top cut round. The current
//! time is always passed in.

pub mod estimator;
pub mod models;

pub use estimator::estimate_schedule;
pub use models::{
    RoundSchedule, RoundScheduleStatus, RoundTiming, TournamentSchedule, TournamentScheduleData,
};
