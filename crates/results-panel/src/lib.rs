//! Productivity and effectiveness results panel.
//!
//! The [`metrics`] module holds the aggregation engine (fraction parsing,
//! percentages, period filters, pivots and zone ranking) together with the
//! TSV codec and the service/router that expose it. The [`directory`]
//! module resolves field users to the area their results are scoped to.

pub mod config;
pub mod directory;
pub mod error;
pub mod metrics;
pub mod telemetry;
