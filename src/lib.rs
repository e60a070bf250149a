//! Fault-condition reports for air handling unit trend data.
//!
//! A [`Timeline`] of sensor readings carries a 0/1 fault flag column written
//! by an upstream fault detector. From it this crate derives duration
//! statistics, renders a stacked time-series figure and an hour-of-day
//! histogram, and composes a [`ReportDocument`] that can be written out as
//! Markdown with PNG figures.

pub mod config;
pub mod data;
pub mod error;
pub mod processing;
pub mod profile;
pub mod render;
pub mod report;

pub use config::FaultConfig;
pub use data::timeline::{ColumnHandle, FlagColumn, Timeline};
pub use error::{ReportError, Result};
pub use processing::summary::{FaultStatisticsSummarizer, SummaryStatistics};
pub use profile::{FaultCode, FaultProfile};
pub use render::{PlotRenderer, RenderedImage};
pub use report::{generate_report, FaultReport, ReportComposer, ReportDocument};
