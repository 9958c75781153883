//! Small custom widgets

pub mod sparkline;

pub use sparkline::TrendSparkline;
