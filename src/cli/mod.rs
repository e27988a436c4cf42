pub mod report;
pub mod stats;

pub use report::{ConsoleReporter, ReportFormat, Verbosity, player_label, write_outcome};
pub use stats::{GameStats, StatisticsAccumulator};
