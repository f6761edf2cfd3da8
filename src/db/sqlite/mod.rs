mod stats;

pub use stats::SqliteStatsRepo;
