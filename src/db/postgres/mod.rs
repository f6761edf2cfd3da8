mod stats;

pub use stats::PostgresStatsRepo;
