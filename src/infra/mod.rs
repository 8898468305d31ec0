pub mod log_analytics;
