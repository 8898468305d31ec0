pub mod audit_logs;
pub mod base;
pub mod endpoints;
pub mod factory;
