pub mod ports;
pub mod poll_use_case;
