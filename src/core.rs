pub mod filter;
pub mod form;
pub mod models;
pub mod ports;
pub mod services;
