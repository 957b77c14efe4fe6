pub mod account;
pub mod activity;
