#![allow(async_fn_in_trait)]

extern crate actix_web;
extern crate chrono;
extern crate dotenv;
extern crate hex;
extern crate itertools;
extern crate jsonwebtoken;
extern crate rand;
extern crate reqwest;
extern crate serde;
extern crate serde_json;
extern crate sha2;
extern crate sqlx;
extern crate thiserror;
extern crate tokio;

pub mod client;
pub mod config;
pub mod context;
pub mod core;
pub mod database;
pub mod error;
pub mod handlers;
pub mod impls;
pub mod middlewares;
pub mod request;
pub mod response;
