// src/lib.rs

//! ALEPE Proposition Watcher Library

pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod pipeline;
#[cfg(feature = "serve")]
pub mod serve;
pub mod services;
pub mod storage;
pub mod utils;
