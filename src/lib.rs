// src/lib.rs

//! confs-push library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod publish;
pub mod services;
pub mod storage;
pub mod utils;
