// src/lib.rs - Library root for unibot

pub mod api;
pub mod cli;
pub mod core;
pub mod infra;
pub mod provider;
