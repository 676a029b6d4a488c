pub mod app;
pub mod cli;
mod commands;
pub mod configuration;
pub mod context;
pub mod db;
pub mod rest;
pub mod service;
pub mod storage;
pub mod tracing;
pub mod types;
