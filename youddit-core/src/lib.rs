// src/lib.rs

pub mod config;
pub mod auth;
pub mod repositories;
pub mod platforms;
pub mod services;

pub use youddit_common::Error;
pub use youddit_common::models;
pub use config::YoudditConfig;
