// src/lib.rs

pub mod config;
pub mod error;
pub mod auth;
pub mod history;
pub mod llm;
pub mod chat;
pub mod api;
pub mod state;
