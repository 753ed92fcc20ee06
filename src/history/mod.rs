// src/history/mod.rs

pub mod store;

pub use store::HistoryStore;
