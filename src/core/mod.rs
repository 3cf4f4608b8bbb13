pub mod api;
pub mod catalog;
pub mod config;
pub mod state;
pub mod storage;
