pub mod api;
pub mod config;
pub mod error;
pub mod protocol;
pub mod state;
pub mod storage;
pub mod types;
pub mod view;
pub mod ws;
