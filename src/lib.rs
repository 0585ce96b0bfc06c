pub mod config;
pub mod cookies;
pub mod handler;
pub mod http;
pub mod net;
