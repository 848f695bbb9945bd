pub mod api;
pub mod app;
pub mod config;
pub mod http_client;
pub mod model;
pub mod provider;
pub mod state;
pub mod view;
