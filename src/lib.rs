pub mod address_bar;
pub mod api;
pub mod config;
pub mod contest_page;
pub mod controller;
pub mod demo_feed;
pub mod error;
pub mod filter;
pub mod http_cache;
pub mod http_client;
pub mod panels;
pub mod payload;
pub mod poll;
pub mod provider;
pub mod render;
pub mod state;
pub mod store;
pub mod time_oracle;
