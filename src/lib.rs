pub mod aggregate;
pub mod config;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod filter;
pub mod keywords;
pub mod output;
pub mod pipeline;
pub mod sentiment;
pub mod types;
pub mod web;
pub mod wordcloud;
