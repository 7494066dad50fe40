pub mod config;
pub mod dist;
pub mod fetch;
pub mod humanize;
pub mod observability;
