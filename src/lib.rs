pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod events;
pub mod output;
pub mod page;
pub mod render;
pub mod search;
pub mod shelf;
pub mod toolkit;

#[cfg(test)]
mod tests;
