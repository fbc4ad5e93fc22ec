pub mod address;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod server;

#[cfg(test)]
pub mod testing;
