//! posgate: role-gated administration service for a point-of-sale system.

pub mod cli;
pub mod config;
pub mod directory;
pub mod gate;
pub mod handlers;
pub mod identity;
pub mod router;
pub mod schemas;

#[cfg(test)]
pub mod test_utils;

#[cfg(test)]
mod openapi_tests;
