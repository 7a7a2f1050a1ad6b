pub mod auth;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod repositories;
pub mod router;
pub mod schemas;
pub mod security;
pub mod uploader;
pub mod usecases;
pub mod validation;

#[cfg(test)]
mod test_utils;
