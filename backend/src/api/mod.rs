//! API module
//!
//! Contains HTTP request handlers for pages, authentication and chat endpoints

pub mod auth;
pub mod chat;
pub mod export;
pub mod pages;
pub mod references;
pub mod utils;
