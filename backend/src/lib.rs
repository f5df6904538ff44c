//! Chirp Backend Library
//!
//! The identity and access core of a small social-posting service: password
//! hashing, identity tokens, user and post stores, the follow graph, and
//! ownership checks, plus the REST adapter that exposes them.

pub mod auth;
pub mod config;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
