//! # Marketplace server
//! This module hosts the REST server for the auto-parts marketplace. It is responsible for:
//! * Serving the buyer checkout and order endpoints and the seller fulfillment endpoints.
//! * Listening for incoming webhook requests from the payment processor and the shipping aggregator, verifying
//!   their signatures, and translating them into engine reconciliation calls.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! Buyer and seller routes live under `/api` and require a bearer token. Webhook routes live under `/webhook` and
//! are authenticated by signature instead.

pub mod auth;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod webhook_routes;

#[cfg(test)]
mod endpoint_tests;
