//! HTTP request handlers for all API endpoints.
//!
//! Each handler is responsible for:
//! - Request validation (path, query and body) before any storage call
//! - Executing the operation through the product repository held in [`crate::AppState`]
//! - Response serialization
//!
//! # Handler Modules
//!
//! - [`products`]: Product create, list, search, sorted listing, fetch, update and delete
//!
//! # Error Handling
//!
//! Handlers return [`crate::errors::Error`] which converts to an HTTP status code and a
//! `{"error": "..."}` JSON body.

pub mod products;
