//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL, plus an
//! in-memory backend with the same interface.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  (API request handlers, all validation happens here)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │ Repository  │  (db::handlers - query construction)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │   Models    │  (db::models - database records)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! # Schema
//!
//! The `products` table is created by the migrator in `migrations/`, which runs once at
//! startup before the listener accepts connections:
//!
//! ```ignore
//! catalog::migrator().run(&pool).await?;
//! ```

pub mod errors;
pub mod handlers;
pub mod models;
