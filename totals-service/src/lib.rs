//! totals-service: line item, tax and discount totals for invoices and
//! quotations.
//!
//! The [`engine`] module is a pure library usable without the HTTP layer;
//! [`startup`] wires it into an axum service that recomputes totals
//! server-side before documents are persisted.

pub mod config;
pub mod dtos;
pub mod engine;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
