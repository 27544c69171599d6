//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain. It owns the wire
//! protocol (JSON over REST via axum), converts DTOs to and from domain
//! types, and turns domain errors into status codes. No business rules live
//! here.

pub mod rest;

pub use rest::api_router;
