//! This crate contains the OpenAPI style client for the Global Catalog API.
//!
//! The client mirrors the layout `progenitor` produces:
//! one async method per operation on [Client],
//! request and response bodies in [types],
//! and [Error] / [ResponseValue] from `progenitor-client`.

mod client;
pub mod types;

pub use client::{ByteStream, Client, Error, ResponseValue};
