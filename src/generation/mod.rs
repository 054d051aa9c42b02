/// Generation client module
///
/// This module handles the single outbound capability of the app:
/// "given a prompt and an optional base image, obtain one image".
/// - `wire.rs` - request/response bodies of the generateContent API
/// - `client.rs` - HTTP client, request building, response extraction

pub mod client;
pub mod wire;

pub use client::GenerationClient;
