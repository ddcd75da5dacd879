//! Google Gemini REST client.

mod client;
mod dto;

pub use client::GeminiClient;
