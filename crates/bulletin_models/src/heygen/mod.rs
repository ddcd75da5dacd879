//! HeyGen avatar video client.

mod client;
mod dto;

pub use client::{HeyGenClient, HeyGenSettings};
