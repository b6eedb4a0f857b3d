//! HTTP client for the external pipeline persistence API.

pub mod client;

pub use client::{ApiError, HttpPipelineClient, PipelineApi};
