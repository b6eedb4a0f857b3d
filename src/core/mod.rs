pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod ficha;
pub mod pipeline;
pub mod status;
pub mod types;
pub mod workflow;
