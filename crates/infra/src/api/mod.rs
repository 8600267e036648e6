//! Degreed resource API

pub mod client;

pub use client::DegreedApiClient;
