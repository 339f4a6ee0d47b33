//! Tests for job pipeline services

pub mod fal_client;
