//! Fieldtrack - campaign field-tracking and analytics service
//!
//! This library provides the core functionality for the Fieldtrack service:
//! campaigns accumulate three independent, append-only event streams
//! (captured media, GPS pings, social-media links) and the analytics engine
//! turns them into dashboard totals, per-campaign rollups, geographic
//! clusters, device distribution and bucketed activity timelines.
//!
//! # Architecture
//! - `analytics`: the aggregation & reporting engine (pure, stateless)
//! - `repository`: typed read/append seam over the store (SeaORM / memory)
//! - `storage`: database connection management and migrations
//! - `api`: HTTP services and routing
//! - `services`: User-Agent parsing into device profiles
//! - `config`: Configuration management
//! - `errors`: crate-wide error taxonomy

pub mod analytics;
pub mod api;
pub mod config;
pub mod errors;
pub mod repository;
pub mod services;
pub mod storage;
pub mod utils;
