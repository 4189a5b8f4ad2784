//! Shared test doubles for integration tests.

#![allow(dead_code)]

pub mod scripted_client;

pub use scripted_client::{Scripted, ScriptedClient};
