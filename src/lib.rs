//! Interview Orchestrator - turn-by-turn decision engine for structured
//! interview conversations.
//!
//! A judge audits each participant answer and a generator proposes the next
//! reply; the orchestrator decides which single action is legal, enforces it,
//! renders the message and walks the question catalog.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
