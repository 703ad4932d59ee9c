//! Domain services used by websocket and HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own lobby membership and dispatch rules so route
//! handlers can stay focused on protocol translation.

pub mod lobby;
