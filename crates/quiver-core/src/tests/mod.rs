//! Test module for quiver-core
//!
//! This module contains tests for:
//! - Tier ordering and position bonus of the scorer (including properties)
//! - Ranking order and selection cycling
//! - Reconciliation against desktop entry directories and the command list
//! - Usage memory persistence
//! - Configuration loading and defaults
//! - The launcher input cycle and background refresh
