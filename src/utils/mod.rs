// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dwat contributors

//! Utility modules
//!
//! Common utilities for the dwat CLI.

pub mod colors;
pub mod spinner;

pub use colors::*;
pub use spinner::*;
