// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

// Module declaration for the hand-maintained wire types
#[path = "meshbench.v1.rs"]
pub mod meshbench_v1;

// Re-export the types for easier access
pub use meshbench_v1::WorkUnit;
