// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod downstream;

pub use downstream::{ConnectError, DownstreamError};
