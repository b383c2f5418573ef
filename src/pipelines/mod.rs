// SPDX-License-Identifier: GPL-3.0-only

//! Capture pipelines

pub mod preview;
