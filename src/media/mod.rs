// SPDX-License-Identifier: GPL-3.0-only

//! Frame format conversion

pub mod convert;
