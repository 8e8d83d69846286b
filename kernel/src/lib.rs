// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Core HAL Kernel
//!
//! The kernel crate holds the code shared between chip crates and the board
//! framework that consumes them: the Hardware Interface Layer (HIL)
//! definitions for GPIO edge interrupts, low-power tickers and entropy
//! sources, the standard `ErrorCode`, and the register utilities chips use to
//! describe their memory-mapped peripherals.

#![cfg_attr(not(test), no_std)]
#![warn(unreachable_pub)]

pub mod errorcode;
pub mod hil;
pub mod platform;
pub mod utilities;

pub use crate::errorcode::ErrorCode;
