// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Peripheral implementations for the Analog Devices ADuCM302x MCUs.
//!
//! The chip exposes three services to the board framework: GPIO edge
//! interrupts delivered through logical channels, a low-power ticker built
//! on RTC1, and the true random number generator.

#![cfg_attr(not(test), no_std)]
#![crate_name = "aducm302x"]
#![crate_type = "rlib"]

mod config;

pub mod chip;
pub mod gpio;
pub mod gpio_irq;
pub mod interrupts;
pub mod lp_ticker;
pub mod nvic;
pub mod pwr;
pub mod rng;
pub mod rtc;
