// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Interfaces for implementing microcontrollers.

/// Interface for handling interrupts on a hardware chip.
///
/// Each chip crate implements this on a struct that owns its peripherals. The
/// board's interrupt entry points forward the active interrupt number here,
/// and the implementation calls the `handle_interrupt` function of the
/// peripheral that owns that line.
pub trait InterruptService {
    /// Service an interrupt, if supported by this chip. If this interrupt
    /// number is not supported, return false.
    ///
    /// ## Safety
    ///
    /// Must only be called from the interrupt context of `interrupt`, or with
    /// that interrupt masked, so that the peripheral's handler does not race
    /// with itself.
    unsafe fn service_interrupt(&self, interrupt: u32) -> bool;
}
