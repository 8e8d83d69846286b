// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Cortex-M3 NVIC lines used by ADuCM302x peripherals.
//!
//! Only the enable and clear-pending banks are described. Peripherals hold an
//! [`Nvic`] for each line they own and never touch anyone else's.

use kernel::utilities::registers::interfaces::Writeable;
use kernel::utilities::registers::{register_structs, ReadWrite};
use kernel::utilities::StaticRef;

register_structs! {
    /// NVIC Registers.
    NvicRegisters {
        (0x000 => _reserved0),
        /// Interrupt Set-Enable Registers
        (0x100 => iser: [ReadWrite<u32>; 8]),
        (0x120 => _reserved1),
        /// Interrupt Clear-Enable Registers
        (0x180 => icer: [ReadWrite<u32>; 8]),
        (0x1a0 => _reserved2),
        /// Interrupt Clear-Pending Registers
        (0x280 => icpr: [ReadWrite<u32>; 8]),
        (0x2a0 => @END),
    }
}

const NVIC: StaticRef<NvicRegisters> =
    unsafe { StaticRef::new(0xe000_e000 as *const NvicRegisters) };

/// An opaque wrapper for a single NVIC interrupt.
pub struct Nvic(u32);

impl Nvic {
    /// Creates a new `Nvic`
    ///
    /// Marked unsafe because only chip configuration code should be able to
    /// create these.
    pub const unsafe fn new(idx: u32) -> Nvic {
        Nvic(idx)
    }

    fn bank(&self) -> usize {
        self.0 as usize / 32
    }

    fn bit(&self) -> u32 {
        1 << (self.0 & 31)
    }

    /// Enable the interrupt
    pub fn enable(&self) {
        NVIC.iser[self.bank()].set(self.bit());
    }

    /// Disable the interrupt
    pub fn disable(&self) {
        NVIC.icer[self.bank()].set(self.bit());
    }

    /// Clear pending state
    pub fn clear_pending(&self) {
        NVIC.icpr[self.bank()].set(self.bit());
    }
}
