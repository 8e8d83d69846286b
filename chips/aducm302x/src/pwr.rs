// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Oscillator control (CLKG0_OSC)
//!
//! `CTL` is write-protected: every write must be preceded by writing
//! [`OSC_KEY`] to `KEY`.

use kernel::utilities::registers::interfaces::{ReadWriteable, Writeable};
use kernel::utilities::registers::{register_bitfields, register_structs, ReadWrite, WriteOnly};
use kernel::utilities::StaticRef;

const CLKG_OSC_BASE: StaticRef<ClkgOscRegisters> =
    unsafe { StaticRef::new(0x4004_c100 as *const ClkgOscRegisters) };

const OSC_KEY: u32 = 0xCB14;

register_structs! {
    ClkgOscRegisters {
        (0x00 => _reserved0),
        /// Key protection for CTL
        (0x0c => key: WriteOnly<u32>),
        /// Oscillator control
        (0x10 => ctl: ReadWrite<u32, CTL::Register>),
        (0x14 => @END),
    }
}

register_bitfields! [u32,
    CTL [
        /// 32 kHz clock select
        LFCLKMUX OFFSET(0) NUMBITS(1) [
            LFOSC = 0,
            LFXTAL = 1
        ],
        HFOSCEN OFFSET(1) NUMBITS(1) [],
        LFXTALEN OFFSET(2) NUMBITS(1) [],
        HFXTALEN OFFSET(3) NUMBITS(1) [],
        LFXTAL_BYPASS OFFSET(4) NUMBITS(1) [],
        /// Crystal stable
        LFXTALOK OFFSET(10) NUMBITS(1) []
    ]
];

/// Sources for the 32 kHz low-frequency clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LfClockSource {
    /// Internal RC oscillator
    LfOsc,
    /// External 32.768 kHz crystal
    LfXtal,
}

pub struct Oscillators {
    registers: StaticRef<ClkgOscRegisters>,
}

impl Oscillators {
    pub const fn new() -> Oscillators {
        Oscillators {
            registers: CLKG_OSC_BASE,
        }
    }

    fn unlock(&self) {
        self.registers.key.set(OSC_KEY);
    }

    pub fn set_lf_clock_mux(&self, source: LfClockSource) {
        self.unlock();
        self.registers.ctl.modify(match source {
            LfClockSource::LfOsc => CTL::LFCLKMUX::LFOSC,
            LfClockSource::LfXtal => CTL::LFCLKMUX::LFXTAL,
        });
    }

    pub fn enable_lf_xtal(&self, enable: bool) {
        self.unlock();
        self.registers.ctl.modify(if enable {
            CTL::LFXTALEN::SET
        } else {
            CTL::LFXTALEN::CLEAR
        });
    }
}
