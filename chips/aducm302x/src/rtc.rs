// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Real-time clock RTC1, ADuCM302x-family
//!
//! RTC1 is a 32-bit counter clocked from the 32 kHz LF clock through a
//! power-of-two prescaler, with one 32-bit alarm compare register. All
//! registers are 16 bits wide, so the counter and alarm are split across
//! two registers each.
//!
//! Writes to the RTC are posted into the always-on domain and complete some
//! LF clock cycles later. Before writing a register, the driver waits for
//! any earlier write still pending.

use kernel::hil::time::Frequency;
use kernel::utilities::registers::interfaces::{ReadWriteable, Readable, Writeable};
use kernel::utilities::registers::{register_bitfields, register_structs, ReadOnly, ReadWrite};
use kernel::utilities::StaticRef;

use crate::interrupts;
use crate::nvic::Nvic;
use crate::pwr::{LfClockSource, Oscillators};

/// Frequency of the LF crystal.
pub const LFCLK_FREQUENCY_HZ: u32 = 32768;

/// Prescaler exponent applied to the LF clock: the counter advances once
/// every `2^RTC_PRESCALER` LF cycles.
pub const RTC_PRESCALER: u8 = 0;

register_structs! {
    RtcRegisters {
        /// Control 0
        (0x00 => cr0: ReadWrite<u16, CR0::Register>),
        (0x02 => _reserved0),
        /// Status 0, write 1 to clear
        (0x04 => sr0: ReadWrite<u16, SR0::Register>),
        (0x06 => _reserved1),
        /// Status 1, posted write state
        (0x08 => sr1: ReadOnly<u16>),
        (0x0a => _reserved2),
        /// Count, low half
        (0x0c => cnt0: ReadWrite<u16>),
        (0x0e => _reserved3),
        /// Count, high half
        (0x10 => cnt1: ReadWrite<u16>),
        (0x12 => _reserved4),
        /// Alarm, low half
        (0x14 => alm0: ReadWrite<u16>),
        (0x16 => _reserved5),
        /// Alarm, high half
        (0x18 => alm1: ReadWrite<u16>),
        (0x1a => _reserved6),
        /// Trim
        (0x1c => trm: ReadWrite<u16, TRM::Register>),
        (0x1e => _reserved7),
        /// Control 1
        (0x28 => cr1: ReadWrite<u16, CR1::Register>),
        (0x2a => _reserved8),
        (0x30 => @END),
    }
}

register_bitfields! [u16,
    CR0 [
        CNTEN OFFSET(0) NUMBITS(1) [],
        ALMEN OFFSET(1) NUMBITS(1) [],
        ALMINTEN OFFSET(2) NUMBITS(1) [],
        TRMEN OFFSET(3) NUMBITS(1) []
    ],
    SR0 [
        ALMINT OFFSET(1) NUMBITS(1) []
    ],
    TRM [
        /// Trim value in prescaled RTC time units
        VALUE OFFSET(0) NUMBITS(3) [],
        /// Add or subtract the trim value
        ADD OFFSET(3) NUMBITS(1) [
            Subtract = 0,
            Add = 1
        ],
        /// Trim interval, `2^(12 + IVL)` prescaled time units
        IVL OFFSET(4) NUMBITS(2) []
    ],
    CR1 [
        /// Prescale power of two, 0 through 15
        PRESCALE2EXP OFFSET(5) NUMBITS(4) []
    ]
];

/// SR1 write-pending flags for CR0, SR0, CNT0, CNT1, ALM0, ALM1 and TRM.
const SR1_WPND_MASK: u16 = 0x3f80;

const RTC1_BASE: StaticRef<RtcRegisters> =
    unsafe { StaticRef::new(0x4000_1400 as *const RtcRegisters) };

/// How often the trim value is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrimInterval {
    Pow12 = 0,
    Pow13 = 1,
    Pow14 = 2,
    Pow15 = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrimPolarity {
    Add,
    Subtract,
}

/// Register-level operations of an RTC counter with one alarm.
pub trait RtcDriver {
    /// Route the LF crystal to the LF clock mux.
    fn select_lf_clock(&self);

    /// Start the LF crystal oscillator.
    fn enable_lf_clock(&self);

    /// Put the RTC in a known state with the counter and alarm disabled,
    /// and unmask its interrupt line.
    fn open(&self);

    fn set_prescale(&self, exp: u8);

    fn set_count(&self, count: u32);

    fn set_trim(&self, interval: TrimInterval, value: u8, polarity: TrimPolarity);

    fn enable_trim(&self, enable: bool);

    /// Start or stop the counter.
    fn enable(&self, enable: bool);

    /// The current 32-bit count.
    fn count(&self) -> u32;

    fn set_alarm(&self, ticks: u32);

    fn enable_alarm(&self, enable: bool);

    fn enable_alarm_interrupt(&self, enable: bool);

    /// Whether the alarm matched since the last call. The status is
    /// cleared as it is read.
    fn take_alarm_event(&self) -> bool;
}

pub struct Rtc {
    registers: StaticRef<RtcRegisters>,
    osc: Oscillators,
    nvic: Nvic,
}

impl Rtc {
    pub const fn new() -> Rtc {
        Rtc {
            registers: RTC1_BASE,
            osc: Oscillators::new(),
            nvic: unsafe { Nvic::new(interrupts::RTC1_EVT) },
        }
    }

    /// Wait for every posted write to land in the always-on domain.
    fn sync(&self) {
        while self.registers.sr1.get() & SR1_WPND_MASK != 0 {
            core::hint::spin_loop();
        }
    }
}

impl RtcDriver for Rtc {
    fn select_lf_clock(&self) {
        self.osc.set_lf_clock_mux(LfClockSource::LfXtal);
    }

    fn enable_lf_clock(&self) {
        self.osc.enable_lf_xtal(true);
    }

    fn open(&self) {
        let regs = self.registers;
        self.nvic.disable();
        self.sync();
        regs.cr0.set(0);
        self.sync();
        regs.sr0.write(SR0::ALMINT::SET);
        self.nvic.clear_pending();
        self.nvic.enable();
    }

    fn set_prescale(&self, exp: u8) {
        self.sync();
        self.registers
            .cr1
            .modify(CR1::PRESCALE2EXP.val(u16::from(exp)));
    }

    fn set_count(&self, count: u32) {
        let regs = self.registers;
        // The counter must be stopped while both halves are written.
        let running = regs.cr0.is_set(CR0::CNTEN);
        self.enable(false);
        self.sync();
        regs.cnt0.set(count as u16);
        regs.cnt1.set((count >> 16) as u16);
        if running {
            self.enable(true);
        }
    }

    fn set_trim(&self, interval: TrimInterval, value: u8, polarity: TrimPolarity) {
        let polarity = match polarity {
            TrimPolarity::Add => TRM::ADD::Add,
            TrimPolarity::Subtract => TRM::ADD::Subtract,
        };
        self.sync();
        self.registers.trm.write(
            TRM::IVL.val(interval as u16) + TRM::VALUE.val(u16::from(value)) + polarity,
        );
    }

    fn enable_trim(&self, enable: bool) {
        self.sync();
        self.registers.cr0.modify(if enable {
            CR0::TRMEN::SET
        } else {
            CR0::TRMEN::CLEAR
        });
    }

    fn enable(&self, enable: bool) {
        self.sync();
        self.registers.cr0.modify(if enable {
            CR0::CNTEN::SET
        } else {
            CR0::CNTEN::CLEAR
        });
    }

    fn count(&self) -> u32 {
        let regs = self.registers;
        // CNT1 can roll over between the two reads, so retry until the
        // high half reads the same on both sides of the low half.
        let mut high = regs.cnt1.get();
        loop {
            let low = regs.cnt0.get();
            let high_after = regs.cnt1.get();
            if high == high_after {
                return (u32::from(high) << 16) | u32::from(low);
            }
            high = high_after;
        }
    }

    fn set_alarm(&self, ticks: u32) {
        let regs = self.registers;
        self.sync();
        regs.alm0.set(ticks as u16);
        regs.alm1.set((ticks >> 16) as u16);
    }

    fn enable_alarm(&self, enable: bool) {
        self.sync();
        self.registers.cr0.modify(if enable {
            CR0::ALMEN::SET
        } else {
            CR0::ALMEN::CLEAR
        });
    }

    fn enable_alarm_interrupt(&self, enable: bool) {
        self.sync();
        self.registers.cr0.modify(if enable {
            CR0::ALMINTEN::SET
        } else {
            CR0::ALMINTEN::CLEAR
        });
    }

    fn take_alarm_event(&self) -> bool {
        let regs = self.registers;
        if regs.sr0.is_set(SR0::ALMINT) {
            self.sync();
            regs.sr0.write(SR0::ALMINT::SET);
            true
        } else {
            false
        }
    }
}

/// Tick rate of the RTC1 counter.
#[derive(Debug)]
pub struct RtcFreq(());

impl Frequency for RtcFreq {
    fn frequency() -> u32 {
        LFCLK_FREQUENCY_HZ >> RTC_PRESCALER
    }
}

#[cfg(test)]
mod tests {
    use super::{RtcFreq, LFCLK_FREQUENCY_HZ};
    use kernel::hil::time::Frequency;

    #[test]
    fn counter_runs_at_lf_clock() {
        assert_eq!(RtcFreq::frequency(), LFCLK_FREQUENCY_HZ);
        assert_eq!(RtcFreq::frequency(), 32768);
    }
}
