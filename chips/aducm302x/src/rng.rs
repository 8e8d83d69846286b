// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! True random number generator.
//!
//! The RNG accumulates oscillator jitter for a programmable sample length
//! (`reload * 2^prescaler` clock cycles) and then raises `RNRDY`. Each
//! sample yields one byte.

use kernel::hil::entropy;
use kernel::utilities::registers::interfaces::{ReadWriteable, Readable, Writeable};
use kernel::utilities::registers::{register_bitfields, register_structs, ReadOnly, ReadWrite};
use kernel::utilities::StaticRef;
use kernel::ErrorCode;

/// Sample length prescaler exponent, 0 through 10.
const TRNG_PRESCALER: u8 = 2;
/// Sample length reload value, 0 through 4095.
const TRNG_CNT_VAL: u16 = 4095;

register_structs! {
    RngRegisters {
        (0x00 => ctl: ReadWrite<u16, CTL::Register>),
        (0x02 => _reserved0),
        (0x04 => len: ReadWrite<u16, LEN::Register>),
        (0x06 => _reserved1),
        (0x08 => stat: ReadWrite<u16, STAT::Register>),
        (0x0a => _reserved2),
        (0x0c => data: ReadOnly<u32>),
        (0x10 => @END),
    }
}

register_bitfields! [u16,
    CTL [
        EN OFFSET(0) NUMBITS(1) [],
        /// Stop after one sample instead of running continuously
        SINGLE OFFSET(3) NUMBITS(1) []
    ],
    LEN [
        RELOAD OFFSET(0) NUMBITS(12) [],
        PRESCALE OFFSET(12) NUMBITS(4) []
    ],
    STAT [
        /// Sample ready, cleared by reading DATA
        RNRDY OFFSET(0) NUMBITS(1) [],
        /// Oscillator stuck, write 1 to clear
        STUCK OFFSET(1) NUMBITS(1) []
    ]
];

const RNG_BASE: StaticRef<RngRegisters> =
    unsafe { StaticRef::new(0x4004_0000 as *const RngRegisters) };

/// Register-level operations of the RNG block.
pub trait RngDriver {
    fn open(&self);
    fn close(&self);
    fn set_sample_len(&self, prescaler: u8, reload: u16);
    fn enable(&self, enable: bool);
    fn is_ready(&self) -> bool;
    /// The latest sample. Reading it clears the ready flag.
    fn data(&self) -> u32;
}

pub struct Rng {
    registers: StaticRef<RngRegisters>,
}

impl Rng {
    pub const fn new() -> Rng {
        Rng {
            registers: RNG_BASE,
        }
    }
}

impl RngDriver for Rng {
    fn open(&self) {
        let regs = self.registers;
        regs.ctl.write(CTL::EN::CLEAR + CTL::SINGLE::CLEAR);
        regs.stat.write(STAT::STUCK::SET);
    }

    fn close(&self) {
        self.registers.ctl.set(0);
    }

    fn set_sample_len(&self, prescaler: u8, reload: u16) {
        self.registers
            .len
            .write(LEN::PRESCALE.val(u16::from(prescaler)) + LEN::RELOAD.val(reload));
    }

    fn enable(&self, enable: bool) {
        self.registers.ctl.modify(if enable {
            CTL::EN::SET
        } else {
            CTL::EN::CLEAR
        });
    }

    fn is_ready(&self) -> bool {
        self.registers.stat.is_set(STAT::RNRDY)
    }

    fn data(&self) -> u32 {
        self.registers.data.get()
    }
}

pub struct Trng<D: RngDriver> {
    rng: D,
}

impl<D: RngDriver> Trng<D> {
    pub const fn new(rng: D) -> Self {
        Trng { rng }
    }

    pub fn rng(&self) -> &D {
        &self.rng
    }
}

impl<D: RngDriver> entropy::Trng for Trng<D> {
    fn init(&self) {
        self.rng.open();
        self.rng.set_sample_len(TRNG_PRESCALER, TRNG_CNT_VAL);
        self.rng.enable(true);
    }

    fn free(&self) {
        self.rng.enable(false);
        self.rng.close();
    }

    fn get_bytes(&self, buf: &mut [u8]) -> Result<usize, ErrorCode> {
        for byte in buf.iter_mut() {
            while !self.rng.is_ready() {
                core::hint::spin_loop();
            }
            *byte = self.rng.data() as u8;
        }
        Ok(buf.len())
    }
}
