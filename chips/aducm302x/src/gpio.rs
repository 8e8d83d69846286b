// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! General Purpose Input Output (GPIO) block, ADuCM302x-family
//!
//! The block has three ports (GPIO0 and GPIO1 with 16 pins, GPIO2 with 12).
//! Each port has two interrupt groups, A and B, with one enable register
//! apiece (`IENA`, `IENB`) and a single shared polarity register (`POL`):
//! a set polarity bit triggers on the rising edge, a clear one on the
//! falling edge. Group A raises `SYS_GPIO_INTA` and group B raises
//! `SYS_GPIO_INTB`, for all three ports.
//!
//! This module only describes the hardware and the register-level
//! operations on it. Channel management lives in [`crate::gpio_irq`].

use kernel::utilities::registers::interfaces::{Readable, Writeable};
use kernel::utilities::registers::{register_structs, ReadWrite};
use kernel::utilities::StaticRef;

use crate::interrupts;
use crate::nvic::Nvic;

pub const NUM_PORTS: usize = 3;
pub const NUM_PINS: usize = 16;

const GPIO_PORT_SHIFT: u32 = 12;

register_structs! {
    GpioRegisters {
        (0x00 => _cfg),
        /// Output enable
        (0x04 => oen: ReadWrite<u16>),
        (0x06 => _reserved0),
        /// Input path enable
        (0x0c => ien: ReadWrite<u16>),
        (0x0e => _reserved1),
        /// Interrupt polarity, 1 = rising edge
        (0x24 => pol: ReadWrite<u16>),
        (0x26 => _reserved2),
        /// Interrupt A enable
        (0x28 => iena: ReadWrite<u16>),
        (0x2a => _reserved3),
        /// Interrupt B enable
        (0x2c => ienb: ReadWrite<u16>),
        (0x2e => _reserved4),
        /// Interrupt status, write 1 to clear
        (0x30 => int: ReadWrite<u16>),
        (0x32 => _reserved5),
        (0x40 => @END),
    }
}

const GPIO0_BASE: StaticRef<GpioRegisters> =
    unsafe { StaticRef::new(0x4002_0000 as *const GpioRegisters) };
const GPIO1_BASE: StaticRef<GpioRegisters> =
    unsafe { StaticRef::new(0x4002_0040 as *const GpioRegisters) };
const GPIO2_BASE: StaticRef<GpioRegisters> =
    unsafe { StaticRef::new(0x4002_0080 as *const GpioRegisters) };

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum GpioPort {
    GPIO0 = 0,
    GPIO1 = 1,
    GPIO2 = 2,
}

impl GpioPort {
    pub const ALL: [GpioPort; NUM_PORTS] = [GpioPort::GPIO0, GpioPort::GPIO1, GpioPort::GPIO2];

    /// Number of pins bonded out on this port.
    pub const fn num_pins(self) -> usize {
        match self {
            GpioPort::GPIO0 | GpioPort::GPIO1 => 16,
            GpioPort::GPIO2 => 12,
        }
    }
}

/// One of the two interrupt-enable banks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IrqGroup {
    A,
    B,
}

impl IrqGroup {
    /// The NVIC line this group raises.
    pub const fn interrupt(self) -> u32 {
        match self {
            IrqGroup::A => interrupts::SYS_GPIO_INTA,
            IrqGroup::B => interrupts::SYS_GPIO_INTB,
        }
    }
}

const fn gpio_id(port: GpioPort, pin: u32) -> u32 {
    ((port as u32) << GPIO_PORT_SHIFT) | pin
}

/// Pin names as the board framework spells them: `port << 12 | pin`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
#[rustfmt::skip]
pub enum PinName {
    P0_00 = gpio_id(GpioPort::GPIO0, 0),
    P0_01 = gpio_id(GpioPort::GPIO0, 1),
    P0_02 = gpio_id(GpioPort::GPIO0, 2),
    P0_03 = gpio_id(GpioPort::GPIO0, 3),
    P0_04 = gpio_id(GpioPort::GPIO0, 4),
    P0_05 = gpio_id(GpioPort::GPIO0, 5),
    P0_06 = gpio_id(GpioPort::GPIO0, 6),
    P0_07 = gpio_id(GpioPort::GPIO0, 7),
    P0_08 = gpio_id(GpioPort::GPIO0, 8),
    P0_09 = gpio_id(GpioPort::GPIO0, 9),
    P0_10 = gpio_id(GpioPort::GPIO0, 10),
    P0_11 = gpio_id(GpioPort::GPIO0, 11),
    P0_12 = gpio_id(GpioPort::GPIO0, 12),
    P0_13 = gpio_id(GpioPort::GPIO0, 13),
    P0_14 = gpio_id(GpioPort::GPIO0, 14),
    P0_15 = gpio_id(GpioPort::GPIO0, 15),

    P1_00 = gpio_id(GpioPort::GPIO1, 0),
    P1_01 = gpio_id(GpioPort::GPIO1, 1),
    P1_02 = gpio_id(GpioPort::GPIO1, 2),
    P1_03 = gpio_id(GpioPort::GPIO1, 3),
    P1_04 = gpio_id(GpioPort::GPIO1, 4),
    P1_05 = gpio_id(GpioPort::GPIO1, 5),
    P1_06 = gpio_id(GpioPort::GPIO1, 6),
    P1_07 = gpio_id(GpioPort::GPIO1, 7),
    P1_08 = gpio_id(GpioPort::GPIO1, 8),
    P1_09 = gpio_id(GpioPort::GPIO1, 9),
    P1_10 = gpio_id(GpioPort::GPIO1, 10),
    P1_11 = gpio_id(GpioPort::GPIO1, 11),
    P1_12 = gpio_id(GpioPort::GPIO1, 12),
    P1_13 = gpio_id(GpioPort::GPIO1, 13),
    P1_14 = gpio_id(GpioPort::GPIO1, 14),
    P1_15 = gpio_id(GpioPort::GPIO1, 15),

    P2_00 = gpio_id(GpioPort::GPIO2, 0),
    P2_01 = gpio_id(GpioPort::GPIO2, 1),
    P2_02 = gpio_id(GpioPort::GPIO2, 2),
    P2_03 = gpio_id(GpioPort::GPIO2, 3),
    P2_04 = gpio_id(GpioPort::GPIO2, 4),
    P2_05 = gpio_id(GpioPort::GPIO2, 5),
    P2_06 = gpio_id(GpioPort::GPIO2, 6),
    P2_07 = gpio_id(GpioPort::GPIO2, 7),
    P2_08 = gpio_id(GpioPort::GPIO2, 8),
    P2_09 = gpio_id(GpioPort::GPIO2, 9),
    P2_10 = gpio_id(GpioPort::GPIO2, 10),
    P2_11 = gpio_id(GpioPort::GPIO2, 11),

    /// Not connected
    NC = 0xFFFF_FFFF,
}

impl PinName {
    /// The port this pin belongs to, or `None` for `NC`.
    pub const fn port(self) -> Option<GpioPort> {
        match self as u32 >> GPIO_PORT_SHIFT {
            0 => Some(GpioPort::GPIO0),
            1 => Some(GpioPort::GPIO1),
            2 => Some(GpioPort::GPIO2),
            _ => None,
        }
    }

    /// Returns the pin offset within its port, half-closed range [0, 16)
    pub const fn offset(self) -> usize {
        (self as u32 & 0xFF) as usize
    }
}

/// Register-level operations of the GPIO block.
///
/// This is the surface of the vendor driver that the channel layer relies
/// on. Every method is a short register access that takes effect before it
/// returns; none of them block.
pub trait GpioDriver {
    /// One-time bring-up of the block.
    fn init(&self);

    /// Enable or disable the input path (and clear the output enable) for
    /// each pin set in `pins`.
    fn input_enable(&self, port: GpioPort, pins: u16, enable: bool);

    /// The full content of `group`'s enable register for `port`.
    fn group_interrupt_pins(&self, port: GpioPort, group: IrqGroup) -> u16;

    fn set_group_interrupt_pins(&self, port: GpioPort, group: IrqGroup, pins: u16);

    /// The full content of the polarity register for `port`.
    fn group_interrupt_polarity(&self, port: GpioPort) -> u16;

    fn set_group_interrupt_polarity(&self, port: GpioPort, pins: u16);

    /// Route `group`'s interrupt line to the GPIO handler.
    fn register_group_callback(&self, group: IrqGroup);

    /// Latched interrupts of `port` that are enabled in `group`. The returned
    /// bits are cleared in hardware.
    fn take_group_interrupts(&self, port: GpioPort, group: IrqGroup) -> u16;

    /// Latched interrupts of `port`, left in place.
    fn pending_interrupts(&self, port: GpioPort) -> u16;

    /// Discard latched interrupts for the pins set in `pins`.
    fn clear_interrupts(&self, port: GpioPort, pins: u16);
}

pub struct Gpio {
    ports: [StaticRef<GpioRegisters>; NUM_PORTS],
    inta: Nvic,
    intb: Nvic,
}

impl Gpio {
    pub const fn new() -> Gpio {
        Gpio {
            ports: [GPIO0_BASE, GPIO1_BASE, GPIO2_BASE],
            inta: unsafe { Nvic::new(interrupts::SYS_GPIO_INTA) },
            intb: unsafe { Nvic::new(interrupts::SYS_GPIO_INTB) },
        }
    }

    fn registers(&self, port: GpioPort) -> &GpioRegisters {
        &self.ports[port as usize]
    }

    fn nvic(&self, group: IrqGroup) -> &Nvic {
        match group {
            IrqGroup::A => &self.inta,
            IrqGroup::B => &self.intb,
        }
    }
}

impl GpioDriver for Gpio {
    fn init(&self) {
        for port in GpioPort::ALL {
            let regs = self.registers(port);
            regs.int.set(regs.int.get());
        }
        self.inta.clear_pending();
        self.intb.clear_pending();
    }

    fn input_enable(&self, port: GpioPort, pins: u16, enable: bool) {
        let regs = self.registers(port);
        if enable {
            regs.oen.set(regs.oen.get() & !pins);
            regs.ien.set(regs.ien.get() | pins);
        } else {
            regs.ien.set(regs.ien.get() & !pins);
        }
    }

    fn group_interrupt_pins(&self, port: GpioPort, group: IrqGroup) -> u16 {
        let regs = self.registers(port);
        match group {
            IrqGroup::A => regs.iena.get(),
            IrqGroup::B => regs.ienb.get(),
        }
    }

    fn set_group_interrupt_pins(&self, port: GpioPort, group: IrqGroup, pins: u16) {
        let regs = self.registers(port);
        match group {
            IrqGroup::A => regs.iena.set(pins),
            IrqGroup::B => regs.ienb.set(pins),
        }
    }

    fn group_interrupt_polarity(&self, port: GpioPort) -> u16 {
        self.registers(port).pol.get()
    }

    fn set_group_interrupt_polarity(&self, port: GpioPort, pins: u16) {
        self.registers(port).pol.set(pins);
    }

    fn register_group_callback(&self, group: IrqGroup) {
        self.nvic(group).enable();
    }

    fn take_group_interrupts(&self, port: GpioPort, group: IrqGroup) -> u16 {
        let regs = self.registers(port);
        let pending = regs.int.get() & self.group_interrupt_pins(port, group);
        // W1C: only clear what is being handed out, the other group may
        // still be waiting on its own bits.
        regs.int.set(pending);
        pending
    }

    fn pending_interrupts(&self, port: GpioPort) -> u16 {
        self.registers(port).int.get()
    }

    fn clear_interrupts(&self, port: GpioPort, pins: u16) {
        self.registers(port).int.set(pins);
    }
}
