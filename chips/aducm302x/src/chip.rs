// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Chip trait setup.

use kernel::platform::chip::InterruptService;

use crate::gpio::{Gpio, IrqGroup};
use crate::gpio_irq::GpioIrq;
use crate::interrupts;
use crate::lp_ticker::LpTicker;
use crate::rng::{Rng, Trng};
use crate::rtc::Rtc;

pub struct Aducm302xDefaultPeripherals {
    pub gpio_irq: GpioIrq<'static, Gpio>,
    pub lp_ticker: LpTicker<'static, Rtc>,
    pub trng: Trng<Rng>,
}

impl Aducm302xDefaultPeripherals {
    pub const fn new() -> Self {
        Self {
            gpio_irq: GpioIrq::new(Gpio::new()),
            lp_ticker: LpTicker::new(Rtc::new()),
            trng: Trng::new(Rng::new()),
        }
    }
}

impl InterruptService for Aducm302xDefaultPeripherals {
    unsafe fn service_interrupt(&self, interrupt: u32) -> bool {
        match interrupt {
            interrupts::RTC1_EVT => self.lp_ticker.handle_interrupt(),
            interrupts::SYS_GPIO_INTA => self.gpio_irq.handle_interrupt(IrqGroup::A),
            interrupts::SYS_GPIO_INTB => self.gpio_irq.handle_interrupt(IrqGroup::B),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::Aducm302xDefaultPeripherals;
    use crate::interrupts;
    use kernel::platform::chip::InterruptService;

    #[test]
    fn unrouted_interrupts_are_unhandled() {
        let peripherals = Aducm302xDefaultPeripherals::new();
        for interrupt in [
            interrupts::XINT_EVT0,
            interrupts::WDT_EXP,
            interrupts::RTC0_EVT,
            interrupts::TMR0_EVT,
            interrupts::UART_EVT,
            100,
        ] {
            assert!(!unsafe { peripherals.service_interrupt(interrupt) });
        }
    }
}
