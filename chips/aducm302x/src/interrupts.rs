// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Named interrupts for the ADuCM302x NVIC.

pub const RTC1_EVT: u32 = 0;
pub const XINT_EVT0: u32 = 1;
pub const XINT_EVT1: u32 = 2;
pub const XINT_EVT2: u32 = 3;
pub const XINT_EVT3: u32 = 4;
pub const WDT_EXP: u32 = 5;
pub const PMG0_VREG_OVR: u32 = 6;
pub const PMG0_BATT_RANGE: u32 = 7;
pub const RTC0_EVT: u32 = 8;
pub const SYS_GPIO_INTA: u32 = 9;
pub const SYS_GPIO_INTB: u32 = 10;
pub const TMR0_EVT: u32 = 11;
pub const TMR1_EVT: u32 = 12;
pub const FLCC_EVT: u32 = 13;
pub const UART_EVT: u32 = 14;
