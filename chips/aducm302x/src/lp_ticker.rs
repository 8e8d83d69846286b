// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Low-power ticker on RTC1.
//!
//! `read` returns the counter in microseconds, truncated to 32 bits, so the
//! microsecond time base wraps at 2^32 us (about 71.6 minutes), long before
//! the tick counter does. Deadlines are absolute timestamps on that wrapping
//! base: `set_interrupt` takes the wrapping distance from `read()` to the
//! deadline, converts it to ticks (truncating) and adds it to the raw count.
//! A deadline more than 2^31 us ahead counts as already passed.
//!
//! Depending on that distance, `set_interrupt` takes one of three paths:
//!
//! - expired (zero ticks or behind): the client is called before returning;
//! - imminent (up to `TICKS_TO_ENABLE_ALARM` ticks): too close for the alarm
//!   to be armed in time, so the counter is polled until it gets there and
//!   the client is called before returning;
//! - future: the alarm is armed and the client is called from the RTC
//!   interrupt.

use core::cell::Cell;

use kernel::hil::time::{ConvertTicks, LowPowerTicker, TickerClient, Time};

use crate::config::CONFIG;
use crate::rtc::{RtcDriver, RtcFreq, TrimInterval, TrimPolarity, RTC_PRESCALER};

/// Ticks needed between arming the alarm and its match for the match to be
/// seen by the hardware.
pub const TICKS_TO_ENABLE_ALARM: u32 = 50;

const TRIM_INTERVAL: TrimInterval = TrimInterval::Pow14;
const TRIM_VALUE: u8 = 1;
const TRIM_POLARITY: TrimPolarity = TrimPolarity::Subtract;

pub struct LpTicker<'a, D: RtcDriver> {
    rtc: D,
    client: Cell<Option<&'a dyn TickerClient>>,
}

impl<'a, D: RtcDriver> LpTicker<'a, D> {
    pub const fn new(rtc: D) -> Self {
        LpTicker {
            rtc,
            client: Cell::new(None),
        }
    }

    pub fn rtc(&self) -> &D {
        &self.rtc
    }

    fn fire(&self) {
        if let Some(client) = self.client.get() {
            client.fired();
        }
    }

    /// RTC1 interrupt: deliver an alarm match to the client.
    pub fn handle_interrupt(&self) {
        if self.rtc.take_alarm_event() {
            // One shot: the next deadline re-arms it.
            self.rtc.enable_alarm(false);
            self.fire();
        }
    }
}

impl<D: RtcDriver> Time for LpTicker<'_, D> {
    type Frequency = RtcFreq;

    fn now(&self) -> u32 {
        self.rtc.count()
    }
}

impl<'a, D: RtcDriver> LowPowerTicker<'a> for LpTicker<'a, D> {
    fn init(&self) {
        self.rtc.select_lf_clock();
        self.rtc.enable_lf_clock();

        self.rtc.open();
        self.rtc.set_prescale(RTC_PRESCALER);
        self.rtc.set_count(0);
        self.rtc.set_trim(TRIM_INTERVAL, TRIM_VALUE, TRIM_POLARITY);
        self.rtc.enable_trim(true);
        self.rtc.enable(true);

        if CONFIG.trace_lp_ticker {
            log::debug!("lp_ticker: started, prescaler 2^{}", RTC_PRESCALER);
        }
    }

    fn read(&self) -> u32 {
        self.ticks_to_us(self.now())
    }

    fn set_interrupt(&self, timestamp: u32) {
        let now = self.now();
        let delta_us = timestamp.wrapping_sub(self.ticks_to_us(now));
        let delta = if (delta_us as i32) < 0 {
            0
        } else {
            self.ticks_from_us(delta_us)
        };
        let target = now.wrapping_add(delta);

        if delta == 0 {
            if CONFIG.trace_lp_ticker {
                log::debug!("lp_ticker: {} expired at {}", timestamp, now);
            }
            self.fire();
        } else if delta <= TICKS_TO_ENABLE_ALARM {
            if CONFIG.trace_lp_ticker {
                log::debug!("lp_ticker: {} imminent at {}, polling", target, now);
            }
            while self.now().wrapping_sub(now) < delta {
                core::hint::spin_loop();
            }
            self.fire();
        } else {
            if CONFIG.trace_lp_ticker {
                log::debug!("lp_ticker: alarm armed for {} at {}", target, now);
            }
            self.rtc.enable_alarm_interrupt(true);
            self.rtc.set_alarm(target);
            self.rtc.enable_alarm(true);
        }
    }

    fn disable_interrupt(&self) {
        self.rtc.enable_alarm(false);
        self.rtc.enable_alarm_interrupt(false);
    }

    fn clear_interrupt(&self) {
        // The status bit is cleared when the interrupt is handled.
    }

    fn set_client(&self, client: &'a dyn TickerClient) {
        self.client.set(Some(client));
    }
}
