// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Hardware agnostic interfaces for time and low-power tickers.
//!
//! A low-power ticker is a free-running counter clocked from a slow
//! reference (typically a 32.768 kHz crystal) with a single compare register.
//! The board framework schedules all of its timeouts through one absolute
//! deadline at a time, expressed in microseconds; the chip converts to its
//! native ticks.

/// Trait to represent clock frequency in Hz
///
/// This trait is used as an associated type for `Time` so clients can
/// portably convert native ticks to real-time values.
pub trait Frequency {
    /// Returns frequency in Hz.
    fn frequency() -> u32;
}

/// 32.768KHz `Frequency`
#[derive(Debug)]
pub struct Freq32KHz;
impl Frequency for Freq32KHz {
    fn frequency() -> u32 {
        32768
    }
}

/// An object that tracks the passage of time in hardware ticks.
pub trait Time {
    /// The number of ticks per second
    type Frequency: Frequency;

    /// Returns the current time in hardware clock units.
    fn now(&self) -> u32;
}

/// Conversions between hardware ticks and microseconds.
///
/// Both directions truncate toward zero. Converting microseconds to ticks
/// and back therefore never overshoots, and undershoots by less than one
/// tick period (rounded up to whole microseconds). Both conversions are
/// monotonic, so a non-decreasing counter always reads as non-decreasing
/// time.
pub trait ConvertTicks {
    /// Returns the number of ticks in the provided number of microseconds,
    /// rounding down any fractions.
    fn ticks_from_us(&self, us: u32) -> u32;

    /// Returns the number of microseconds in the provided number of ticks,
    /// rounding down any fractions. The result wraps at 2^32 microseconds.
    fn ticks_to_us(&self, tick: u32) -> u32;
}

impl<T: Time + ?Sized> ConvertTicks for T {
    #[inline]
    fn ticks_from_us(&self, us: u32) -> u32 {
        let freq = <T::Frequency>::frequency() as u64;
        ((us as u64 * freq) / 1_000_000) as u32
    }

    #[inline]
    fn ticks_to_us(&self, tick: u32) -> u32 {
        let freq = <T::Frequency>::frequency() as u64;
        ((tick as u64 * 1_000_000) / freq) as u32
    }
}

/// A client of a [`LowPowerTicker`].
pub trait TickerClient {
    /// Called when the deadline passed to
    /// [`LowPowerTicker::set_interrupt`] is reached.
    ///
    /// This may run synchronously from inside `set_interrupt` when the
    /// deadline has already passed or is too close to arm the hardware, or
    /// later from interrupt context. Implementations must not block.
    fn fired(&self);
}

/// A low-power ticker with a single one-shot deadline.
pub trait LowPowerTicker<'a>: Time {
    /// Start the clock source and the counter from zero.
    fn init(&self);

    /// The current counter value in microseconds.
    fn read(&self) -> u32;

    /// Request a callback when the counter reaches `timestamp` microseconds.
    ///
    /// A deadline that has already passed fires before this call returns.
    fn set_interrupt(&self, timestamp: u32);

    /// Disarm the deadline and mask its interrupt. Idempotent.
    fn disable_interrupt(&self);

    /// Acknowledge a delivered interrupt.
    fn clear_interrupt(&self);

    /// Set the client that receives deadline callbacks.
    fn set_client(&self, client: &'a dyn TickerClient);
}
