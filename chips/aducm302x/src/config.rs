// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Compile-time configuration options for the chip crate.
//!
//! As in the kernel crate, options live in a typed `const` so that every code
//! path is type-checked whether or not it is enabled, and disabled paths fold
//! away after constant propagation.

use crate::gpio_irq::InFlightPolicy;

/// Data structure holding compile-time configuration options.
pub(crate) struct Config {
    /// Whether GPIO channel lifecycle operations (init, set, enable, disable,
    /// free) are traced through `log::debug!`.
    ///
    /// The interrupt demultiplexer never logs, regardless of this option.
    pub(crate) trace_gpio_irq: bool,

    /// Whether the low-power ticker traces initialization and which deadline
    /// regime each `set_interrupt` call took.
    pub(crate) trace_lp_ticker: bool,

    /// What GPIO channels do with an interrupt that latched before the
    /// channel was disabled but is serviced after.
    pub(crate) gpio_in_flight_policy: InFlightPolicy,
}

/// The unique instance of `Config`. This is the only location in the crate
/// where `#[cfg(x)]` style configuration based on Cargo features is used.
pub(crate) const CONFIG: Config = Config {
    trace_gpio_irq: cfg!(feature = "trace_gpio_irq"),
    trace_lp_ticker: cfg!(feature = "trace_lp_ticker"),
    gpio_in_flight_policy: if cfg!(feature = "deliver_stale_gpio_irqs") {
        InFlightPolicy::Deliver
    } else {
        InFlightPolicy::Suppress
    },
};
