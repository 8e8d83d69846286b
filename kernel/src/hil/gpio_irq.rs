// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Interfaces for GPIO edge interrupts delivered through logical channels.
//!
//! A channel binds one physical pin to a caller-chosen, non-zero identifier.
//! When the pin sees the configured edge, the registered [`Client`] is told
//! which identifier fired and on which edge. There is a single client for
//! all channels of a chip: every `init` call that supplies a client replaces
//! the previous one ("last registration wins").

use crate::ErrorCode;

/// The edge a channel is watching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IrqEvent {
    /// Not configured. A channel in this state never raises interrupts.
    #[default]
    None,
    /// Low-to-high transition.
    Rise,
    /// High-to-low transition.
    Fall,
}

/// Receiver of channel interrupts.
///
/// `fired` runs in interrupt context. Implementations must not block,
/// allocate, or wait on anything the normal context might hold, and should
/// return quickly.
pub trait Client {
    /// Called once per pin that fired. `id` is the identifier the channel
    /// was initialized with and `event` the edge it was configured for.
    fn fired(&self, id: u32, event: IrqEvent);
}

/// Lifecycle operations over a chip's GPIO interrupt channels.
pub trait InterruptChannels<'a> {
    /// The chip's name for a physical pin.
    type Pin;
    /// Handle to an initialized channel.
    type Channel;

    /// Bind `pin` to `id` and configure it as an interrupt-capable input.
    ///
    /// The channel starts unconfigured (no edge, disabled). If `client` is
    /// `Some`, it replaces the client used for every channel.
    ///
    /// Returns `INVAL` if `pin` does not name a pin or `id` is zero, in which
    /// case no hardware state is touched.
    fn init(
        &self,
        pin: Self::Pin,
        client: Option<&'a dyn Client>,
        id: u32,
    ) -> Result<Self::Channel, ErrorCode>;

    /// Disable the channel and return its table entry to the unconfigured
    /// state.
    fn free(&self, channel: Self::Channel);

    /// Configure the edge to watch, then enable or disable the interrupt.
    ///
    /// Passing [`IrqEvent::None`] does nothing: a configured channel cannot
    /// be cleared through this call.
    fn set(&self, channel: &Self::Channel, event: IrqEvent, enable: bool);

    /// Enable interrupts for a configured channel. No effect on a channel
    /// without an edge.
    fn enable(&self, channel: &Self::Channel);

    /// Disable interrupts for a configured channel. Idempotent.
    fn disable(&self, channel: &Self::Channel);
}
