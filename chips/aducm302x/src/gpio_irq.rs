// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! GPIO edge interrupts through logical channels.
//!
//! Every pin of every port has one entry in a fixed table recording the
//! channel identifier, the configured edge and whether the channel is
//! enabled. Rising-edge channels are routed to interrupt group A, falling
//! edge channels to group B. When either group line fires, the latched pins
//! of each port are demultiplexed in ascending pin order and the single
//! registered [`Client`] is called once per deliverable entry.
//!
//! Usage
//! -----
//!
//! ```rust,ignore
//! let channel = peripherals.gpio_irq.init(PinName::P0_03, Some(&button), 7)?;
//! peripherals.gpio_irq.set(&channel, IrqEvent::Rise, true);
//! // ... button.fired(7, IrqEvent::Rise) on every rising edge ...
//! peripherals.gpio_irq.free(channel);
//! ```

use core::cell::Cell;

use kernel::hil::gpio_irq::{Client, InterruptChannels, IrqEvent};
use kernel::ErrorCode;

use crate::config::CONFIG;
use crate::gpio::{GpioDriver, GpioPort, IrqGroup, PinName, NUM_PINS, NUM_PORTS};

/// What happens to an interrupt that latched while a channel was enabled
/// but is only serviced after the channel was disabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InFlightPolicy {
    /// `disable` discards the latched bit and the demultiplexer skips
    /// disabled entries.
    Suppress,
    /// `disable` moves the latched bit into a software stash that the next
    /// group interrupt drains, and the demultiplexer delivers to any entry
    /// with an identifier, enabled or not.
    Deliver,
}

/// One entry of the channel table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelInfo {
    /// Zero when no channel is bound to the pin.
    pub id: u32,
    pub event: IrqEvent,
    pub enabled: bool,
}

impl ChannelInfo {
    pub const EMPTY: ChannelInfo = ChannelInfo {
        id: 0,
        event: IrqEvent::None,
        enabled: false,
    };
}

/// Handle returned by [`InterruptChannels::init`].
#[derive(Debug, PartialEq, Eq)]
pub struct GpioIrqChannel {
    pin: PinName,
    port: GpioPort,
    offset: usize,
    id: u32,
}

impl GpioIrqChannel {
    pub fn pin(&self) -> PinName {
        self.pin
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    fn mask(&self) -> u16 {
        1 << self.offset
    }
}

/// Iterator over the set bits of a word, lowest first.
struct BitOffsets(u32);

impl Iterator for BitOffsets {
    type Item = u32;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 != 0 {
            let offset = self.0.trailing_zeros();
            self.0 &= self.0 - 1;
            Some(offset)
        } else {
            None
        }
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        let popcnt = self.0.count_ones() as usize;
        (popcnt, Some(popcnt))
    }
}

impl ExactSizeIterator for BitOffsets {}

pub struct GpioIrq<'a, D: GpioDriver> {
    driver: D,
    channels: [[Cell<ChannelInfo>; NUM_PINS]; NUM_PORTS],
    handler: Cell<Option<&'a dyn Client>>,
    initialized: Cell<bool>,
    policy: InFlightPolicy,
    /// Per port, edges that latched before their channel was disabled.
    stashed: [Cell<u16>; NUM_PORTS],
}

impl<'a, D: GpioDriver> GpioIrq<'a, D> {
    pub const fn new(driver: D) -> Self {
        Self::with_policy(driver, CONFIG.gpio_in_flight_policy)
    }

    pub const fn with_policy(driver: D, policy: InFlightPolicy) -> Self {
        GpioIrq {
            driver,
            channels: [const { [const { Cell::new(ChannelInfo::EMPTY) }; NUM_PINS] }; NUM_PORTS],
            handler: Cell::new(None),
            initialized: Cell::new(false),
            policy,
            stashed: [const { Cell::new(0) }; NUM_PORTS],
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Current table entry for `pin`, `None` for `NC`.
    pub fn entry(&self, pin: PinName) -> Option<ChannelInfo> {
        pin.port()
            .map(|port| self.channels[port as usize][pin.offset()].get())
    }

    fn slot(&self, channel: &GpioIrqChannel) -> &Cell<ChannelInfo> {
        &self.channels[channel.port as usize][channel.offset]
    }

    fn update_group(&self, port: GpioPort, group: IrqGroup, f: impl FnOnce(u16) -> u16) {
        let pins = self.driver.group_interrupt_pins(port, group);
        self.driver.set_group_interrupt_pins(port, group, f(pins));
    }

    /// Service one group line: collect the latched pins of every port, plus
    /// any stashed in-flight edges, and hand them to [`GpioIrq::dispatch`].
    pub fn handle_interrupt(&self, group: IrqGroup) {
        for port in GpioPort::ALL {
            let pins = self.driver.take_group_interrupts(port, group)
                | self.stashed[port as usize].replace(0);
            if pins != 0 {
                self.dispatch(port, pins);
            }
        }
    }

    /// Deliver the fired `pins` of `port` to the client, lowest pin first.
    ///
    /// Runs in interrupt context.
    pub fn dispatch(&self, port: GpioPort, pins: u16) {
        let Some(handler) = self.handler.get() else {
            return;
        };
        let row = &self.channels[port as usize];
        BitOffsets(u32::from(pins))
            .map(|offset| row[offset as usize].get())
            .filter(|info| self.deliverable(info))
            .for_each(|info| handler.fired(info.id, info.event));
    }

    fn unstash(&self, port: GpioPort, mask: u16) {
        let stashed = &self.stashed[port as usize];
        stashed.set(stashed.get() & !mask);
    }

    fn deliverable(&self, info: &ChannelInfo) -> bool {
        if info.id == 0 {
            return false;
        }
        match self.policy {
            InFlightPolicy::Suppress => info.enabled,
            InFlightPolicy::Deliver => true,
        }
    }
}

impl<'a, D: GpioDriver> InterruptChannels<'a> for GpioIrq<'a, D> {
    type Pin = PinName;
    type Channel = GpioIrqChannel;

    fn init(
        &self,
        pin: PinName,
        client: Option<&'a dyn Client>,
        id: u32,
    ) -> Result<GpioIrqChannel, ErrorCode> {
        let port = pin.port().ok_or(ErrorCode::INVAL)?;
        if id == 0 || pin.offset() >= port.num_pins() {
            return Err(ErrorCode::INVAL);
        }

        if !self.initialized.get() {
            self.driver.init();
            self.initialized.set(true);
        }
        if let Some(client) = client {
            self.handler.set(Some(client));
        }

        let channel = GpioIrqChannel {
            pin,
            port,
            offset: pin.offset(),
            id,
        };
        let mask = channel.mask();
        self.update_group(port, IrqGroup::A, |pins| pins & !mask);
        self.update_group(port, IrqGroup::B, |pins| pins & !mask);
        // An edge left over from the previous binding is not the new one's.
        self.driver.clear_interrupts(port, mask);
        self.unstash(port, mask);
        self.driver.input_enable(port, mask, true);

        self.slot(&channel).set(ChannelInfo {
            id,
            event: IrqEvent::None,
            enabled: false,
        });

        if CONFIG.trace_gpio_irq {
            log::debug!("gpio_irq: init {:?} id {}", pin, id);
        }
        Ok(channel)
    }

    fn free(&self, channel: GpioIrqChannel) {
        self.disable(&channel);
        self.unstash(channel.port, channel.mask());
        self.slot(&channel).set(ChannelInfo::EMPTY);

        if CONFIG.trace_gpio_irq {
            log::debug!("gpio_irq: free {:?}", channel.pin);
        }
    }

    fn set(&self, channel: &GpioIrqChannel, event: IrqEvent, enable: bool) {
        let mask = channel.mask();
        let polarity = self.driver.group_interrupt_polarity(channel.port);
        let polarity = match event {
            IrqEvent::None => return,
            IrqEvent::Rise => polarity | mask,
            IrqEvent::Fall => polarity & !mask,
        };
        self.driver
            .set_group_interrupt_polarity(channel.port, polarity);

        let slot = self.slot(channel);
        slot.set(ChannelInfo { event, ..slot.get() });

        if CONFIG.trace_gpio_irq {
            log::debug!("gpio_irq: set {:?} {:?} enable {}", channel.pin, event, enable);
        }

        if enable {
            self.enable(channel);
        } else {
            self.disable(channel);
        }
    }

    fn enable(&self, channel: &GpioIrqChannel) {
        let slot = self.slot(channel);
        let info = slot.get();
        let (group, other) = match info.event {
            IrqEvent::None => return,
            IrqEvent::Rise => (IrqGroup::A, IrqGroup::B),
            IrqEvent::Fall => (IrqGroup::B, IrqGroup::A),
        };

        let mask = channel.mask();
        if !info.enabled {
            // Edges seen while disabled are not reported.
            self.driver.clear_interrupts(channel.port, mask);
        }
        self.driver.register_group_callback(group);
        // POL is shared, so a pin left in the other group would fire twice.
        self.update_group(channel.port, other, |pins| pins & !mask);
        self.update_group(channel.port, group, |pins| pins | mask);
        slot.set(ChannelInfo {
            enabled: true,
            ..info
        });

        if CONFIG.trace_gpio_irq {
            log::debug!("gpio_irq: enable {:?} group {:?}", channel.pin, group);
        }
    }

    fn disable(&self, channel: &GpioIrqChannel) {
        let slot = self.slot(channel);
        let info = slot.get();
        if info.event == IrqEvent::None {
            return;
        }

        let mask = channel.mask();
        let latched = self.driver.pending_interrupts(channel.port) & mask;
        self.update_group(channel.port, IrqGroup::A, |pins| pins & !mask);
        self.update_group(channel.port, IrqGroup::B, |pins| pins & !mask);
        self.driver.clear_interrupts(channel.port, mask);
        if self.policy == InFlightPolicy::Deliver && info.enabled && latched != 0 {
            // The group line is already pending in the NVIC, so the next
            // handle_interrupt drains the stash.
            let stashed = &self.stashed[channel.port as usize];
            stashed.set(stashed.get() | mask);
        }
        slot.set(ChannelInfo {
            enabled: false,
            ..info
        });

        if CONFIG.trace_gpio_irq {
            log::debug!("gpio_irq: disable {:?}", channel.pin);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;

    const ALL_PINS: [PinName; 44] = [
        PinName::P0_00, PinName::P0_01, PinName::P0_02, PinName::P0_03,
        PinName::P0_04, PinName::P0_05, PinName::P0_06, PinName::P0_07,
        PinName::P0_08, PinName::P0_09, PinName::P0_10, PinName::P0_11,
        PinName::P0_12, PinName::P0_13, PinName::P0_14, PinName::P0_15,
        PinName::P1_00, PinName::P1_01, PinName::P1_02, PinName::P1_03,
        PinName::P1_04, PinName::P1_05, PinName::P1_06, PinName::P1_07,
        PinName::P1_08, PinName::P1_09, PinName::P1_10, PinName::P1_11,
        PinName::P1_12, PinName::P1_13, PinName::P1_14, PinName::P1_15,
        PinName::P2_00, PinName::P2_01, PinName::P2_02, PinName::P2_03,
        PinName::P2_04, PinName::P2_05, PinName::P2_06, PinName::P2_07,
        PinName::P2_08, PinName::P2_09, PinName::P2_10, PinName::P2_11,
    ];

    #[derive(Default)]
    struct FakeGpio {
        init_calls: Cell<usize>,
        ien: [Cell<u16>; NUM_PORTS],
        pol: [Cell<u16>; NUM_PORTS],
        iena: [Cell<u16>; NUM_PORTS],
        ienb: [Cell<u16>; NUM_PORTS],
        int: [Cell<u16>; NUM_PORTS],
        registered: RefCell<Vec<IrqGroup>>,
    }

    impl FakeGpio {
        fn group(&self, port: GpioPort, group: IrqGroup) -> &Cell<u16> {
            match group {
                IrqGroup::A => &self.iena[port as usize],
                IrqGroup::B => &self.ienb[port as usize],
            }
        }

        fn latch(&self, port: GpioPort, pins: u16) {
            let int = &self.int[port as usize];
            int.set(int.get() | pins);
        }

        fn untouched(&self) -> bool {
            self.init_calls.get() == 0
                && self.registered.borrow().is_empty()
                && [&self.ien, &self.pol, &self.iena, &self.ienb]
                    .iter()
                    .all(|regs| regs.iter().all(|r| r.get() == 0))
        }
    }

    impl GpioDriver for FakeGpio {
        fn init(&self) {
            self.init_calls.set(self.init_calls.get() + 1);
        }

        fn input_enable(&self, port: GpioPort, pins: u16, enable: bool) {
            let ien = &self.ien[port as usize];
            if enable {
                ien.set(ien.get() | pins);
            } else {
                ien.set(ien.get() & !pins);
            }
        }

        fn group_interrupt_pins(&self, port: GpioPort, group: IrqGroup) -> u16 {
            self.group(port, group).get()
        }

        fn set_group_interrupt_pins(&self, port: GpioPort, group: IrqGroup, pins: u16) {
            self.group(port, group).set(pins);
        }

        fn group_interrupt_polarity(&self, port: GpioPort) -> u16 {
            self.pol[port as usize].get()
        }

        fn set_group_interrupt_polarity(&self, port: GpioPort, pins: u16) {
            self.pol[port as usize].set(pins);
        }

        fn register_group_callback(&self, group: IrqGroup) {
            self.registered.borrow_mut().push(group);
        }

        fn take_group_interrupts(&self, port: GpioPort, group: IrqGroup) -> u16 {
            let int = &self.int[port as usize];
            let pending = int.get() & self.group(port, group).get();
            int.set(int.get() & !pending);
            pending
        }

        fn pending_interrupts(&self, port: GpioPort) -> u16 {
            self.int[port as usize].get()
        }

        fn clear_interrupts(&self, port: GpioPort, pins: u16) {
            let int = &self.int[port as usize];
            int.set(int.get() & !pins);
        }
    }

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<(u32, IrqEvent)>>,
    }

    impl Client for Recorder {
        fn fired(&self, id: u32, event: IrqEvent) {
            self.calls.borrow_mut().push((id, event));
        }
    }

    impl Recorder {
        fn take(&self) -> Vec<(u32, IrqEvent)> {
            self.calls.take()
        }
    }

    #[test]
    fn bit_offsets() {
        assert_eq!(BitOffsets(0).count(), 0);
        assert_eq!(BitOffsets(0b101).collect::<Vec<_>>(), vec![0, 2]);

        let word = 0x8000_8421u32;
        let offsets = BitOffsets(word);
        assert_eq!(offsets.len(), 5);
        let seen: HashSet<u32> = offsets.collect();
        for bit in 0..32 {
            assert_eq!(seen.contains(&bit), word & (1 << bit) != 0);
        }
    }

    #[test]
    fn rising_edge_end_to_end() {
        let client = Recorder::default();
        let irq = GpioIrq::with_policy(FakeGpio::default(), InFlightPolicy::Suppress);

        let channel = irq.init(PinName::P0_03, Some(&client), 7).unwrap();
        assert_eq!(
            irq.entry(PinName::P0_03),
            Some(ChannelInfo {
                id: 7,
                event: IrqEvent::None,
                enabled: false
            })
        );
        assert_eq!(irq.driver().ien[0].get(), 1 << 3);

        irq.set(&channel, IrqEvent::Rise, true);
        let gpio = irq.driver();
        assert_eq!(gpio.pol[0].get(), 1 << 3);
        assert_eq!(gpio.iena[0].get(), 1 << 3);
        assert_eq!(gpio.ienb[0].get(), 0);
        assert_eq!(*gpio.registered.borrow(), vec![IrqGroup::A]);
        assert_eq!(
            irq.entry(PinName::P0_03),
            Some(ChannelInfo {
                id: 7,
                event: IrqEvent::Rise,
                enabled: true
            })
        );

        gpio.latch(GpioPort::GPIO0, 1 << 3);
        irq.handle_interrupt(IrqGroup::A);
        assert_eq!(client.take(), vec![(7, IrqEvent::Rise)]);
        assert_eq!(gpio.int[0].get(), 0);

        irq.handle_interrupt(IrqGroup::B);
        assert!(client.take().is_empty());
    }

    #[test]
    fn falling_edge_uses_group_b() {
        let client = Recorder::default();
        let irq = GpioIrq::with_policy(FakeGpio::default(), InFlightPolicy::Suppress);

        let channel = irq.init(PinName::P1_04, Some(&client), 21).unwrap();
        irq.driver().pol[1].set(0xFFFF);
        irq.set(&channel, IrqEvent::Fall, true);

        let gpio = irq.driver();
        assert_eq!(gpio.pol[1].get(), !(1 << 4));
        assert_eq!(gpio.ienb[1].get(), 1 << 4);
        assert_eq!(gpio.iena[1].get(), 0);
        assert_eq!(*gpio.registered.borrow(), vec![IrqGroup::B]);

        gpio.latch(GpioPort::GPIO1, 1 << 4);
        irq.handle_interrupt(IrqGroup::A);
        assert!(client.take().is_empty());
        irq.handle_interrupt(IrqGroup::B);
        assert_eq!(client.take(), vec![(21, IrqEvent::Fall)]);
    }

    #[test]
    fn switching_edge_moves_group() {
        let irq = GpioIrq::with_policy(FakeGpio::default(), InFlightPolicy::Suppress);
        let channel = irq.init(PinName::P2_11, None, 3).unwrap();

        irq.set(&channel, IrqEvent::Rise, true);
        irq.set(&channel, IrqEvent::Fall, true);
        assert_eq!(irq.driver().iena[2].get(), 0);
        assert_eq!(irq.driver().ienb[2].get(), 1 << 11);
    }

    #[test]
    fn burst_dispatches_in_pin_order() {
        let client = Recorder::default();
        let irq = GpioIrq::with_policy(FakeGpio::default(), InFlightPolicy::Suppress);

        let high = irq.init(PinName::P0_02, Some(&client), 12).unwrap();
        let low = irq.init(PinName::P0_00, None, 10).unwrap();
        irq.set(&high, IrqEvent::Rise, true);
        irq.set(&low, IrqEvent::Rise, true);

        irq.dispatch(GpioPort::GPIO0, 0b101);
        assert_eq!(client.take(), vec![(10, IrqEvent::Rise), (12, IrqEvent::Rise)]);
    }

    #[test]
    fn unconfigured_pins_are_ignored() {
        let client = Recorder::default();
        let irq = GpioIrq::with_policy(FakeGpio::default(), InFlightPolicy::Deliver);

        let channel = irq.init(PinName::P0_01, Some(&client), 4).unwrap();
        irq.set(&channel, IrqEvent::Rise, true);

        irq.dispatch(GpioPort::GPIO0, 0xFFFF);
        irq.dispatch(GpioPort::GPIO2, 0xFFFF);
        assert_eq!(client.take(), vec![(4, IrqEvent::Rise)]);
    }

    #[test]
    fn set_none_is_noop() {
        let irq = GpioIrq::with_policy(FakeGpio::default(), InFlightPolicy::Suppress);
        let channel = irq.init(PinName::P0_05, None, 9).unwrap();
        irq.set(&channel, IrqEvent::Rise, true);
        let before = irq.entry(PinName::P0_05);

        irq.set(&channel, IrqEvent::None, false);
        assert_eq!(irq.entry(PinName::P0_05), before);
        assert_eq!(irq.driver().iena[0].get(), 1 << 5);
        assert_eq!(irq.driver().pol[0].get(), 1 << 5);
    }

    #[test]
    fn enable_without_edge_is_noop() {
        let irq = GpioIrq::with_policy(FakeGpio::default(), InFlightPolicy::Suppress);
        let channel = irq.init(PinName::P1_00, None, 1).unwrap();

        irq.enable(&channel);
        irq.disable(&channel);
        assert!(irq.driver().registered.borrow().is_empty());
        assert_eq!(irq.driver().iena[1].get(), 0);
        assert_eq!(irq.entry(PinName::P1_00).map(|e| e.enabled), Some(false));
    }

    #[test]
    fn disable_is_idempotent() {
        let irq = GpioIrq::with_policy(FakeGpio::default(), InFlightPolicy::Suppress);
        let channel = irq.init(PinName::P0_07, None, 2).unwrap();
        irq.set(&channel, IrqEvent::Fall, true);

        // Another pin keeps both groups and POL non-trivial.
        let other = irq.init(PinName::P0_01, None, 3).unwrap();
        irq.set(&other, IrqEvent::Rise, true);

        irq.disable(&channel);
        let gpio = irq.driver();
        let entry = irq.entry(PinName::P0_07);
        let registers = (gpio.iena[0].get(), gpio.ienb[0].get(), gpio.pol[0].get());
        irq.disable(&channel);
        assert_eq!(irq.entry(PinName::P0_07), entry);
        assert_eq!(
            (gpio.iena[0].get(), gpio.ienb[0].get(), gpio.pol[0].get()),
            registers
        );
        assert_eq!(registers, (1 << 1, 0, 1 << 1));
        assert_eq!(entry.map(|e| e.event), Some(IrqEvent::Fall));
    }

    #[test]
    fn free_returns_entry_to_empty() {
        for event in [IrqEvent::Rise, IrqEvent::Fall] {
            let irq = GpioIrq::with_policy(FakeGpio::default(), InFlightPolicy::Suppress);
            for (n, pin) in ALL_PINS.into_iter().enumerate() {
                let channel = irq.init(pin, None, n as u32 + 1).unwrap();
                irq.set(&channel, event, true);
                irq.free(channel);
                assert_eq!(irq.entry(pin), Some(ChannelInfo::EMPTY), "{:?}", pin);
            }
            for port in GpioPort::ALL {
                assert_eq!(irq.driver().iena[port as usize].get(), 0);
                assert_eq!(irq.driver().ienb[port as usize].get(), 0);
            }
        }
    }

    #[test]
    fn invalid_arguments_touch_nothing() {
        let client = Recorder::default();
        let irq = GpioIrq::with_policy(FakeGpio::default(), InFlightPolicy::Suppress);

        assert_eq!(
            irq.init(PinName::NC, Some(&client), 1),
            Err(ErrorCode::INVAL)
        );
        assert_eq!(
            irq.init(PinName::P0_00, Some(&client), 0),
            Err(ErrorCode::INVAL)
        );
        assert!(irq.driver().untouched());
        assert_eq!(irq.entry(PinName::P0_00), Some(ChannelInfo::EMPTY));
        assert_eq!(irq.entry(PinName::NC), None);

        // Neither failed call installed the client.
        irq.dispatch(GpioPort::GPIO0, 0xFFFF);
        assert!(client.take().is_empty());
    }

    #[test]
    fn driver_initialized_once() {
        let irq = GpioIrq::with_policy(FakeGpio::default(), InFlightPolicy::Suppress);
        irq.init(PinName::P0_00, None, 1).unwrap();
        irq.init(PinName::P1_00, None, 2).unwrap();
        irq.init(PinName::P0_00, None, 3).unwrap();
        assert_eq!(irq.driver().init_calls.get(), 1);
    }

    #[test]
    fn reinit_clears_previous_configuration() {
        let irq = GpioIrq::with_policy(FakeGpio::default(), InFlightPolicy::Suppress);
        let channel = irq.init(PinName::P0_09, None, 1).unwrap();
        irq.set(&channel, IrqEvent::Rise, true);

        irq.init(PinName::P0_09, None, 5).unwrap();
        assert_eq!(irq.driver().iena[0].get(), 0);
        assert_eq!(
            irq.entry(PinName::P0_09),
            Some(ChannelInfo {
                id: 5,
                event: IrqEvent::None,
                enabled: false
            })
        );
    }

    #[test]
    fn last_handler_wins() {
        let first = Recorder::default();
        let second = Recorder::default();
        let irq = GpioIrq::with_policy(FakeGpio::default(), InFlightPolicy::Suppress);

        let a = irq.init(PinName::P0_00, Some(&first), 1).unwrap();
        let b = irq.init(PinName::P0_01, Some(&second), 2).unwrap();
        // Passing no handler keeps the current one.
        let c = irq.init(PinName::P0_02, None, 3).unwrap();
        for channel in [&a, &b, &c] {
            irq.set(channel, IrqEvent::Rise, true);
        }

        irq.dispatch(GpioPort::GPIO0, 0b111);
        assert!(first.take().is_empty());
        assert_eq!(
            second.take(),
            vec![(1, IrqEvent::Rise), (2, IrqEvent::Rise), (3, IrqEvent::Rise)]
        );
    }

    #[test]
    fn no_handler_is_silent() {
        let irq = GpioIrq::with_policy(FakeGpio::default(), InFlightPolicy::Suppress);
        let channel = irq.init(PinName::P0_04, None, 8).unwrap();
        irq.set(&channel, IrqEvent::Rise, true);

        irq.driver().latch(GpioPort::GPIO0, 1 << 4);
        irq.handle_interrupt(IrqGroup::A);
        assert_eq!(irq.driver().int[0].get(), 0);
    }

    #[test]
    fn suppress_drops_in_flight_interrupts() {
        let client = Recorder::default();
        let irq = GpioIrq::with_policy(FakeGpio::default(), InFlightPolicy::Suppress);
        let channel = irq.init(PinName::P0_03, Some(&client), 7).unwrap();
        irq.set(&channel, IrqEvent::Rise, true);

        irq.driver().latch(GpioPort::GPIO0, 1 << 3);
        irq.disable(&channel);
        assert_eq!(irq.driver().int[0].get(), 0);

        irq.handle_interrupt(IrqGroup::A);
        irq.dispatch(GpioPort::GPIO0, 1 << 3);
        assert!(client.take().is_empty());

        irq.enable(&channel);
        irq.handle_interrupt(IrqGroup::A);
        assert!(client.take().is_empty());
    }

    #[test]
    fn deliver_keeps_in_flight_interrupts() {
        let client = Recorder::default();
        let irq = GpioIrq::with_policy(FakeGpio::default(), InFlightPolicy::Deliver);
        let channel = irq.init(PinName::P0_03, Some(&client), 7).unwrap();
        irq.set(&channel, IrqEvent::Rise, true);

        irq.driver().latch(GpioPort::GPIO0, 1 << 3);
        irq.disable(&channel);
        assert_eq!(irq.driver().int[0].get(), 0);

        irq.handle_interrupt(IrqGroup::A);
        assert_eq!(client.take(), vec![(7, IrqEvent::Rise)]);
        irq.handle_interrupt(IrqGroup::A);
        assert!(client.take().is_empty());

        // Re-enabling does not replay the edge.
        irq.enable(&channel);
        irq.handle_interrupt(IrqGroup::A);
        assert!(client.take().is_empty());

        // A freed channel has no identifier left to deliver.
        irq.driver().latch(GpioPort::GPIO0, 1 << 3);
        irq.disable(&channel);
        irq.free(channel);
        irq.handle_interrupt(IrqGroup::A);
        irq.dispatch(GpioPort::GPIO0, 1 << 3);
        assert!(client.take().is_empty());
    }

    #[test]
    fn deliver_ignores_edges_while_disabled() {
        let client = Recorder::default();
        let irq = GpioIrq::with_policy(FakeGpio::default(), InFlightPolicy::Deliver);
        let channel = irq.init(PinName::P1_02, Some(&client), 11).unwrap();
        irq.set(&channel, IrqEvent::Fall, false);

        irq.driver().latch(GpioPort::GPIO1, 1 << 2);
        irq.disable(&channel);
        irq.handle_interrupt(IrqGroup::B);
        assert!(client.take().is_empty());

        irq.enable(&channel);
        irq.handle_interrupt(IrqGroup::B);
        assert!(client.take().is_empty());
    }

    #[test]
    fn reinit_discards_latched_edge() {
        for policy in [InFlightPolicy::Suppress, InFlightPolicy::Deliver] {
            let client = Recorder::default();
            let irq = GpioIrq::with_policy(FakeGpio::default(), policy);
            let channel = irq.init(PinName::P0_03, Some(&client), 7).unwrap();
            irq.set(&channel, IrqEvent::Rise, true);
            irq.driver().latch(GpioPort::GPIO0, 1 << 3);

            let channel = irq.init(PinName::P0_03, None, 9).unwrap();
            assert_eq!(irq.driver().int[0].get(), 0);
            irq.set(&channel, IrqEvent::Rise, true);
            irq.handle_interrupt(IrqGroup::A);
            assert!(client.take().is_empty(), "{:?}", policy);
        }
    }

    #[test]
    fn reinit_drops_stashed_edge() {
        let client = Recorder::default();
        let irq = GpioIrq::with_policy(FakeGpio::default(), InFlightPolicy::Deliver);
        let channel = irq.init(PinName::P2_05, Some(&client), 4).unwrap();
        irq.set(&channel, IrqEvent::Rise, true);
        irq.driver().latch(GpioPort::GPIO2, 1 << 5);
        irq.disable(&channel);

        irq.init(PinName::P2_05, None, 6).unwrap();
        irq.handle_interrupt(IrqGroup::A);
        assert!(client.take().is_empty());
    }
}
