// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Interface for synchronous true random number generators.
//!
//! Unlike an interrupt-driven entropy source, a `Trng` hands back bytes in
//! the calling context and returns only once the buffer is full. It is meant
//! for boot-time seeding and for frameworks that bound the wait themselves.

use crate::ErrorCode;

pub trait Trng {
    /// Power up the generator and configure its sampling.
    fn init(&self);

    /// Stop the generator and release it.
    fn free(&self);

    /// Fill `buf` with random bytes and return how many were written.
    ///
    /// This blocks until the hardware has produced every byte. There is no
    /// timeout: a generator that never reports ready never returns.
    fn get_bytes(&self, buf: &mut [u8]) -> Result<usize, ErrorCode>;
}
