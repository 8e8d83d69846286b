// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Standard error enum for invoking operations

/// Standard errors.
///
/// This does not feature any success cases. Operations that can fail return
/// `Result<T, ErrorCode>`; the board framework consumes plain integer status
/// codes, which [`into_statuscode`] produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum ErrorCode {
    // Reserved value, for when "no error" / "success" should be encoded in
    // the same numeric representation as ErrorCode
    //
    // Ok(()) = 0,
    /// Generic failure condition
    FAIL = 1,
    /// Underlying system is busy; retry
    BUSY = 2,
    /// The state requested is already set
    ALREADY = 3,
    /// The component is powered down
    OFF = 4,
    /// Reservation required before use
    RESERVE = 5,
    /// An invalid parameter was passed
    INVAL = 6,
    /// Parameter passed was too large
    SIZE = 7,
    /// Operation canceled by a call
    CANCEL = 8,
    /// Memory required not available
    NOMEM = 9,
    /// Operation or command is unsupported
    NOSUPPORT = 10,
    /// Device does not exist
    NODEVICE = 11,
    /// Device is not physically installed
    UNINSTALLED = 12,
    /// Packet transmission not acknowledged
    NOACK = 13,
}

impl From<ErrorCode> for usize {
    fn from(err: ErrorCode) -> usize {
        err as usize
    }
}

impl ErrorCode {
    /// The negative integer status the board framework expects for this
    /// error.
    pub fn into_status(self) -> i32 {
        -(self as usize as i32)
    }
}

/// Converts a `Result<(), ErrorCode>` to the framework's integer status.
///
/// `Ok(())` is `0`; an error is the negated error code, so every failure is
/// strictly negative.
pub fn into_statuscode(r: Result<(), ErrorCode>) -> i32 {
    match r {
        Ok(()) => 0,
        Err(ecode) => ecode.into_status(),
    }
}
