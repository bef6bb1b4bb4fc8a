// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! scribe-core: shared time abstraction for the scribe workspace
//!
//! The backend stamps registry changes and the client drives liveness
//! deadlines through the same [`Clock`] trait so both sides can be
//! tested against [`FakeClock`] without sleeping.

pub mod clock;

pub use clock::{Clock, FakeClock, SystemClock};
