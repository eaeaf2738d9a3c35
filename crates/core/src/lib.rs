// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Booking lifecycle.
//!
//! Every change to an existing booking is expressed as a [`Command`] and
//! applied by [`apply`], a pure function from the loaded aggregate to the
//! new booking row, the status-log entry to append and the notifications to
//! store. Creation is priced by [`price_booking`]. Nothing in this crate
//! touches storage.

mod apply;
mod command;
mod create;
mod error;
mod state;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::apply;
pub use command::{Command, PaymentRequester};
pub use create::{BookingDraft, NewBooking, PricedBooking, price_booking};
pub use error::CoreError;
pub use state::{BookingState, TransitionResult};
