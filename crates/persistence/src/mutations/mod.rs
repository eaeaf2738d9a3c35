// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Writes.
//!
//! Every multi-statement write runs inside one IMMEDIATE transaction so the
//! `SQLite` write lock is held from the first read of the rows it decides on.

pub mod bookings;
pub mod catalog;
pub mod notifications;
pub mod principals;

pub use bookings::TransitionError;
