//! Shared test helpers for `cyclarc-core` integration tests.
//!
//! In-memory stand-ins for the event store and notification ports. The
//! cycle store applies the same open-period rules the real server does
//! unless built with [`cycle::InMemoryCycleStore::permissive`].

#![allow(dead_code)]

pub mod cycle;
pub mod notifier;
pub mod schedule;

use chrono::NaiveDate;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
