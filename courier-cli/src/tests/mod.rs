//! Shared test harness modules for the courier CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod dashboard_unit;
mod helpers;
mod simulate_unit;
