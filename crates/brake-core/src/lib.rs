//! Hardware-independent core library for brake-rs
//!
//! This crate contains the platform-agnostic logic of the press brake bend
//! calculator: the append-only sample log contract, per-gauge datasets, the
//! least-squares fit engine, the calibration registry, the predictor, and the
//! validated entry points the operator UI calls into.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! embedded panel targets and desktop hosts (for the station console and tests).

#![no_std]

extern crate alloc;

pub mod calculator;
pub mod calibration;
pub mod config;
pub mod input;
pub mod sample;
pub mod storage;
