//! altium-libgen: template-driven generator for Altium Designer libraries
//!
//! Some component libraries are pure repetition: one symbol per resistor
//! value and package, one per catalog capacitor. This crate computes the
//! values and feeds them to text templates exported from Altium as PCAD V16
//! ASCII libraries (`.lia`).
//!
//! # Pipelines
//!
//! - **Resistors**: the E96 series over several decades, labelled in
//!   engineering notation (`1R`, `4.7k`, `976k`), crossed with chip packages
//! - **Capacitors**: generic ceramic capacitors from a supplier CSV export,
//!   parsed from their free-text designation
//!
//! # Modules
//!
//! - [`config`] — Configuration loading and validation
//! - [`error`] — Error types
//! - [`format`] — Engineering-notation labels
//! - [`series`] — E96 value series
//! - [`capacitor`] — Supplier CSV import
//! - [`render`] — Template rendering and legacy output encoding
//! - [`library`] — Generation pipelines

pub mod capacitor;
pub mod config;
pub mod error;
pub mod format;
pub mod library;
pub mod render;
pub mod series;
