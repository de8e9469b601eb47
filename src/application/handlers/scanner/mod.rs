//! Scan input handler for keyboard-wedge QR readers.

mod scan_input;

pub use scan_input::{DeskUpdate, ScanInputHandler};
