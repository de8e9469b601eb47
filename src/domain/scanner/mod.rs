//! Scanner domain module.

mod buffer;

pub use buffer::{Key, KeyEvent, ScanBuffer, ScanTimings};
