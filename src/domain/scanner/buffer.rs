//! Keyboard-wedge scan reassembly.
//!
//! A QR reader in keyboard mode "types" the code followed by Enter. The
//! buffer collects characters, drops stale partial input after an idle gap,
//! and debounces repeated Enter presses. It holds no timers; callers pass the
//! instant each key arrived.

use std::time::Duration;
use tokio::time::Instant;

/// Key pressed on the scanner's input stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    /// Any non-printing key (Shift, arrows, ...).
    Other,
}

/// A key press, where it was aimed and when it arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    /// Set when the key went to a text-entry field; such keys are typing,
    /// not scanning.
    pub in_text_field: bool,
    /// Stamped by the producer, not by whoever dequeues the event.
    pub arrived_at: Instant,
}

impl KeyEvent {
    fn new(key: Key) -> Self {
        Self {
            key,
            in_text_field: false,
            arrived_at: Instant::now(),
        }
    }

    pub fn char(c: char) -> Self {
        Self::new(Key::Char(c))
    }

    pub fn enter() -> Self {
        Self::new(Key::Enter)
    }

    pub fn other() -> Self {
        Self::new(Key::Other)
    }

    pub fn in_text_field(mut self) -> Self {
        self.in_text_field = true;
        self
    }

    pub fn arrived_at(mut self, at: Instant) -> Self {
        self.arrived_at = at;
        self
    }
}

/// Timing windows for scan reassembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTimings {
    /// Partial input older than this is discarded before the next key.
    pub idle_timeout: Duration,
    /// Minimum gap between two accepted scans.
    pub debounce: Duration,
    /// How long a result stays on display.
    pub display: Duration,
}

impl Default for ScanTimings {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_millis(100),
            debounce: Duration::from_millis(500),
            display: Duration::from_millis(2000),
        }
    }
}

/// Pure scan reassembly state machine.
#[derive(Debug, Clone)]
pub struct ScanBuffer {
    timings: ScanTimings,
    buffer: String,
    last_key_at: Option<Instant>,
    last_scan_at: Option<Instant>,
    shown: Option<(String, Instant)>,
}

impl ScanBuffer {
    pub fn new(timings: ScanTimings) -> Self {
        Self {
            timings,
            buffer: String::new(),
            last_key_at: None,
            last_scan_at: None,
            shown: None,
        }
    }

    pub fn timings(&self) -> ScanTimings {
        self.timings
    }

    /// Feeds one key press at its arrival time.
    pub fn push(&mut self, event: KeyEvent) -> Option<String> {
        self.handle(event, event.arrived_at)
    }

    /// Feeds one key press. Returns the code when a scan is accepted.
    pub fn handle(&mut self, event: KeyEvent, now: Instant) -> Option<String> {
        if event.in_text_field {
            return None;
        }

        self.clear_if_idle(now);

        match event.key {
            Key::Char(c) => {
                self.buffer.push(c);
                self.last_key_at = Some(now);
                None
            }
            Key::Enter => {
                self.last_key_at = None;
                let code = std::mem::take(&mut self.buffer).trim().to_string();
                self.accept(code, now)
            }
            Key::Other => None,
        }
    }

    fn clear_if_idle(&mut self, now: Instant) {
        if let Some(last) = self.last_key_at {
            if now.duration_since(last) > self.timings.idle_timeout {
                self.buffer.clear();
                self.last_key_at = None;
            }
        }
    }

    fn accept(&mut self, code: String, now: Instant) -> Option<String> {
        if code.is_empty() {
            return None;
        }
        if let Some(last) = self.last_scan_at {
            if now.duration_since(last) < self.timings.debounce {
                return None;
            }
        }
        self.last_scan_at = Some(now);
        self.shown = Some((code.clone(), now + self.timings.display));
        Some(code)
    }

    /// True while the last accepted scan is still on display.
    pub fn is_scanning(&self, now: Instant) -> bool {
        self.shown.as_ref().is_some_and(|(_, until)| now < *until)
    }

    /// Code currently on display.
    pub fn scanned_code(&self, now: Instant) -> Option<&str> {
        self.shown
            .as_ref()
            .filter(|(_, until)| now < *until)
            .map(|(code, _)| code.as_str())
    }

    /// When the display should return to idle, if a scan is showing.
    pub fn display_deadline(&self) -> Option<Instant> {
        self.shown.as_ref().map(|(_, until)| *until)
    }

    /// Returns the display to idle once its window has passed.
    ///
    /// Returns true if the display was cleared.
    pub fn expire_display(&mut self, now: Instant) -> bool {
        match &self.shown {
            Some((_, until)) if now >= *until => {
                self.shown = None;
                true
            }
            _ => false,
        }
    }

    /// Clears partial input and the display. Debounce history is kept.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.last_key_at = None;
        self.shown = None;
    }

    /// Partial input collected so far.
    pub fn pending(&self) -> &str {
        &self.buffer
    }
}

impl Default for ScanBuffer {
    fn default() -> Self {
        Self::new(ScanTimings::default())
    }
}
