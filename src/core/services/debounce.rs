//! Scan debouncer - one logical scan per continuous presence of a code
//!
//! A scanner reports what it sees on every frame. While a code stays in
//! view it keeps reporting it, so the workflow would see dozens of scans of
//! the same badge. The debouncer turns that frame stream into edges.

/// What the scanner saw on one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// No code in view
    Clear,
    /// A code is in view, with whatever text was decoded from it.
    ///
    /// The text is empty when the code could not be decoded.
    Code(String),
}

impl Frame {
    /// Interpret one line of scanner output: empty means nothing in view
    #[must_use]
    pub fn from_line(line: &str) -> Self {
        Self::from_bytes(line.as_bytes())
    }

    /// Interpret one raw line of scanner output.
    ///
    /// A line that is not UTF-8 is a code that was seen but not decoded.
    #[must_use]
    pub fn from_bytes(line: &[u8]) -> Self {
        let line = line.strip_suffix(b"\n").unwrap_or(line);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() {
            return Self::Clear;
        }
        match std::str::from_utf8(line) {
            Ok(text) => Self::Code(text.to_string()),
            Err(err) => {
                log::warn!("Undecodable frame ({err}), treating it as a code without identity");
                Self::Code(String::new())
            },
        }
    }
}

/// Edge detector over scanner frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanDebouncer {
    in_view: bool,
}

impl ScanDebouncer {
    /// Debouncer with nothing in view
    #[must_use]
    pub const fn new() -> Self {
        Self { in_view: false }
    }

    /// Feed one frame; returns the decoded text when a new scan begins.
    ///
    /// A different code replacing the current one without a clear frame in
    /// between is still the same presence and emits nothing.
    pub fn observe(&mut self, frame: Frame) -> Option<String> {
        match frame {
            Frame::Clear => {
                self.in_view = false;
                None
            },
            Frame::Code(_) if self.in_view => None,
            Frame::Code(text) => {
                self.in_view = true;
                Some(text)
            },
        }
    }

    /// Forget the current presence so the next code counts as a new scan
    pub fn reset(&mut self) {
        self.in_view = false;
    }

    /// Whether a code is currently in view
    #[must_use]
    pub const fn in_view(&self) -> bool {
        self.in_view
    }
}
