// Text command interface: line framing and integer extraction

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Receiver;
use heapless::Vec;

use crate::config::command::LINE_CAPACITY;
use crate::error::ParseError;

/// Non-blocking source of integer commands.
///
/// `None` means nothing arrived since the last poll; values come out in the
/// order they were received.
pub trait CommandSource {
    fn poll(&mut self) -> Option<i32>;
}

impl<M: RawMutex, const N: usize> CommandSource for Receiver<'_, M, i32, N> {
    fn poll(&mut self) -> Option<i32> {
        self.try_receive().ok()
    }
}

/// Splits a byte stream into lines and parses one integer per line
pub struct LineParser {
    line: Vec<u8, LINE_CAPACITY>,
    /// Set while discarding the rest of a broken line; reported at its end
    discarding: Option<ParseError>,
}

impl LineParser {
    pub const fn new() -> Self {
        Self {
            line: Vec::new(),
            discarding: None,
        }
    }

    /// Drop the line in progress after bytes were lost on the wire.
    ///
    /// Everything up to the next line end is discarded and that line is
    /// reported as `ParseError::Interrupted`.
    pub fn abort(&mut self) {
        self.line.clear();
        self.discarding = Some(ParseError::Interrupted);
    }

    /// Feed one received byte
    ///
    /// # Returns
    /// * `Some(Ok(value))` when a line containing an integer was completed
    /// * `Some(Err(_))` when a completed line was malformed
    /// * `None` otherwise (including blank lines and CRLF pairs)
    pub fn push(&mut self, byte: u8) -> Option<Result<i32, ParseError>> {
        match byte {
            b'\r' | b'\n' => {
                if let Some(error) = self.discarding.take() {
                    return Some(Err(error));
                }
                if self.line.is_empty() {
                    return None;
                }
                let result = parse_int(&self.line);
                self.line.clear();
                Some(result)
            }
            _ if self.discarding.is_some() => None,
            _ => {
                if self.line.push(byte).is_err() {
                    self.line.clear();
                    self.discarding = Some(ParseError::LineTooLong);
                }
                None
            }
        }
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the first integer from a line.
///
/// Leading characters are skipped up to the first digit or a `-` directly
/// followed by a digit; parsing stops at the first non-digit after that.
pub fn parse_int(line: &[u8]) -> Result<i32, ParseError> {
    let start = line
        .iter()
        .enumerate()
        .position(|(i, &b)| {
            b.is_ascii_digit()
                || (b == b'-' && line.get(i + 1).is_some_and(|n| n.is_ascii_digit()))
        })
        .ok_or(ParseError::NoDigits)?;

    let (negative, digits) = match line[start] {
        b'-' => (true, &line[start + 1..]),
        _ => (false, &line[start..]),
    };

    // |i32::MIN|
    const LIMIT: i64 = 1 << 31;
    let mut value: i64 = 0;
    for &b in digits.iter().take_while(|b| b.is_ascii_digit()) {
        value = value * 10 + (b - b'0') as i64;
        if value > LIMIT {
            return Err(ParseError::Overflow);
        }
    }

    let value = if negative { -value } else { value };
    i32::try_from(value).map_err(|_| ParseError::Overflow)
}
