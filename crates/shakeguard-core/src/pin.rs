//! Access code entry and comparison
//!
//! The code is a fixed placeholder credential, not a cryptographic
//! secret, but the buffer is still wiped on clear and the comparison is
//! constant-time.

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::ACCESS_CODE_LEN;

/// The fixed access code
pub const ACCESS_CODE: &[u8; ACCESS_CODE_LEN] = b"711520";

/// Compare a candidate against the access code in constant time
pub fn verify_code(candidate: &[u8]) -> bool {
    candidate.len() == ACCESS_CODE_LEN && bool::from(candidate.ct_eq(ACCESS_CODE))
}

/// Digit-by-digit entry buffer, wiped whenever it is cleared or dropped
#[derive(Debug, Default)]
pub struct PinBuffer {
    digits: Vec<u8>,
}

impl PinBuffer {
    /// Empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one digit (0-9)
    ///
    /// Returns false when the buffer is already full or the value is not
    /// a digit.
    pub fn push(&mut self, digit: u8) -> bool {
        if digit > 9 || self.digits.len() >= ACCESS_CODE_LEN {
            return false;
        }
        self.digits.push(b'0' + digit);
        true
    }

    /// Drop the most recent digit (keypad backspace)
    pub fn pop(&mut self) -> bool {
        match self.digits.pop() {
            Some(mut digit) => {
                digit.zeroize();
                true
            }
            None => false,
        }
    }

    /// Digits buffered so far
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Whether the buffer holds a full-length candidate
    pub fn is_complete(&self) -> bool {
        self.digits.len() == ACCESS_CODE_LEN
    }

    /// Whether the buffered digits match the access code
    pub fn matches(&self) -> bool {
        verify_code(&self.digits)
    }

    /// Wipe and empty the buffer
    pub fn clear(&mut self) {
        self.digits.zeroize();
        self.digits.clear();
    }
}

impl Drop for PinBuffer {
    fn drop(&mut self) {
        self.digits.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_with(digits: &[u8]) -> PinBuffer {
        let mut buffer = PinBuffer::new();
        for &d in digits {
            assert!(buffer.push(d));
        }
        buffer
    }

    #[test]
    fn correct_code_matches() {
        let buffer = buffer_with(&[7, 1, 1, 5, 2, 0]);
        assert!(buffer.is_complete());
        assert!(buffer.matches());
    }

    #[test]
    fn wrong_code_does_not_match() {
        let buffer = buffer_with(&[7, 1, 1, 5, 2, 1]);
        assert!(buffer.is_complete());
        assert!(!buffer.matches());
    }

    #[test]
    fn partial_entry_never_matches() {
        let buffer = buffer_with(&[7, 1, 1]);
        assert!(!buffer.is_complete());
        assert!(!buffer.matches());
    }

    #[test]
    fn buffer_caps_at_code_length() {
        let mut buffer = buffer_with(&[0, 0, 0, 0, 0, 0]);
        assert!(!buffer.push(9));
        assert_eq!(buffer.len(), ACCESS_CODE_LEN);
    }

    #[test]
    fn non_digits_are_rejected() {
        let mut buffer = PinBuffer::new();
        assert!(!buffer.push(10));
        assert!(buffer.is_empty());
    }

    #[test]
    fn backspace_removes_last_digit() {
        let mut buffer = buffer_with(&[7, 1, 2]);
        assert!(buffer.pop());
        assert_eq!(buffer.len(), 2);

        buffer.clear();
        assert!(buffer.is_empty());
        assert!(!buffer.pop());
    }

    #[test]
    fn verify_rejects_wrong_length() {
        assert!(!verify_code(b"71152"));
        assert!(!verify_code(b"7115200"));
        assert!(!verify_code(b""));
        assert!(verify_code(ACCESS_CODE));
    }
}
