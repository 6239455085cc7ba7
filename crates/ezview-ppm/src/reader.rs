// ── ByteReader ────────────────────────────────────────────────────────────

/// Forward cursor over an in-memory byte stream with one-byte push-back.
pub(crate) struct ByteReader<'b> {
    bytes: &'b [u8],
    pos: usize,
}

impl<'b> ByteReader<'b> {
    pub(crate) fn new(bytes: &'b [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    pub(crate) fn next(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    /// Pushes the most recently read byte back onto the stream.
    pub(crate) fn unread(&mut self) {
        debug_assert!(self.pos > 0, "unread at start of stream");
        self.pos = self.pos.saturating_sub(1);
    }

    /// Consumes exactly `n` bytes, or nothing if fewer remain.
    pub(crate) fn take(&mut self, n: usize) -> Option<&'b [u8]> {
        let end = self.pos.checked_add(n)?;
        let out = self.bytes.get(self.pos..end)?;
        self.pos = end;
        Some(out)
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Skips consecutive `#...\n` lines starting at the cursor.
    ///
    /// The first non-`#` byte is pushed back. Returns the number of comment
    /// lines skipped.
    pub(crate) fn skip_comment_lines(&mut self) -> usize {
        let mut skipped = 0;
        while let Some(b) = self.next() {
            if b != b'#' {
                self.unread();
                break;
            }
            self.skip_to_end_of_line();
            skipped += 1;
        }
        skipped
    }

    /// Skips ASCII whitespace.
    pub(crate) fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Skips whitespace and `#` comments in any order.
    pub(crate) fn skip_whitespace_and_comments(&mut self) {
        loop {
            self.skip_whitespace();
            if self.peek() == Some(b'#') {
                self.skip_to_end_of_line();
            } else {
                break;
            }
        }
    }

    /// Reads an unsigned decimal integer at the cursor.
    ///
    /// Returns `Ok(None)` when the cursor is not on a digit and `Err(())` when
    /// the value overflows `u32`.
    pub(crate) fn read_decimal(&mut self) -> Result<Option<u32>, ()> {
        if !matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            return Ok(None);
        }
        let mut value: u32 = 0;
        while let Some(b) = self.peek() {
            if !b.is_ascii_digit() {
                break;
            }
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u32::from(b - b'0')))
                .ok_or(())?;
            self.pos += 1;
        }
        Ok(Some(value))
    }

    // consumes through the terminating newline, or to end of stream
    fn skip_to_end_of_line(&mut self) {
        while let Some(b) = self.next() {
            if b == b'\n' {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unread_restores_last_byte() {
        let mut r = ByteReader::new(b"ab");
        assert_eq!(r.next(), Some(b'a'));
        r.unread();
        assert_eq!(r.next(), Some(b'a'));
        assert_eq!(r.next(), Some(b'b'));
        assert_eq!(r.next(), None);
    }

    #[test]
    fn skips_consecutive_comment_lines() {
        let mut r = ByteReader::new(b"# one\n#two\n3 4");
        assert_eq!(r.skip_comment_lines(), 2);
        assert_eq!(r.peek(), Some(b'3'));
    }

    #[test]
    fn comment_skip_without_comments_is_noop() {
        let mut r = ByteReader::new(b"3 4");
        assert_eq!(r.skip_comment_lines(), 0);
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn unterminated_comment_runs_to_end() {
        let mut r = ByteReader::new(b"# no newline");
        assert_eq!(r.skip_comment_lines(), 1);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn read_decimal_stops_at_non_digit() {
        let mut r = ByteReader::new(b"640x");
        assert_eq!(r.read_decimal(), Ok(Some(640)));
        assert_eq!(r.peek(), Some(b'x'));
    }

    #[test]
    fn read_decimal_not_on_digit() {
        let mut r = ByteReader::new(b"-1");
        assert_eq!(r.read_decimal(), Ok(None));
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn read_decimal_overflow() {
        let mut r = ByteReader::new(b"99999999999");
        assert_eq!(r.read_decimal(), Err(()));
    }

    #[test]
    fn take_is_all_or_nothing() {
        let mut r = ByteReader::new(&[1, 2, 3, 4]);
        assert_eq!(r.take(3), Some(&[1u8, 2, 3][..]));
        assert_eq!(r.take(3), None);
        assert_eq!(r.remaining(), 1);
    }
}
