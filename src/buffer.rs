/// Growable scratch accumulator used by the tokenizer while a token is built.
///
/// Pure storage: it has no notion of tokens, it only keeps bytes below a
/// capacity and refuses out-of-range access.
#[derive(Debug, Clone)]
pub struct ScratchBuffer {
    data: Vec<u8>,
    size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    #[error("Bad write to [{index}] (capacity {capacity})")]
    Write { index: usize, capacity: usize },
    #[error("Bad read at [{index}] (capacity {capacity})")]
    Read { index: usize, capacity: usize },
}

impl ScratchBuffer {
    /// Create a zeroed buffer able to hold `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            size: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Grow (or shrink) to `capacity`, keeping existing contents below it
    pub fn expand(&mut self, capacity: usize) {
        self.data.resize(capacity, 0);
        self.size = self.size.min(capacity);
    }

    /// Write one byte; `index` must be below the capacity
    pub fn write(&mut self, index: usize, byte: u8) -> Result<(), BufferError> {
        let capacity = self.capacity();
        let slot = self
            .data
            .get_mut(index)
            .ok_or(BufferError::Write { index, capacity })?;
        *slot = byte;
        self.size = self.size.max(index + 1);
        Ok(())
    }

    /// Write a run of bytes starting at `index`; the end must not pass the capacity
    pub fn write_span(&mut self, index: usize, bytes: &[u8]) -> Result<(), BufferError> {
        let capacity = self.capacity();
        let end = index + bytes.len();
        if end > capacity {
            return Err(BufferError::Write { index, capacity });
        }
        self.data[index..end].copy_from_slice(bytes);
        self.size = self.size.max(end);
        Ok(())
    }

    pub fn read(&self, index: usize) -> Result<u8, BufferError> {
        self.data.get(index).copied().ok_or(BufferError::Read {
            index,
            capacity: self.capacity(),
        })
    }

    /// Append a character at the end, doubling the capacity when full
    pub fn push(&mut self, ch: char) -> Result<(), BufferError> {
        let mut encoded = [0u8; 4];
        let bytes = ch.encode_utf8(&mut encoded).as_bytes();
        let needed = self.size + bytes.len();
        if needed > self.capacity() {
            self.expand((self.capacity() * 2).max(needed));
        }
        self.write_span(self.size, bytes)
    }

    /// Zero the contents and forget the size
    pub fn reset(&mut self) {
        self.data.fill(0);
        self.size = 0;
    }

    /// Accumulated contents; only `push` is used by the tokenizer so this is valid UTF-8
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.data[..self.size]).unwrap_or_default()
    }

    /// Take the contents as an owned string and reset
    pub fn take(&mut self) -> String {
        let text = self.as_str().to_string();
        self.reset();
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_read() {
        let mut buf = ScratchBuffer::with_capacity(4);
        buf.write(0, b'a').unwrap();
        buf.write(1, b'b').unwrap();

        assert_eq!(buf.len(), 2);
        assert_eq!(buf.read(1), Ok(b'b'));
        assert_eq!(buf.as_str(), "ab");
    }

    #[test]
    fn test_out_of_range_access() {
        let mut buf = ScratchBuffer::with_capacity(2);
        assert_eq!(
            buf.write(2, b'x'),
            Err(BufferError::Write {
                index: 2,
                capacity: 2
            })
        );
        assert!(buf.write_span(1, b"xy").is_err());
        assert!(buf.read(2).is_err());
    }

    #[test]
    fn test_push_grows_capacity() {
        let mut buf = ScratchBuffer::with_capacity(1);
        for ch in "hello".chars() {
            buf.push(ch).unwrap();
        }
        assert_eq!(buf.as_str(), "hello");
        assert!(buf.capacity() >= 5);
    }

    #[test]
    fn test_reset_and_take() {
        let mut buf = ScratchBuffer::with_capacity(8);
        buf.write_span(0, b"abc").unwrap();
        assert_eq!(buf.take(), "abc");
        assert!(buf.is_empty());
        assert_eq!(buf.read(0), Ok(0));
    }

    #[test]
    fn test_expand_keeps_contents() {
        let mut buf = ScratchBuffer::with_capacity(2);
        buf.write_span(0, b"ok").unwrap();
        buf.expand(16);
        buf.write(2, b'!').unwrap();
        assert_eq!(buf.as_str(), "ok!");
    }
}
