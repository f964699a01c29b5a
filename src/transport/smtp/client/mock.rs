#![allow(missing_docs)]
// In-memory stream used to script SMTP dialogues in tests

use std::{
    io::{self, Cursor, Read, Write},
    sync::{Arc, Mutex},
};

pub type MockCursor = Cursor<Vec<u8>>;

/// Reads the server script given at creation, records everything written
///
/// Clones share both buffers, so a test can keep one to inspect what the
/// client sent.
#[derive(Clone, Debug)]
pub struct MockStream {
    reader: Arc<Mutex<MockCursor>>,
    writer: Arc<Mutex<MockCursor>>,
}

impl MockStream {
    pub fn with_vec(vec: Vec<u8>) -> MockStream {
        MockStream {
            reader: Arc::new(Mutex::new(MockCursor::new(vec))),
            writer: Arc::new(Mutex::new(MockCursor::new(Vec::new()))),
        }
    }

    /// Builds the server side from complete reply lines
    pub fn with_replies(replies: &[&str]) -> MockStream {
        Self::with_vec(replies.concat().into_bytes())
    }

    pub fn take_vec(&mut self) -> Vec<u8> {
        let mut cursor = self.writer.lock().unwrap();
        let vec = cursor.get_ref().clone();
        cursor.set_position(0);
        cursor.get_mut().clear();
        vec
    }

    /// Everything the client wrote, as text
    pub fn written(&mut self) -> String {
        String::from_utf8(self.take_vec()).unwrap()
    }
}

impl Write for MockStream {
    fn write(&mut self, msg: &[u8]) -> io::Result<usize> {
        self.writer.lock().unwrap().write(msg)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.lock().unwrap().flush()
    }
}

impl Read for MockStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.lock().unwrap().read(buf)
    }
}

#[cfg(test)]
mod test {
    use std::io::{Read, Write};

    use super::MockStream;

    #[test]
    fn clone_shares_written_bytes() {
        let mut mock = MockStream::with_vec(vec![]);
        let mut cloned = mock.clone();
        mock.write_all(&[6, 7]).unwrap();
        assert_eq!(cloned.take_vec(), vec![6, 7]);
        assert!(mock.take_vec().is_empty());
    }

    #[test]
    fn replies_are_read_in_order() {
        let mut mock = MockStream::with_replies(&["220 ready\r\n", "250 ok\r\n"]);
        let mut read = String::new();
        mock.read_to_string(&mut read).unwrap();
        assert_eq!(read, "220 ready\r\n250 ok\r\n");
    }
}
