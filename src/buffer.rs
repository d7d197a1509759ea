use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};

use thiserror::Error;

use crate::Tag;

macro_rules! impl_read {
    ($fn_name:ident, $typ:ty) => {
        pub fn $fn_name(&mut self) -> Result<$typ, ReaderError> {
            let mut buf = [0u8; size_of::<$typ>()];
            self.inner.read_exact(&mut buf)?;

            Ok(<$typ>::from_be_bytes(buf))
        }
    };
}

macro_rules! impl_read_array {
    ($fn_name:ident, $read:ident, $typ:ty) => {
        /// Reads `count` consecutive big-endian values.
        pub fn $fn_name(&mut self, count: usize) -> Result<Vec<$typ>, ReaderError> {
            (0..count).map(|_| self.$read()).collect()
        }
    };
}

/// Represents the possible errors that can occur when using `FontReader`.
#[derive(Error, Debug)]
pub enum ReaderError {
    /// An error occurred during a read operation on the underlying buffer.
    /// This variant transparently wraps `std::io::Error`.
    #[error(transparent)]
    ReadError(#[from] io::Error),

    /// An error occurred during a seek operation on the underlying buffer.
    /// This variant contains the `std::io::Error` that caused the seek failure.
    #[error("Failed to seek, error context: {0}")]
    FailedToSeek(io::Error),
}

/// A big-endian reader over anything that can be read and seeked,
/// the font file itself or the byte range of a single table.
pub struct FontReader<B: Read + Seek> {
    inner: BufReader<B>,
}

impl<'a> FontReader<Cursor<&'a [u8]>> {
    /// Returns a reader over an in-memory byte range, the usual way
    /// table decoders consume the slice handed to them by the loader.
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self::from_buffer(Cursor::new(data))
    }
}

impl<B> FontReader<B>
where
    B: Read + Seek,
{
    /// Returns a new reader from anything which implements read,
    /// the most obvious use case would be a File
    /// but it's also useful for loading fonts off a network buffer
    /// and such
    pub fn from_buffer(buffer: B) -> Self {
        Self {
            inner: BufReader::new(buffer),
        }
    }

    /// Seeks to a specifc place in the buffer
    /// from the start of the file
    ///
    /// # Examples
    ///
    /// ```
    /// use typecase::buffer::FontReader;
    ///
    /// let data = [0, 0, 0, 10, 0, 0, 0, 20];
    /// let mut reader = FontReader::from_slice(&data);
    ///
    /// reader.seek_to(4).unwrap();
    /// assert_eq!(reader.read_u32().unwrap(), 20);
    /// ```
    pub fn seek_to(&mut self, pos: u64) -> Result<(), ReaderError> {
        self.inner
            .seek(SeekFrom::Start(pos))
            .map_err(ReaderError::FailedToSeek)?;

        Ok(())
    }

    /// Skips n bytes from the CURRENT cursor positon
    pub fn skip(&mut self, n: i64) -> Result<(), ReaderError> {
        self.inner
            .seek_relative(n)
            .map_err(ReaderError::FailedToSeek)?;

        Ok(())
    }

    /// The current offset from the start of the buffer.
    pub fn position(&mut self) -> Result<u64, ReaderError> {
        self.inner.stream_position().map_err(ReaderError::FailedToSeek)
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub fn remaining(&mut self) -> Result<u64, ReaderError> {
        let position = self.position()?;
        let end = self
            .inner
            .seek(SeekFrom::End(0))
            .map_err(ReaderError::FailedToSeek)?;
        self.seek_to(position)?;

        Ok(end.saturating_sub(position))
    }

    /// Fills `buf` completely or fails.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ReaderError> {
        self.inner.read_exact(buf)?;
        Ok(())
    }

    pub fn read_tag(&mut self) -> Result<Tag, ReaderError> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf)?;
        Ok(Tag::new(&buf))
    }

    impl_read!(read_i64, i64);
    impl_read!(read_i32, i32);
    impl_read!(read_u32, u32);
    impl_read!(read_i16, i16);
    impl_read!(read_u16, u16);
    impl_read!(read_i8, i8);
    impl_read!(read_u8, u8);

    impl_read_array!(read_u8_array, read_u8, u8);
    impl_read_array!(read_u16_array, read_u16, u16);
    impl_read_array!(read_i16_array, read_i16, i16);
    impl_read_array!(read_u32_array, read_u32, u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian_values() {
        let data = [0x00, 0x01, 0xFF, 0xFE, 0x12, 0x34, 0x56, 0x78, b'c', b'm', b'a', b'p'];
        let mut reader = FontReader::from_slice(&data);

        assert_eq!(reader.read_u16().unwrap(), 1);
        assert_eq!(reader.read_i16().unwrap(), -2);
        assert_eq!(reader.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(reader.read_tag().unwrap(), Tag::new(b"cmap"));
        assert!(reader.read_u8().is_err());
    }

    #[test]
    fn skip_and_position() {
        let data = [0, 0, 0, 10, 0, 0, 0, 20];
        let mut reader = FontReader::from_slice(&data);

        assert_eq!(reader.read_u32().unwrap(), 10);
        reader.skip(-2).unwrap();
        assert_eq!(reader.position().unwrap(), 2);
        assert_eq!(reader.remaining().unwrap(), 6);
        assert_eq!(reader.position().unwrap(), 2);
        assert_eq!(reader.read_u16_array(3).unwrap(), vec![10, 0, 20]);
        assert_eq!(reader.remaining().unwrap(), 0);
        assert!(reader.read_u32().is_err());
    }
}
