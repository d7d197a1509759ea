//! small utilities used in tests

/// A value that can be written to a [`BeBuffer`].
pub trait BeBytes {
    fn write_be(&self, out: &mut Vec<u8>);
}

macro_rules! impl_be_bytes {
    ($($typ:ty),*) => {
        $(impl BeBytes for $typ {
            fn write_be(&self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_be_bytes());
            }
        })*
    };
}

impl_be_bytes!(u8, i8, u16, i16, u32, i32, i64);

impl BeBytes for [u8; 4] {
    fn write_be(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self);
    }
}

/// A convenience type for generating a buffer of big-endian bytes.
#[derive(Debug, Clone, Default)]
pub struct BeBuffer(Vec<u8>);

impl BeBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    /// Write any scalar to this buffer.
    pub fn push(mut self, item: impl BeBytes) -> Self {
        item.write_be(&mut self.0);
        self
    }

    /// Write multiple scalars into the buffer
    pub fn extend<T: BeBytes>(mut self, iter: impl IntoIterator<Item = T>) -> Self {
        for item in iter {
            item.write_be(&mut self.0);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl std::ops::Deref for BeBuffer {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
