use std::{
    collections::{BTreeMap, btree_map},
    io::{Read, Seek},
    ops::Range,
};

use thiserror::Error;

use crate::{
    Tag, TypecaseError,
    buffer::{FontReader, ReaderError},
};

pub mod cmap;
pub mod head;
pub mod hhea;
pub mod hmtx;
pub mod name;
pub mod os2;
pub mod platform;

pub use cmap::{CharacterMapping, CharacterMappingCollection, CharacterMappingTable};
pub use head::Head;
pub use hhea::Hhea;
pub use hmtx::Hmtx;
pub use name::Name;
pub use os2::Os2;
pub use platform::PlatformId;

/// Represents the error messages which may occur when trying
/// to parse tables from raw binary buffers
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("A tag is exactly 4 bytes, got {0} bytes")]
    InvalidTagLength(usize),

    #[error("The required buffer length for this table is {0} bytes, got {1} bytes")]
    InvalidBufferLength(usize, usize),

    #[error("Version {version} of the '{tag}' table is not supported")]
    UnsupportedVersion { tag: Tag, version: u32 },

    #[error("cmap subtable format {0} is not supported")]
    UnsupportedCmapFormat(u16),

    #[error("The value {value} of field '{field}' is out of range")]
    ValueOutOfRange { field: &'static str, value: u32 },

    #[error("The font has no '{0}' table")]
    MissingTable(Tag),
}

/// Implemented by every modeled table.
pub trait Table {
    /// The tag naming this table in the font's table directory.
    const TAG: Tag;
}

/// Represents the offset subtable directory and it's metadata
/// providing us with a important info such as the number of tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetTable {
    scalar_type: u32,
    num_tables: u16,
    search_range: u16,
    entry_selector: u16,
    range_shift: u16,
}

impl OffsetTable {
    pub const SIZE: usize = 12;

    /// Constructs the offset sub table from a raw buffer
    /// the offset sub table buffer size must be 12 per the reference manual.
    pub fn from_buffer(buf: &[u8]) -> Result<Self, TypecaseError> {
        if buf.len() != Self::SIZE {
            return Err(FormatError::InvalidBufferLength(Self::SIZE, buf.len()).into());
        }
        Self::from_reader(&mut FontReader::from_slice(buf))
    }

    /// Parses an offset table from the start of the font.
    pub(crate) fn from_reader<B: Read + Seek>(
        reader: &mut FontReader<B>,
    ) -> Result<Self, TypecaseError> {
        reader.seek_to(0)?;

        Ok(Self {
            scalar_type: reader.read_u32()?,
            num_tables: reader.read_u16()?,
            search_range: reader.read_u16()?,
            entry_selector: reader.read_u16()?,
            range_shift: reader.read_u16()?,
        })
    }

    /// The sfnt version, `0x00010000` for TrueType outlines or `OTTO` for CFF.
    pub fn scalar_type(&self) -> u32 {
        self.scalar_type
    }

    /// Returns the number of tables exists in the font file
    pub fn num_tables(&self) -> u16 {
        self.num_tables
    }
}

/// Represents the location of one table within the font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRecord {
    tag: Tag,
    /// The checksum of the table.
    checksum: u32,
    /// The offset of the table, in bytes, from the beginning of the file.
    offset: u32,
    /// The length of this table in bytes, without padding.
    length: u32,
}

impl TableRecord {
    pub const SIZE: usize = 16;

    /// Constructs a `TableRecord` from a raw byte buffer of exactly 16 bytes.
    ///
    /// * Bytes 0-3: Tag
    /// * Bytes 4-7: Checksum of the table
    /// * Bytes 8-11: Offset of the table from the beginning of the file
    /// * Bytes 12-15: Length of the table in bytes
    pub fn from_buffer(buf: &[u8]) -> Result<Self, TypecaseError> {
        if buf.len() != Self::SIZE {
            return Err(FormatError::InvalidBufferLength(Self::SIZE, buf.len()).into());
        }
        let mut reader = FontReader::from_slice(buf);
        Ok(Self::from_reader(&mut reader)?)
    }

    fn from_reader<B: Read + Seek>(reader: &mut FontReader<B>) -> Result<Self, ReaderError> {
        Ok(Self {
            tag: reader.read_tag()?,
            checksum: reader.read_u32()?,
            offset: reader.read_u32()?,
            length: reader.read_u32()?,
        })
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    /// The byte range of the table within the font, or `None` when the end
    /// does not fit in `usize`.
    pub fn range(&self) -> Option<Range<usize>> {
        let start = usize::try_from(self.offset).ok()?;
        let end = start.checked_add(usize::try_from(self.length).ok()?)?;
        Some(start..end)
    }
}

/// Maps each table tag to its record in the font's table directory.
#[derive(Debug, Clone, Default)]
pub struct TableDirectory {
    inner: BTreeMap<Tag, TableRecord>,
}

impl TableDirectory {
    pub fn from_reader<B: Read + Seek>(
        reader: &mut FontReader<B>,
        num_tables: u16,
    ) -> Result<Self, TypecaseError> {
        // The records follow the 12 byte offset table, 16 bytes each
        reader.seek_to(OffsetTable::SIZE as u64)?;

        let mut records = BTreeMap::new();
        for _ in 0..num_tables {
            let record = TableRecord::from_reader(reader)?;
            if records.insert(record.tag, record).is_some() {
                log::warn!("duplicate table directory entry for '{}'", record.tag);
            }
        }

        Ok(Self { inner: records })
    }

    pub fn get(&self, tag: Tag) -> Option<&TableRecord> {
        self.inner.get(&tag)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<'a> IntoIterator for &'a TableDirectory {
    type Item = (&'a Tag, &'a TableRecord);

    type IntoIter = btree_map::Iter<'a, Tag, TableRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

/// A font file held in memory together with its table directory.
///
/// Tables are decoded on request; each call decodes afresh.
#[derive(Debug)]
pub struct FontFile {
    data: Vec<u8>,
    /// The offset table, which provides the number of tables.
    pub offset: OffsetTable,
    pub directory: TableDirectory,
}

impl FontFile {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, TypecaseError> {
        let mut reader = FontReader::from_slice(&data);
        let offset = OffsetTable::from_reader(&mut reader)?;
        let directory = TableDirectory::from_reader(&mut reader, offset.num_tables())?;
        log::debug!("font directory lists {} tables", directory.len());

        Ok(Self {
            data,
            offset,
            directory,
        })
    }

    /// Reads the whole font out of `reader`.
    pub fn from_reader<B: Read + Seek>(mut reader: B) -> Result<Self, TypecaseError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data).map_err(ReaderError::from)?;
        Self::from_bytes(data)
    }

    /// The raw bytes of the table named `tag`.
    pub fn table_data(&self, tag: Tag) -> Result<&[u8], TypecaseError> {
        let record = self
            .directory
            .get(tag)
            .ok_or(FormatError::MissingTable(tag))?;
        let range = record
            .range()
            .ok_or(FormatError::InvalidBufferLength(usize::MAX, self.data.len()))?;
        let len = range.end;
        self.data
            .get(range)
            .ok_or_else(|| FormatError::InvalidBufferLength(len, self.data.len()).into())
    }

    pub fn cmap(&self) -> Result<CharacterMappingTable, TypecaseError> {
        self.decode::<CharacterMappingTable>(CharacterMappingTable::decode)
    }

    pub fn os2(&self) -> Result<Os2, TypecaseError> {
        self.decode::<Os2>(Os2::decode)
    }

    pub fn head(&self) -> Result<Head, TypecaseError> {
        self.decode::<Head>(Head::decode)
    }

    pub fn hhea(&self) -> Result<Hhea, TypecaseError> {
        self.decode::<Hhea>(Hhea::decode)
    }

    /// Decodes `hmtx`, which needs the metric count from `hhea`.
    pub fn hmtx(&self) -> Result<Hmtx, TypecaseError> {
        let hhea = self.hhea()?;
        self.decode::<Hmtx>(|data| Hmtx::decode(data, hhea.number_of_h_metrics()))
    }

    pub fn name(&self) -> Result<Name, TypecaseError> {
        self.decode::<Name>(Name::decode)
    }

    fn decode<T: Table>(
        &self,
        decoder: impl FnOnce(&[u8]) -> Result<T, TypecaseError>,
    ) -> Result<T, TypecaseError> {
        let data = self.table_data(T::TAG)?;
        decoder(data).map_err(|source| {
            log::warn!("data for '{}' is malformed: {source}", T::TAG);
            TypecaseError::MalformedTable {
                tag: T::TAG,
                source: Box::new(source),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::BeBuffer;

    #[test]
    fn offset_table_requires_twelve_bytes() {
        assert!(OffsetTable::from_buffer(&[0; 11]).is_err());

        let buf = BeBuffer::new()
            .push(0x0001_0000u32)
            .extend([3u16, 32, 1, 16]);
        let table = OffsetTable::from_buffer(&buf).unwrap();
        assert_eq!(table.scalar_type(), 0x0001_0000);
        assert_eq!(table.num_tables(), 3);
    }

    #[test]
    fn table_record_from_buffer() {
        let buf = BeBuffer::new()
            .push(*b"head")
            .extend([0x1234_5678u32, 0x0001_0000, 0x0A00]);
        let record = TableRecord::from_buffer(&buf).unwrap();
        assert_eq!(record.tag(), Tag::new(b"head"));
        assert_eq!(record.checksum(), 0x1234_5678);
        assert_eq!(record.range(), Some(0x0001_0000..0x0001_0A00));

        assert!(TableRecord::from_buffer(&[0; 10]).is_err());
    }

    #[test]
    fn out_of_bounds_records_are_length_errors() {
        let buf = BeBuffer::new()
            .push(0x0001_0000u32)
            .extend([1u16, 16, 0, 0])
            .push(*b"cmap")
            .extend([0u32, u32::MAX, u32::MAX]);
        let font = FontFile::from_bytes(buf.into_vec()).unwrap();

        let record = font.directory.get(cmap::TAG).unwrap();
        if let Some(range) = record.range() {
            assert_eq!(range.len(), u32::MAX as usize);
        }
        assert!(matches!(
            font.table_data(cmap::TAG),
            Err(TypecaseError::FormatError(FormatError::InvalidBufferLength(_, 28)))
        ));
    }

    #[test]
    fn table_failures_keep_their_cause() {
        // cmap claiming two encoding records but holding none
        let buf = BeBuffer::new()
            .push(0x0001_0000u32)
            .extend([1u16, 16, 0, 0])
            .push(*b"cmap")
            .extend([0u32, 28, 4])
            .extend([0u16, 2]);
        let font = FontFile::from_bytes(buf.into_vec()).unwrap();

        let err = font.cmap().unwrap_err();
        assert!(matches!(
            &err,
            TypecaseError::MalformedTable { tag, source }
                if *tag == cmap::TAG && matches!(**source, TypecaseError::ReaderError(_))
        ));
        let cause = std::error::Error::source(&err).unwrap();
        assert!(cause.to_string().contains("failed to fill whole buffer"));
    }

    #[test]
    fn missing_table_is_reported() {
        let buf = BeBuffer::new()
            .push(0x0001_0000u32)
            .extend([0u16, 0, 0, 0]);
        let font = FontFile::from_bytes(buf.into_vec()).unwrap();
        assert!(font.directory.is_empty());
        assert!(matches!(
            font.cmap(),
            Err(TypecaseError::FormatError(FormatError::MissingTable(tag))) if tag == cmap::TAG
        ));
    }
}
