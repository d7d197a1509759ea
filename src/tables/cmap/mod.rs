//! The [cmap](https://learn.microsoft.com/en-us/typography/opentype/spec/cmap) table
//!
//! A `cmap` table holds one or more character mappings, each scoped to a
//! platform, an encoding and a language. Every supported subtable format is
//! one variant of [`CharacterMapping`].

use std::{
    fmt::Display,
    io::{Read, Seek},
    sync::Arc,
};

use crate::{
    GlyphId, Tag, TypecaseError,
    buffer::{FontReader, ReaderError},
    dump::{Dump, DumpDescription},
    tables::{FormatError, PlatformId, Table, platform::encoding},
};

mod collection;
mod format0;
mod format10;
mod format12;
mod format2;
mod format4;
mod format6;

pub use collection::CharacterMappingCollection;
pub use format0::PlainByteCharacterMapping;
pub use format2::{HighByteSubheaderCharacterMapping, SubHeader};
pub use format4::{Segment, SegmentedCharacterMapping};
pub use format6::TrimmedTableCharacterMapping;
pub use format10::Trimmed32BitTableCharacterMapping;
pub use format12::{Segmented32BitCharacterMapping, Segmented32BitFormat, SequentialMapGroup};

/// 'cmap'
pub const TAG: Tag = Tag::new(b"cmap");

/// The platform, encoding and language a character mapping is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MappingScope {
    pub platform: PlatformId,
    pub encoding: u16,
    pub language: u16,
}

impl MappingScope {
    pub fn new(platform: PlatformId, encoding: u16, language: u16) -> Self {
        Self {
            platform,
            encoding,
            language,
        }
    }

    /// The title line shared by every subtable dump.
    fn describe(&self, format: u16, kind: &str, detail: impl Display) -> String {
        format!(
            "cmap format {format} ({kind}): platform {}, encoding {}, language {}, {detail}",
            self.platform, self.encoding, self.language
        )
    }
}

/// One decoded `cmap` subtable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharacterMapping {
    PlainByte(PlainByteCharacterMapping),
    HighByteSubheader(HighByteSubheaderCharacterMapping),
    Segmented(SegmentedCharacterMapping),
    TrimmedTable(TrimmedTableCharacterMapping),
    Trimmed32BitTable(Trimmed32BitTableCharacterMapping),
    Segmented32Bit(Segmented32BitCharacterMapping),
}

impl CharacterMapping {
    pub fn scope(&self) -> &MappingScope {
        match self {
            Self::PlainByte(mapping) => mapping.scope(),
            Self::HighByteSubheader(mapping) => mapping.scope(),
            Self::Segmented(mapping) => mapping.scope(),
            Self::TrimmedTable(mapping) => mapping.scope(),
            Self::Trimmed32BitTable(mapping) => mapping.scope(),
            Self::Segmented32Bit(mapping) => mapping.scope(),
        }
    }

    pub fn platform(&self) -> PlatformId {
        self.scope().platform
    }

    pub fn encoding(&self) -> u16 {
        self.scope().encoding
    }

    pub fn language(&self) -> u16 {
        self.scope().language
    }

    /// The subtable format number this mapping was decoded from.
    pub fn format(&self) -> u16 {
        match self {
            Self::PlainByte(_) => 0,
            Self::HighByteSubheader(_) => 2,
            Self::Segmented(_) => 4,
            Self::TrimmedTable(_) => 6,
            Self::Trimmed32BitTable(_) => 10,
            Self::Segmented32Bit(mapping) => mapping.format().to_u16(),
        }
    }

    /// Maps a code point to a nominal glyph identifier.
    ///
    /// Returns `None` when the code point is not covered by this mapping.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        match self {
            Self::PlainByte(mapping) => mapping.map_codepoint(codepoint),
            Self::HighByteSubheader(mapping) => mapping.map_codepoint(codepoint),
            Self::Segmented(mapping) => mapping.map_codepoint(codepoint),
            Self::TrimmedTable(mapping) => mapping.map_codepoint(codepoint),
            Self::Trimmed32BitTable(mapping) => mapping.map_codepoint(codepoint),
            Self::Segmented32Bit(mapping) => mapping.map_codepoint(codepoint),
        }
    }
}

impl Dump for CharacterMapping {
    fn dump(&self) -> DumpDescription {
        match self {
            Self::PlainByte(mapping) => mapping.dump(),
            Self::HighByteSubheader(mapping) => mapping.dump(),
            Self::Segmented(mapping) => mapping.dump(),
            Self::TrimmedTable(mapping) => mapping.dump(),
            Self::Trimmed32BitTable(mapping) => mapping.dump(),
            Self::Segmented32Bit(mapping) => mapping.dump(),
        }
    }
}

/// Subtables tried by [`CharacterMappingTable::select_unicode_mapping`],
/// best first.
const UNICODE_PREFERENCE: [(PlatformId, u16); 7] = [
    (PlatformId::Windows, encoding::windows::UNICODE_FULL),
    (PlatformId::Unicode, encoding::unicode::FULL_REPERTOIRE),
    (PlatformId::Unicode, encoding::unicode::UNICODE_2_0_FULL),
    (PlatformId::Windows, encoding::windows::UNICODE_BMP),
    (PlatformId::Unicode, encoding::unicode::UNICODE_2_0_BMP),
    (PlatformId::Unicode, encoding::unicode::VERSION_1_1),
    (PlatformId::Unicode, encoding::unicode::VERSION_1_0),
];

/// The decoded `cmap` table.
#[derive(Debug, Clone, Default)]
pub struct CharacterMappingTable {
    mappings: CharacterMappingCollection,
}

impl Table for CharacterMappingTable {
    const TAG: Tag = TAG;
}

impl CharacterMappingTable {
    /// Builds the table from already decoded mappings, keeping their order.
    ///
    /// An absent source gives an empty table.
    pub fn new<I>(mappings: Option<I>) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Arc<CharacterMapping>>,
    {
        Self {
            mappings: CharacterMappingCollection::new(mappings),
        }
    }

    pub fn mappings(&self) -> &CharacterMappingCollection {
        &self.mappings
    }

    /// Returns the first mapping, in stored order, scoped to exactly this
    /// platform and encoding.
    pub fn select_exact_mapping(
        &self,
        platform: PlatformId,
        encoding: u16,
    ) -> Option<&Arc<CharacterMapping>> {
        self.mappings
            .iter()
            .find(|mapping| mapping.platform() == platform && mapping.encoding() == encoding)
    }

    /// Returns the most complete Unicode mapping the font provides.
    pub fn select_unicode_mapping(&self) -> Option<&Arc<CharacterMapping>> {
        UNICODE_PREFERENCE
            .iter()
            .find_map(|&(platform, encoding)| self.select_exact_mapping(platform, encoding))
    }

    /// Maps a code point through the first mapping, in stored order, that
    /// covers it.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        self.mappings
            .iter()
            .find_map(|mapping| mapping.map_codepoint(codepoint))
    }

    /// Decodes the table from its byte range.
    pub fn decode(data: &[u8]) -> Result<Self, TypecaseError> {
        let mut reader = FontReader::from_slice(data);

        let version = reader.read_u16()?;
        if version != 0 {
            return Err(FormatError::UnsupportedVersion {
                tag: TAG,
                version: version.into(),
            }
            .into());
        }

        let num_tables = reader.read_u16()?;
        let records = (0..num_tables)
            .map(|_| EncodingRecord::from_reader(&mut reader))
            .collect::<Result<Vec<_>, _>>()?;

        let mut mappings = Vec::with_capacity(records.len());
        for record in &records {
            if let Some(mapping) = record.decode_subtable(&mut reader)? {
                mappings.push(mapping);
            }
        }
        log::debug!(
            "decoded {} of {} cmap subtables",
            mappings.len(),
            records.len()
        );

        Ok(Self::new(Some(mappings)))
    }
}

impl Dump for CharacterMappingTable {
    fn dump(&self) -> DumpDescription {
        let mut dump = DumpDescription::new(format!("cmap: {} subtables", self.mappings.len()))
            .with_columns(&["Index", "Platform", "Encoding", "Language", "Format"]);
        for (index, mapping) in self.mappings.iter().enumerate() {
            dump.push_row(vec![
                index.to_string(),
                mapping.platform().to_string(),
                mapping.encoding().to_string(),
                mapping.language().to_string(),
                mapping.format().to_string(),
            ]);
            dump.push_child(mapping.dump());
        }
        dump
    }
}

/// An entry of the cmap header pointing at one subtable.
#[derive(Debug, Clone, Copy)]
struct EncodingRecord {
    platform_id: u16,
    encoding_id: u16,
    offset: u32,
}

impl EncodingRecord {
    fn from_reader<B: Read + Seek>(reader: &mut FontReader<B>) -> Result<Self, ReaderError> {
        Ok(Self {
            platform_id: reader.read_u16()?,
            encoding_id: reader.read_u16()?,
            offset: reader.read_u32()?,
        })
    }

    /// Decodes the subtable this record points at, or `None` for a format
    /// that is tolerated but not modeled.
    fn decode_subtable<B: Read + Seek>(
        &self,
        reader: &mut FontReader<B>,
    ) -> Result<Option<CharacterMapping>, TypecaseError> {
        let platform = PlatformId::from(self.platform_id);
        if let PlatformId::Unknown(raw) = platform {
            log::warn!("cmap subtable with unknown platform id {raw}");
        }

        reader.seek_to(self.offset.into())?;
        let format = reader.read_u16()?;
        let encoding = self.encoding_id;

        let mapping = match format {
            0 => CharacterMapping::PlainByte(PlainByteCharacterMapping::decode(
                reader, platform, encoding,
            )?),
            2 => CharacterMapping::HighByteSubheader(HighByteSubheaderCharacterMapping::decode(
                reader, platform, encoding,
            )?),
            4 => CharacterMapping::Segmented(SegmentedCharacterMapping::decode(
                reader, platform, encoding,
            )?),
            6 => CharacterMapping::TrimmedTable(TrimmedTableCharacterMapping::decode(
                reader, platform, encoding,
            )?),
            8 | 12 | 13 => {
                let format = Segmented32BitFormat::from_u16(format)
                    .ok_or(FormatError::UnsupportedCmapFormat(format))?;
                CharacterMapping::Segmented32Bit(Segmented32BitCharacterMapping::decode(
                    reader, format, platform, encoding,
                )?)
            }
            10 => CharacterMapping::Trimmed32BitTable(Trimmed32BitTableCharacterMapping::decode(
                reader, platform, encoding,
            )?),
            14 => {
                log::warn!(
                    "skipping variation sequence subtable (platform {platform}, encoding {encoding})"
                );
                return Ok(None);
            }
            other => return Err(FormatError::UnsupportedCmapFormat(other).into()),
        };
        Ok(Some(mapping))
    }
}

/// Narrows the 32-bit language field of the long subtable formats.
fn narrow_language(raw: u32) -> Result<u16, FormatError> {
    u16::try_from(raw).map_err(|_| FormatError::ValueOutOfRange {
        field: "language",
        value: raw,
    })
}

/// Renders the `Code | Glyph id` rows of the array based formats,
/// skipping unmapped entries.
fn push_glyph_rows(dump: &mut DumpDescription, entries: impl Iterator<Item = (u32, u32)>) {
    for (code, glyph) in entries.filter(|&(_, glyph)| glyph != 0) {
        dump.push_row(vec![format!("{code:#06X}"), glyph.to_string()]);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_helpers::BeBuffer;

    fn trimmed(platform: PlatformId, encoding: u16, first: u16) -> CharacterMapping {
        CharacterMapping::TrimmedTable(TrimmedTableCharacterMapping::new(
            first,
            vec![1, 2, 3],
            MappingScope::new(platform, encoding, 0),
        ))
    }

    #[test]
    fn select_exact_mapping_matches_platform_and_encoding() {
        let table = CharacterMappingTable::new(Some(vec![
            trimmed(PlatformId::Unicode, 3, 0x20),
            trimmed(PlatformId::Windows, 1, 0x30),
            trimmed(PlatformId::Macintosh, 0, 0x40),
        ]));

        let windows = table.select_exact_mapping(PlatformId::Windows, 1).unwrap();
        assert!(Arc::ptr_eq(windows, table.mappings().get(1).unwrap()));

        assert!(table.select_exact_mapping(PlatformId::Windows, 10).is_none());
        assert!(table.select_exact_mapping(PlatformId::Iso, 3).is_none());
        assert!(table.select_exact_mapping(PlatformId::Macintosh, 1).is_none());
    }

    #[test]
    fn select_exact_mapping_first_inserted_wins() {
        let table = CharacterMappingTable::new(Some(vec![
            trimmed(PlatformId::Macintosh, 0, 0x10),
            trimmed(PlatformId::Windows, 1, 0x20),
            trimmed(PlatformId::Unicode, 3, 0x30),
            trimmed(PlatformId::Windows, 1, 0x40),
        ]));

        let selected = table.select_exact_mapping(PlatformId::Windows, 1).unwrap();
        assert!(Arc::ptr_eq(selected, table.mappings().get(1).unwrap()));
        assert_eq!(selected.map_codepoint(0x20u32), Some(GlyphId::new(1)));
    }

    #[test]
    fn absent_or_empty_sources_give_empty_tables() {
        let absent = CharacterMappingTable::new(None::<Vec<CharacterMapping>>);
        assert!(absent.mappings().is_empty());
        assert!(absent.select_exact_mapping(PlatformId::Windows, 1).is_none());

        let empty = CharacterMappingTable::new(Some(Vec::<CharacterMapping>::new()));
        assert_eq!(empty.mappings().len(), 0);
        assert!(empty.select_unicode_mapping().is_none());
    }

    #[test]
    fn unicode_selection_prefers_full_repertoire() {
        let table = CharacterMappingTable::new(Some(vec![
            trimmed(PlatformId::Macintosh, 0, 0x10),
            trimmed(PlatformId::Windows, 1, 0x20),
            trimmed(PlatformId::Windows, 10, 0x30),
        ]));

        let selected = table.select_unicode_mapping().unwrap();
        assert_eq!(selected.encoding(), 10);
    }

    #[test]
    fn table_maps_through_first_covering_subtable() {
        let table = CharacterMappingTable::new(Some(vec![
            trimmed(PlatformId::Windows, 1, 0x20),
            trimmed(PlatformId::Windows, 1, 0x21),
        ]));

        assert_eq!(table.map_codepoint(0x20u32), Some(GlyphId::new(1)));
        assert_eq!(table.map_codepoint(0x23u32), Some(GlyphId::new(3)));
        assert_eq!(table.map_codepoint(0x24u32), None);
    }

    #[test]
    fn dump_nests_each_subtable_in_order() {
        let mappings = vec![
            trimmed(PlatformId::Unicode, 3, 0x20),
            CharacterMapping::Segmented32Bit(Segmented32BitCharacterMapping::new(
                Segmented32BitFormat::ManyToOneMapping,
                vec![SequentialMapGroup::new(0x100, 0x1FF, 7)],
                MappingScope::new(PlatformId::Windows, 10, 0),
            )),
            trimmed(PlatformId::Macintosh, 0, 0x40),
        ];
        let table = CharacterMappingTable::new(Some(mappings.clone()));
        let dump = table.dump();

        assert_eq!(dump.children().len(), 3);
        assert_eq!(dump.rows().len(), 3);
        for (child, mapping) in dump.children().iter().zip(&mappings) {
            assert_eq!(child, &mapping.dump());
        }
        assert_eq!(dump.rows()[1], vec!["1", "Windows", "10", "0", "13"]);
    }

    #[test]
    fn decode_dispatches_on_format() {
        let _ = env_logger::builder().is_test(true).try_init();

        // header + 3 records = 4 + 24 bytes
        let format6_offset = 28u32;
        let format6_len = 16u32;
        let format12_offset = format6_offset + format6_len;
        let format14_offset = format12_offset + 28;

        let buf = BeBuffer::new()
            .extend([0u16, 3])
            .extend([3u16, 1])
            .push(format6_offset)
            .extend([3u16, 10])
            .push(format12_offset)
            .extend([0u16, 5])
            .push(format14_offset)
            // format 6: format, length, language, first code, count, glyphs
            .extend([6u16, 16, 0, 0x41, 3, 10, 11, 12])
            // format 12: format, reserved, length, language, groups
            .extend([12u16, 0])
            .extend([28u32, 0, 1])
            .extend([0x1F600u32, 0x1F602, 50])
            // format 14: format, length, record count
            .push(14u16)
            .extend([10u32, 0]);

        let table = CharacterMappingTable::decode(&buf).unwrap();
        assert_eq!(table.mappings().len(), 2);

        let bmp = table.select_exact_mapping(PlatformId::Windows, 1).unwrap();
        assert_eq!(bmp.format(), 6);
        assert_eq!(bmp.map_codepoint(0x42u32), Some(GlyphId::new(11)));

        let full = table.select_unicode_mapping().unwrap();
        assert_eq!(full.format(), 12);
        assert_eq!(full.map_codepoint(0x1F601u32), Some(GlyphId::new(51)));
    }

    #[test]
    fn decode_rejects_bad_input() {
        let wrong_version = BeBuffer::new().extend([1u16, 0]);
        assert!(matches!(
            CharacterMappingTable::decode(&wrong_version),
            Err(TypecaseError::FormatError(FormatError::UnsupportedVersion { version: 1, .. }))
        ));

        let unknown_format = BeBuffer::new()
            .extend([0u16, 1, 3, 1])
            .push(12u32)
            .extend([7u16, 0, 0]);
        assert!(matches!(
            CharacterMappingTable::decode(&unknown_format),
            Err(TypecaseError::FormatError(FormatError::UnsupportedCmapFormat(7)))
        ));

        let truncated = BeBuffer::new().extend([0u16, 2, 3, 1]);
        assert!(matches!(
            CharacterMappingTable::decode(&truncated),
            Err(TypecaseError::ReaderError(_))
        ));
    }
}
