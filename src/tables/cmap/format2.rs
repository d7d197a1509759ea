// https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-2-high-byte-mapping-through-table

use std::io::{Read, Seek};

use crate::{
    GlyphId, TypecaseError,
    buffer::FontReader,
    dump::{Dump, DumpDescription},
    tables::PlatformId,
};

use super::MappingScope;

/// Size of a subheader record on the wire.
const SUBHEADER_SIZE: i64 = 8;

/// One subheader of a format 2 subtable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubHeader {
    pub first_code: u16,
    pub entry_count: u16,
    pub id_delta: i16,
    /// Bytes from this field to the subheader's first entry in the glyph
    /// index array; zero selects the direct `low - first + delta` rule.
    pub id_range_offset: u16,
}

/// A format 2 subtable, mixing one and two byte codes as used by the
/// CJK encodings.
///
/// The high byte of a code selects a subheader, the low byte an entry within
/// it. All subheaders share one glyph index array owned by the mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighByteSubheaderCharacterMapping {
    scope: MappingScope,
    /// Subheader index for every high byte; 0 marks a single byte code.
    subheader_keys: [u16; 256],
    subheaders: Vec<SubHeader>,
    glyph_ids: Vec<u16>,
}

impl HighByteSubheaderCharacterMapping {
    pub fn new(
        subheader_keys: [u16; 256],
        subheaders: Vec<SubHeader>,
        glyph_ids: Vec<u16>,
        scope: MappingScope,
    ) -> Self {
        Self {
            scope,
            subheader_keys,
            subheaders,
            glyph_ids,
        }
    }

    pub fn scope(&self) -> &MappingScope {
        &self.scope
    }

    pub fn subheader_keys(&self) -> &[u16; 256] {
        &self.subheader_keys
    }

    pub fn subheaders(&self) -> &[SubHeader] {
        &self.subheaders
    }

    pub fn glyph_ids(&self) -> &[u16] {
        &self.glyph_ids
    }

    pub fn map_codepoint(&self, codepoint: u32) -> Option<GlyphId> {
        let [high, low] = u16::try_from(codepoint).ok()?.to_be_bytes();
        let index = if high == 0 {
            // A byte that starts a two byte code maps to nothing by itself.
            if self.subheader_keys[usize::from(low)] != 0 {
                return None;
            }
            0
        } else {
            match self.subheader_keys[usize::from(high)] {
                0 => return None,
                index => usize::from(index),
            }
        };

        let subheader = self.subheaders.get(index)?;
        let offset = u16::from(low).checked_sub(subheader.first_code)?;
        if offset >= subheader.entry_count {
            return None;
        }

        let delta = subheader.id_delta as u16;
        // A zero range offset maps `low - first + delta` directly, where
        // OpenType itself would still index the glyph array.
        if subheader.id_range_offset == 0 {
            return GlyphId::mapped(offset.wrapping_add(delta).into());
        }

        let glyph = *self.glyph_ids.get(self.glyph_index(index, subheader)? + usize::from(offset))?;
        if glyph == 0 {
            return None;
        }
        GlyphId::mapped(glyph.wrapping_add(delta).into())
    }

    /// Position in the glyph index array of the subheader's first entry.
    ///
    /// The range offset counts bytes from the subheader's own
    /// `id_range_offset` field, which sits 6 bytes into the record.
    fn glyph_index(&self, index: usize, subheader: &SubHeader) -> Option<usize> {
        let field_position = SUBHEADER_SIZE * index as i64 + 6;
        let array_position = SUBHEADER_SIZE * self.subheaders.len() as i64;
        let bytes = field_position + i64::from(subheader.id_range_offset) - array_position;
        if bytes < 0 || bytes % 2 != 0 {
            return None;
        }
        usize::try_from(bytes / 2).ok()
    }

    /// Reads the subtable following its format field.
    pub(crate) fn decode<B: Read + Seek>(
        reader: &mut FontReader<B>,
        platform: PlatformId,
        encoding: u16,
    ) -> Result<Self, TypecaseError> {
        let _length = reader.read_u16()?;
        let language = reader.read_u16()?;

        let mut subheader_keys = [0u16; 256];
        for key in subheader_keys.iter_mut() {
            // stored as byte offsets into the subheader array
            *key = reader.read_u16()? / SUBHEADER_SIZE as u16;
        }

        let subheader_count = usize::from(subheader_keys.iter().copied().max().unwrap_or(0)) + 1;
        let subheaders = (0..subheader_count)
            .map(|_| {
                Ok(SubHeader {
                    first_code: reader.read_u16()?,
                    entry_count: reader.read_u16()?,
                    id_delta: reader.read_i16()?,
                    id_range_offset: reader.read_u16()?,
                })
            })
            .collect::<Result<Vec<_>, TypecaseError>>()?;

        // Runs to the end of the table, like the format 4 glyph array.
        let glyph_count = reader.remaining()? / 2;
        let glyph_ids = reader.read_u16_array(glyph_count as usize)?;

        Ok(Self::new(
            subheader_keys,
            subheaders,
            glyph_ids,
            MappingScope::new(platform, encoding, language),
        ))
    }
}

impl Dump for HighByteSubheaderCharacterMapping {
    fn dump(&self) -> DumpDescription {
        let detail = format!(
            "{} subheaders, {} glyph indices",
            self.subheaders.len(),
            self.glyph_ids.len()
        );
        let mut dump = DumpDescription::new(self.scope.describe(2, "high byte mapping", detail))
            .with_columns(&["Subheader", "First code", "Entry count", "Id delta", "Id range offset"]);
        for (index, subheader) in self.subheaders.iter().enumerate() {
            dump.push_row(vec![
                index.to_string(),
                format!("{:#04X}", subheader.first_code),
                subheader.entry_count.to_string(),
                subheader.id_delta.to_string(),
                subheader.id_range_offset.to_string(),
            ]);
        }
        dump
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::BeBuffer;

    fn scope() -> MappingScope {
        MappingScope::new(PlatformId::Windows, 2, 0)
    }

    /// Single byte codes map directly; 0x81 leads two byte codes
    /// 0x8140..=0x8142 through the glyph array.
    fn mapping() -> HighByteSubheaderCharacterMapping {
        let mut keys = [0u16; 256];
        keys[0x81] = 1;
        let subheaders = vec![
            SubHeader {
                first_code: 0,
                entry_count: 256,
                id_delta: 0,
                id_range_offset: 0,
            },
            SubHeader {
                first_code: 0x40,
                entry_count: 3,
                id_delta: 5,
                // field at 8 + 6, array at 16
                id_range_offset: 2,
            },
        ];
        HighByteSubheaderCharacterMapping::new(keys, subheaders, vec![10, 0, 12], scope())
    }

    #[test]
    fn single_byte_codes() {
        let mapping = mapping();
        assert_eq!(mapping.map_codepoint(0x41), Some(GlyphId::new(0x41)));
        assert_eq!(mapping.map_codepoint(0), None);
        // lead byte on its own
        assert_eq!(mapping.map_codepoint(0x81), None);
    }

    #[test]
    fn two_byte_codes_go_through_the_glyph_array() {
        let mapping = mapping();
        assert_eq!(mapping.map_codepoint(0x8140), Some(GlyphId::new(15)));
        assert_eq!(mapping.map_codepoint(0x8141), None);
        assert_eq!(mapping.map_codepoint(0x8142), Some(GlyphId::new(17)));
        assert_eq!(mapping.map_codepoint(0x813F), None);
        assert_eq!(mapping.map_codepoint(0x8143), None);
        assert_eq!(mapping.map_codepoint(0x8240), None);
        assert_eq!(mapping.map_codepoint(0x1_8140), None);
    }

    #[test]
    fn decodes_wire_layout() {
        let mut keys = vec![0u16; 256];
        keys[0x81] = 8;
        let length = 6 + 512 + 16 + 6;
        let buf = BeBuffer::new()
            .extend([length as u16, 0])
            .extend(keys)
            .extend([0u16, 256])
            .push(0i16)
            .push(0u16)
            .extend([0x40u16, 3])
            .push(5i16)
            .push(2u16)
            .extend([10u16, 0, 12]);

        let decoded = HighByteSubheaderCharacterMapping::decode(
            &mut FontReader::from_slice(&buf),
            PlatformId::Windows,
            2,
        )
        .unwrap();
        assert_eq!(decoded, mapping());
        assert_eq!(decoded.dump().rows().len(), 2);
    }

    #[test]
    fn glyph_array_ignores_a_wrapped_length() {
        let mut keys = vec![0u16; 256];
        keys[0x81] = 8;
        // a length that wrapped past 65535 ends up smaller than the header
        let buf = BeBuffer::new()
            .extend([4u16, 0])
            .extend(keys)
            .extend([0u16, 256])
            .push(0i16)
            .push(0u16)
            .extend([0x40u16, 3])
            .push(5i16)
            .push(2u16)
            .extend([10u16, 0, 12]);

        let decoded = HighByteSubheaderCharacterMapping::decode(
            &mut FontReader::from_slice(&buf),
            PlatformId::Windows,
            2,
        )
        .unwrap();
        assert_eq!(decoded.glyph_ids(), &[10, 0, 12]);
        assert_eq!(decoded.map_codepoint(0x8142), Some(GlyphId::new(17)));
    }
}
