// https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-6-trimmed-table-mapping

use std::io::{Read, Seek};

use crate::{
    GlyphId, TypecaseError,
    buffer::FontReader,
    dump::{Dump, DumpDescription},
    tables::PlatformId,
};

use super::{MappingScope, push_glyph_rows};

/// A format 6 subtable: a dense glyph array for one range of 16-bit codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimmedTableCharacterMapping {
    scope: MappingScope,
    first_code: u16,
    glyph_ids: Vec<u16>,
}

impl TrimmedTableCharacterMapping {
    pub fn new(first_code: u16, glyph_ids: Vec<u16>, scope: MappingScope) -> Self {
        Self {
            scope,
            first_code,
            glyph_ids,
        }
    }

    pub fn scope(&self) -> &MappingScope {
        &self.scope
    }

    pub fn first_code(&self) -> u16 {
        self.first_code
    }

    pub fn glyph_ids(&self) -> &[u16] {
        &self.glyph_ids
    }

    pub fn map_codepoint(&self, codepoint: u32) -> Option<GlyphId> {
        let index = codepoint.checked_sub(self.first_code.into())?;
        let glyph = *self.glyph_ids.get(usize::try_from(index).ok()?)?;
        GlyphId::mapped(glyph.into())
    }

    /// Reads the subtable following its format field.
    pub(crate) fn decode<B: Read + Seek>(
        reader: &mut FontReader<B>,
        platform: PlatformId,
        encoding: u16,
    ) -> Result<Self, TypecaseError> {
        let _length = reader.read_u16()?;
        let language = reader.read_u16()?;
        let first_code = reader.read_u16()?;
        let entry_count = reader.read_u16()?;
        let glyph_ids = reader.read_u16_array(entry_count.into())?;

        Ok(Self::new(
            first_code,
            glyph_ids,
            MappingScope::new(platform, encoding, language),
        ))
    }
}

impl Dump for TrimmedTableCharacterMapping {
    fn dump(&self) -> DumpDescription {
        let detail = format!(
            "first code {:#06X}, {} entries",
            self.first_code,
            self.glyph_ids.len()
        );
        let mut dump = DumpDescription::new(self.scope.describe(6, "trimmed table", detail))
            .with_columns(&["Code", "Glyph id"]);
        push_glyph_rows(
            &mut dump,
            (u32::from(self.first_code)..).zip(self.glyph_ids.iter().map(|&glyph| u32::from(glyph))),
        );
        dump
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::BeBuffer;

    #[test]
    fn offsets_codes_into_the_array() {
        let mapping = TrimmedTableCharacterMapping::new(
            0x20,
            vec![3, 0, 5],
            MappingScope::new(PlatformId::Macintosh, 0, 0),
        );

        assert_eq!(mapping.map_codepoint(0x1F), None);
        assert_eq!(mapping.map_codepoint(0x20), Some(GlyphId::new(3)));
        assert_eq!(mapping.map_codepoint(0x21), None);
        assert_eq!(mapping.map_codepoint(0x22), Some(GlyphId::new(5)));
        assert_eq!(mapping.map_codepoint(0x23), None);
    }

    #[test]
    fn decodes_wire_layout() {
        let buf = BeBuffer::new().extend([16u16, 0, 0x20, 3, 3, 0, 5]);
        let decoded =
            TrimmedTableCharacterMapping::decode(&mut FontReader::from_slice(&buf), PlatformId::Macintosh, 0)
                .unwrap();

        assert_eq!(decoded.first_code(), 0x20);
        assert_eq!(decoded.glyph_ids(), &[3, 0, 5]);
        // the unmapped entry is left out of the dump
        assert_eq!(decoded.dump().rows().len(), 2);
    }
}
