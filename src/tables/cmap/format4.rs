// https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-4-segment-mapping-to-delta-values

use std::io::{Read, Seek};

use crate::{
    GlyphId, TypecaseError,
    buffer::FontReader,
    dump::{Dump, DumpDescription},
    tables::PlatformId,
};

use super::MappingScope;

/// A contiguous range of codes sharing one mapping rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start_code: u16,
    pub end_code: u16,
    pub id_delta: i16,
    /// Zero for `code + delta`, otherwise the byte distance from this field
    /// to the segment's first entry in the glyph index array.
    pub id_range_offset: u16,
}

impl Segment {
    /// The range offset marking a segment that maps through its delta alone.
    pub const DIRECT: u16 = 0;

    fn contains(&self, code: u16) -> bool {
        self.start_code <= code && code <= self.end_code
    }
}

/// A format 4 subtable, the standard mapping for the Basic Multilingual
/// Plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedCharacterMapping {
    scope: MappingScope,
    segments: Vec<Segment>,
    glyph_ids: Vec<u16>,
}

impl SegmentedCharacterMapping {
    pub fn new(segments: Vec<Segment>, glyph_ids: Vec<u16>, scope: MappingScope) -> Self {
        Self {
            scope,
            segments,
            glyph_ids,
        }
    }

    pub fn scope(&self) -> &MappingScope {
        &self.scope
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn glyph_ids(&self) -> &[u16] {
        &self.glyph_ids
    }

    pub fn map_codepoint(&self, codepoint: u32) -> Option<GlyphId> {
        let code = u16::try_from(codepoint).ok()?;
        let index = self.segments.iter().position(|segment| segment.contains(code))?;
        let segment = &self.segments[index];
        let delta = segment.id_delta as u16;

        if segment.id_range_offset == Segment::DIRECT {
            return GlyphId::mapped(code.wrapping_add(delta).into());
        }

        // The range offsets form an array of one entry per segment followed
        // directly by the glyph index array.
        let position = usize::from(segment.id_range_offset / 2) + usize::from(code - segment.start_code);
        let position = position.checked_sub(self.segments.len() - index)?;
        let glyph = *self.glyph_ids.get(position)?;
        if glyph == 0 {
            return None;
        }
        GlyphId::mapped(glyph.wrapping_add(delta).into())
    }

    /// Reads the subtable following its format field.
    pub(crate) fn decode<B: Read + Seek>(
        reader: &mut FontReader<B>,
        platform: PlatformId,
        encoding: u16,
    ) -> Result<Self, TypecaseError> {
        let _length = reader.read_u16()?;
        let language = reader.read_u16()?;
        let seg_count = usize::from(reader.read_u16()? / 2);
        // searchRange, entrySelector, rangeShift
        reader.skip(6)?;

        let end_codes = reader.read_u16_array(seg_count)?;
        let _reserved_pad = reader.read_u16()?;
        let start_codes = reader.read_u16_array(seg_count)?;
        let id_deltas = reader.read_i16_array(seg_count)?;
        let id_range_offsets = reader.read_u16_array(seg_count)?;

        // The length field is unreliable in large fonts, so the glyph array
        // runs to the end of the table.
        let glyph_count = reader.remaining()? / 2;
        let glyph_ids = reader.read_u16_array(glyph_count as usize)?;

        let segments = (0..seg_count)
            .map(|i| Segment {
                start_code: start_codes[i],
                end_code: end_codes[i],
                id_delta: id_deltas[i],
                id_range_offset: id_range_offsets[i],
            })
            .collect::<Vec<_>>();
        log::debug!(
            "format 4 subtable: {} segments, {} glyph indices",
            segments.len(),
            glyph_ids.len()
        );

        Ok(Self::new(
            segments,
            glyph_ids,
            MappingScope::new(platform, encoding, language),
        ))
    }
}

impl Dump for SegmentedCharacterMapping {
    fn dump(&self) -> DumpDescription {
        let detail = format!(
            "{} segments, {} glyph indices",
            self.segments.len(),
            self.glyph_ids.len()
        );
        let mut dump = DumpDescription::new(self.scope.describe(4, "segment mapping", detail))
            .with_columns(&["Start code", "End code", "Id delta", "Id range offset"]);
        for segment in &self.segments {
            dump.push_row(vec![
                format!("{:#06X}", segment.start_code),
                format!("{:#06X}", segment.end_code),
                segment.id_delta.to_string(),
                segment.id_range_offset.to_string(),
            ]);
        }
        dump
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::BeBuffer;

    fn segment(start_code: u16, end_code: u16, id_delta: i16, id_range_offset: u16) -> Segment {
        Segment {
            start_code,
            end_code,
            id_delta,
            id_range_offset,
        }
    }

    /// 'A'..='C' by delta, 'a'..='c' through the glyph array, plus the
    /// mandatory 0xFFFF segment.
    fn mapping() -> SegmentedCharacterMapping {
        let segments = vec![
            segment(0x41, 0x43, -0x40, Segment::DIRECT),
            // two segments after this one: 4 bytes to reach the array
            segment(0x61, 0x63, 0, 4),
            segment(0xFFFF, 0xFFFF, 1, Segment::DIRECT),
        ];
        SegmentedCharacterMapping::new(
            segments,
            vec![20, 0, 22],
            MappingScope::new(PlatformId::Windows, 1, 0),
        )
    }

    #[test]
    fn direct_segments_add_the_delta() {
        let mapping = mapping();
        assert_eq!(mapping.map_codepoint(0x41), Some(GlyphId::new(1)));
        assert_eq!(mapping.map_codepoint(0x43), Some(GlyphId::new(3)));
        // 0xFFFF + 1 wraps to .notdef
        assert_eq!(mapping.map_codepoint(0xFFFF), None);
    }

    #[test]
    fn delta_wraps_modulo_65536() {
        let mapping = SegmentedCharacterMapping::new(
            vec![segment(0xFFF0, 0xFFFE, 0x20, Segment::DIRECT)],
            Vec::new(),
            MappingScope::new(PlatformId::Windows, 1, 0),
        );
        assert_eq!(mapping.map_codepoint(0xFFF0), Some(GlyphId::new(0x10)));
    }

    #[test]
    fn indirect_segments_read_the_glyph_array() {
        let mapping = mapping();
        assert_eq!(mapping.map_codepoint(0x61), Some(GlyphId::new(20)));
        assert_eq!(mapping.map_codepoint(0x62), None);
        assert_eq!(mapping.map_codepoint(0x63), Some(GlyphId::new(22)));
    }

    #[test]
    fn uncovered_codes_are_unmapped() {
        let mapping = mapping();
        assert_eq!(mapping.map_codepoint(0x40), None);
        assert_eq!(mapping.map_codepoint(0x44), None);
        assert_eq!(mapping.map_codepoint(0x1_0041), None);
    }

    #[test]
    fn decodes_wire_layout() {
        let buf = BeBuffer::new()
            .extend([16u16 + 8 * 3 + 6, 0])
            .extend([6u16, 4, 1, 2]) // segCountX2, searchRange, entrySelector, rangeShift
            .extend([0x43u16, 0x63, 0xFFFF]) // end codes
            .push(0u16)
            .extend([0x41u16, 0x61, 0xFFFF]) // start codes
            .extend([-0x40i16, 0, 1])
            .extend([0u16, 4, 0])
            .extend([20u16, 0, 22]);

        let decoded =
            SegmentedCharacterMapping::decode(&mut FontReader::from_slice(&buf), PlatformId::Windows, 1)
                .unwrap();
        assert_eq!(decoded, mapping());

        let dump = decoded.dump();
        assert_eq!(dump.rows().len(), 3);
        assert_eq!(dump.rows()[0], vec!["0x0041", "0x0043", "-64", "0"]);
    }

    #[test]
    fn glyph_array_runs_past_an_understated_length() {
        // the length field only covers the segment arrays
        let buf = BeBuffer::new()
            .extend([16u16 + 8 * 3, 0])
            .extend([6u16, 4, 1, 2])
            .extend([0x43u16, 0x63, 0xFFFF])
            .push(0u16)
            .extend([0x41u16, 0x61, 0xFFFF])
            .extend([-0x40i16, 0, 1])
            .extend([0u16, 4, 0])
            .extend([20u16, 0, 22]);

        let decoded =
            SegmentedCharacterMapping::decode(&mut FontReader::from_slice(&buf), PlatformId::Windows, 1)
                .unwrap();
        assert_eq!(decoded.glyph_ids(), &[20, 0, 22]);
        assert_eq!(decoded.map_codepoint(0x61), Some(GlyphId::new(20)));
        assert_eq!(decoded.map_codepoint(0x63), Some(GlyphId::new(22)));
    }
}
