//! The [hmtx](https://learn.microsoft.com/en-us/typography/opentype/spec/hmtx) table

use crate::{
    GlyphId, Tag, TypecaseError,
    buffer::FontReader,
    dump::{Dump, DumpDescription},
    tables::Table,
};

/// 'hmtx'
pub const TAG: Tag = Tag::new(b"hmtx");

/// Advance width and left side bearing of one glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongHorMetric {
    pub advance_width: u16,
    pub lsb: i16,
}

/// Horizontal metrics for every glyph.
///
/// Glyphs past the long metrics share the last advance width and only
/// store a left side bearing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hmtx {
    h_metrics: Vec<LongHorMetric>,
    left_side_bearings: Vec<i16>,
}

impl Table for Hmtx {
    const TAG: Tag = TAG;
}

impl Hmtx {
    pub fn new(h_metrics: Vec<LongHorMetric>, left_side_bearings: Vec<i16>) -> Self {
        Self {
            h_metrics,
            left_side_bearings,
        }
    }

    /// Decodes the table; `number_of_h_metrics` comes from `hhea`. Every
    /// remaining pair of bytes is a trailing left side bearing.
    pub fn decode(data: &[u8], number_of_h_metrics: u16) -> Result<Self, TypecaseError> {
        let mut reader = FontReader::from_slice(data);
        let h_metrics = (0..number_of_h_metrics)
            .map(|_| {
                Ok(LongHorMetric {
                    advance_width: reader.read_u16()?,
                    lsb: reader.read_i16()?,
                })
            })
            .collect::<Result<Vec<_>, TypecaseError>>()?;

        let remaining = data.len().saturating_sub(4 * usize::from(number_of_h_metrics));
        let left_side_bearings = reader.read_i16_array(remaining / 2)?;

        Ok(Self::new(h_metrics, left_side_bearings))
    }

    pub fn h_metrics(&self) -> &[LongHorMetric] {
        &self.h_metrics
    }

    pub fn left_side_bearings(&self) -> &[i16] {
        &self.left_side_bearings
    }

    pub fn advance_width(&self, glyph: GlyphId) -> Option<u16> {
        let index = glyph.to_u32() as usize;
        if index >= self.h_metrics.len() + self.left_side_bearings.len() {
            return None;
        }
        self.h_metrics
            .get(index)
            .or_else(|| self.h_metrics.last())
            .map(|metric| metric.advance_width)
    }

    pub fn left_side_bearing(&self, glyph: GlyphId) -> Option<i16> {
        let index = glyph.to_u32() as usize;
        match self.h_metrics.get(index) {
            Some(metric) => Some(metric.lsb),
            None => self
                .left_side_bearings
                .get(index - self.h_metrics.len())
                .copied(),
        }
    }
}

impl Dump for Hmtx {
    fn dump(&self) -> DumpDescription {
        let info = format!(
            "hmtx: {} long metrics, {} left side bearings",
            self.h_metrics.len(),
            self.left_side_bearings.len()
        );
        let mut dump =
            DumpDescription::new(info).with_columns(&["Glyph", "Advance width", "Left side bearing"]);
        let advances = self.h_metrics.iter().map(|m| m.advance_width.to_string());
        let bearings = self
            .h_metrics
            .iter()
            .map(|m| m.lsb)
            .chain(self.left_side_bearings.iter().copied());
        let trailing = std::iter::repeat_n(String::from("-"), self.left_side_bearings.len());

        for (glyph, (advance, lsb)) in advances.chain(trailing).zip(bearings).enumerate() {
            dump.push_row(vec![glyph.to_string(), advance, lsb.to_string()]);
        }
        dump
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::BeBuffer;

    #[test]
    fn trailing_glyphs_repeat_the_last_advance() {
        let buf = BeBuffer::new()
            .push(500u16)
            .push(10i16)
            .push(600u16)
            .push(-5i16)
            .extend([7i16, 8]);
        let hmtx = Hmtx::decode(&buf, 2).unwrap();

        assert_eq!(hmtx.h_metrics().len(), 2);
        assert_eq!(hmtx.left_side_bearings(), &[7, 8]);
        assert_eq!(hmtx.advance_width(GlyphId::new(0)), Some(500));
        assert_eq!(hmtx.advance_width(GlyphId::new(3)), Some(600));
        assert_eq!(hmtx.advance_width(GlyphId::new(4)), None);
        assert_eq!(hmtx.left_side_bearing(GlyphId::new(1)), Some(-5));
        assert_eq!(hmtx.left_side_bearing(GlyphId::new(2)), Some(7));
        assert_eq!(hmtx.left_side_bearing(GlyphId::new(4)), None);

        let dump = hmtx.dump();
        assert_eq!(dump.rows().len(), 4);
        assert_eq!(dump.rows()[3], vec!["3", "-", "8"]);
    }

    #[test]
    fn too_few_long_metrics_fail() {
        let buf = BeBuffer::new().push(500u16);
        assert!(Hmtx::decode(&buf, 1).is_err());
    }
}
