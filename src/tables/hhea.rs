//! The [hhea](https://learn.microsoft.com/en-us/typography/opentype/spec/hhea) table

use crate::{
    Tag, TypecaseError,
    buffer::FontReader,
    dump::{Dump, DumpDescription, FIELD_COLUMNS},
    tables::{FormatError, Table},
};

/// 'hhea'
pub const TAG: Tag = Tag::new(b"hhea");

/// The horizontal header table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hhea {
    version: (u16, u16),
    ascender: i16,
    descender: i16,
    line_gap: i16,
    advance_width_max: u16,
    min_left_side_bearing: i16,
    min_right_side_bearing: i16,
    x_max_extent: i16,
    caret_slope_rise: i16,
    caret_slope_run: i16,
    caret_offset: i16,
    metric_data_format: i16,
    /// Entries in the `hmtx` table's long metric array
    number_of_h_metrics: u16,
}

impl Table for Hhea {
    const TAG: Tag = TAG;
}

impl Hhea {
    pub const LENGTH: usize = 36;

    pub fn decode(data: &[u8]) -> Result<Self, TypecaseError> {
        if data.len() < Self::LENGTH {
            return Err(FormatError::InvalidBufferLength(Self::LENGTH, data.len()).into());
        }
        let mut reader = FontReader::from_slice(data);

        let version = (reader.read_u16()?, reader.read_u16()?);
        let ascender = reader.read_i16()?;
        let descender = reader.read_i16()?;
        let line_gap = reader.read_i16()?;
        let advance_width_max = reader.read_u16()?;
        let min_left_side_bearing = reader.read_i16()?;
        let min_right_side_bearing = reader.read_i16()?;
        let x_max_extent = reader.read_i16()?;
        let caret_slope_rise = reader.read_i16()?;
        let caret_slope_run = reader.read_i16()?;
        let caret_offset = reader.read_i16()?;
        // four reserved int16
        reader.skip(8)?;
        let metric_data_format = reader.read_i16()?;
        let number_of_h_metrics = reader.read_u16()?;

        Ok(Self {
            version,
            ascender,
            descender,
            line_gap,
            advance_width_max,
            min_left_side_bearing,
            min_right_side_bearing,
            x_max_extent,
            caret_slope_rise,
            caret_slope_run,
            caret_offset,
            metric_data_format,
            number_of_h_metrics,
        })
    }

    pub fn version(&self) -> (u16, u16) {
        self.version
    }

    pub fn ascender(&self) -> i16 {
        self.ascender
    }

    pub fn descender(&self) -> i16 {
        self.descender
    }

    pub fn line_gap(&self) -> i16 {
        self.line_gap
    }

    pub fn advance_width_max(&self) -> u16 {
        self.advance_width_max
    }

    pub fn min_left_side_bearing(&self) -> i16 {
        self.min_left_side_bearing
    }

    pub fn min_right_side_bearing(&self) -> i16 {
        self.min_right_side_bearing
    }

    pub fn x_max_extent(&self) -> i16 {
        self.x_max_extent
    }

    /// The caret slope as `(rise, run)`.
    pub fn caret_slope(&self) -> (i16, i16) {
        (self.caret_slope_rise, self.caret_slope_run)
    }

    pub fn caret_offset(&self) -> i16 {
        self.caret_offset
    }

    pub fn metric_data_format(&self) -> i16 {
        self.metric_data_format
    }

    pub fn number_of_h_metrics(&self) -> u16 {
        self.number_of_h_metrics
    }
}

impl Dump for Hhea {
    fn dump(&self) -> DumpDescription {
        let mut dump = DumpDescription::new(format!("hhea: version {}.{}", self.version.0, self.version.1))
            .with_columns(&FIELD_COLUMNS);
        dump.push_field("ascender", self.ascender);
        dump.push_field("descender", self.descender);
        dump.push_field("lineGap", self.line_gap);
        dump.push_field("advanceWidthMax", self.advance_width_max);
        dump.push_field("minLeftSideBearing", self.min_left_side_bearing);
        dump.push_field("minRightSideBearing", self.min_right_side_bearing);
        dump.push_field("xMaxExtent", self.x_max_extent);
        dump.push_field("caretSlopeRise", self.caret_slope_rise);
        dump.push_field("caretSlopeRun", self.caret_slope_run);
        dump.push_field("caretOffset", self.caret_offset);
        dump.push_field("metricDataFormat", self.metric_data_format);
        dump.push_field("numberOfHMetrics", self.number_of_h_metrics);
        dump
    }
}
