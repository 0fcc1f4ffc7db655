use crate::codec::LevelDescriptor;
use crate::compact::LevelCompactor;
use crate::config::{LEVEL_SIZE, LevelConfig};
use crate::error::Result;
use crate::resolve::{HeightBands, resolve_bands};
use crate::types::{AirspaceVector, Point};

/// Encodes the airspace vectors of one grid point into its fixed-size record
///
/// A record is always `config.levels * 4` bytes: the surviving levels in
/// ascending altitude order followed by empty levels.
#[derive(Debug, Clone, Default)]
pub struct PointEncoder {
    config: LevelConfig,
}

impl PointEncoder {
    /// Encoder writing `config.levels` descriptors per point
    pub fn new(config: LevelConfig) -> Self {
        Self { config }
    }

    /// Level settings, needed to decode the records again
    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// Bytes written per point
    pub fn record_size(&self) -> usize {
        self.config.record_size()
    }

    /// Resolve and compact the vectors into at most `config.levels` bands
    pub fn levels<'a>(&self, point: Point, vectors: &[AirspaceVector<'a>]) -> Result<HeightBands<'a>> {
        LevelCompactor::new(&self.config).compact(point, resolve_bands(vectors))
    }

    /// Write the record for `point` into `output[offset..offset + record_size]`
    ///
    /// Every byte of the record is overwritten, whatever the number of
    /// surviving levels.
    ///
    /// # Panics
    ///
    /// If `output` is too short to hold a record at `offset`.
    pub fn encode_at(
        &self,
        point: Point,
        vectors: &[AirspaceVector<'_>],
        output: &mut [u8],
        offset: usize,
    ) -> Result<()> {
        let bands = self.levels(point, vectors)?;
        self.write_record(&bands, &mut output[offset..offset + self.record_size()]);
        Ok(())
    }

    /// Encode into a freshly allocated record
    pub fn encode_record(&self, point: Point, vectors: &[AirspaceVector<'_>]) -> Result<Vec<u8>> {
        let mut record = vec![0u8; self.record_size()];
        self.encode_at(point, vectors, &mut record, 0)?;
        Ok(record)
    }

    /// Like [`encode_record`](Self::encode_record), logging every compaction pass
    pub fn encode_traced(&self, point: Point, vectors: &[AirspaceVector<'_>]) -> Result<Vec<u8>> {
        log::debug!("{point}: {} airspaces here", vectors.len());

        let bands = LevelCompactor::new(&self.config)
            .with_tracing(true)
            .compact(point, resolve_bands(vectors))?;

        let mut record = vec![0u8; self.record_size()];
        self.write_record(&bands, &mut record);
        Ok(record)
    }

    fn write_record(&self, bands: &HeightBands<'_>, record: &mut [u8]) {
        let mut slots = record.chunks_exact_mut(LEVEL_SIZE);

        // Bands first, so running out of bands does not consume a slot
        for (vector, slot) in bands.values().zip(slots.by_ref()) {
            slot.copy_from_slice(LevelDescriptor::encode(vector, &self.config).as_bytes());
        }
        for slot in slots {
            slot.copy_from_slice(LevelDescriptor::EMPTY.as_bytes());
        }
    }
}
