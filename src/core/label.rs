//! QR label compositing.
//!
//! A label is the QR symbol stretched to the physical footprint described by a
//! [`LabelSpec`], followed by a fixed-height white band carrying the identifier.

use std::path::Path;
use std::sync::Arc;

use image::RgbImage;
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode};
use rayon::prelude::*;

use crate::config::LabelSpec;
use crate::core::record::SampleRecord;
use crate::error::{LabelError, Result};
use crate::image::{
    BLACK, LabelFace, WHITE, default_face, encode_png, paint_modules, paste, stretch_to_rgb,
};

/// Module grid of a version 1 symbol plus its quiet zone; fixes box size to the footprint.
pub const MODULE_GRID: u32 = 33;
/// Quiet zone width in modules.
pub const QUIET_ZONE: u32 = 4;
/// Height of the text band below the QR block.
pub const TEXT_BAND_PX: u32 = 50;
/// Gap between the bottom of the QR block and the top of the text.
pub const TEXT_OFFSET_PX: u32 = 5;

/// A composited label raster. Every label from one encoder has the same dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelImage(RgbImage);

impl LabelImage {
    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.0
    }

    pub fn into_rgb(self) -> RgbImage {
        self.0
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.0)
    }
}

impl AsRef<LabelImage> for LabelImage {
    fn as_ref(&self) -> &LabelImage {
        self
    }
}

/// A label together with the identifier it was printed with.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedLabel {
    pub label_id: String,
    pub image: LabelImage,
}

impl AsRef<LabelImage> for RenderedLabel {
    fn as_ref(&self) -> &LabelImage {
        &self.image
    }
}

/// Turns records into label images for one fixed geometry and face.
#[derive(Clone)]
pub struct LabelEncoder {
    spec: LabelSpec,
    face: Arc<dyn LabelFace>,
}

impl LabelEncoder {
    /// Validate the geometry and bind it to a face.
    pub fn new(spec: LabelSpec, face: Arc<dyn LabelFace>) -> Result<Self> {
        spec.validate()?;
        Ok(Self { spec, face })
    }

    /// Encoder using the process-wide face.
    pub fn with_default_face(spec: LabelSpec, font_path: Option<&Path>) -> Result<Self> {
        Self::new(spec, default_face(font_path))
    }

    pub fn spec(&self) -> &LabelSpec {
        &self.spec
    }

    pub fn face(&self) -> &dyn LabelFace {
        self.face.as_ref()
    }

    /// Dimensions every label from this encoder will have.
    pub fn label_size(&self) -> (u32, u32) {
        (
            self.spec.pixel_width(),
            self.spec.pixel_height() + TEXT_BAND_PX,
        )
    }

    /// Composite one label: QR block on top, `label_id` centred in the band below.
    pub fn encode(&self, content: &str, label_id: &str) -> Result<LabelImage> {
        let width = self.spec.pixel_width();
        let height = self.spec.pixel_height();

        let code = qr_symbol(content)?;
        let box_size = (width / MODULE_GRID).max(1);
        let modules = paint_modules(&code, box_size, QUIET_ZONE);
        let qr = stretch_to_rgb(&modules, width, height);

        let mut canvas = RgbImage::from_pixel(width, height + TEXT_BAND_PX, WHITE);
        paste(&mut canvas, &qr, 0, 0);

        let (text_width, _) = self.face.measure(label_id);
        let x = (width as i32 - text_width as i32).div_euclid(2);
        let y = (height + TEXT_OFFSET_PX) as i32;
        self.face.draw(&mut canvas, x, y, BLACK, label_id);

        tracing::debug!(
            label_id,
            version = ?code.version(),
            box_size,
            natural_px = modules.width(),
            "encoded label"
        );
        Ok(LabelImage(canvas))
    }

    pub fn encode_record(&self, record: &SampleRecord) -> Result<RenderedLabel> {
        let image = self.encode(&record.content, &record.label_id)?;
        Ok(RenderedLabel {
            label_id: record.label_id.clone(),
            image,
        })
    }

    /// Encode every record, in parallel, keeping input order.
    ///
    /// Nothing is returned unless all records succeed; the first failing record
    /// (by position) is reported with its index and identifier.
    pub fn encode_all(&self, records: &[SampleRecord]) -> Result<Vec<RenderedLabel>> {
        let results: Vec<Result<RenderedLabel>> = records
            .par_iter()
            .map(|record| self.encode_record(record))
            .collect();

        let mut labels = Vec::with_capacity(results.len());
        for (index, (result, record)) in results.into_iter().zip(records).enumerate() {
            labels.push(result.map_err(|err| err.for_record(index, &record.label_id))?);
        }
        tracing::info!(
            count = labels.len(),
            face = self.face.name(),
            "encoded label batch"
        );
        Ok(labels)
    }
}

/// Encode one label with the process-wide face.
pub fn encode(content: &str, label_id: &str, spec: LabelSpec) -> Result<LabelImage> {
    LabelEncoder::with_default_face(spec, None)?.encode(content, label_id)
}

/// Smallest symbol holding `content` at low error correction.
fn qr_symbol(content: &str) -> Result<QrCode> {
    if content.is_empty() {
        return Err(LabelError::InvalidInput("QR content is empty".into()));
    }
    QrCode::with_error_correction_level(content.as_bytes(), EcLevel::L).map_err(|err| match err {
        QrError::DataTooLong => LabelError::EncodingCapacityExceeded {
            len: content.len(),
        },
        other => LabelError::InvalidInput(format!("cannot encode {content:?}: {other}")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::image::BitmapFace;
    use pretty_assertions::assert_eq;
    use qrcode::Color;

    fn encoder(spec: LabelSpec) -> LabelEncoder {
        LabelEncoder::new(spec, Arc::new(BitmapFace::default())).unwrap()
    }

    /// Scan the QR block of a label back to its payload.
    fn decode(img: &LabelImage, qr_height: u32) -> String {
        let rgb = img.as_rgb();
        let (width, height) = (rgb.width() as usize, qr_height as usize);
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(width, height, |x, y| {
            rgb.get_pixel(x as u32, y as u32)[0]
        });
        let grids = prepared.detect_grids();
        assert_eq!(grids.len(), 1, "expected exactly one symbol");
        let (_, content) = grids[0].decode().unwrap();
        content
    }

    #[test]
    fn default_label_is_236_by_286() {
        let enc = encoder(LabelSpec::default());
        let img = enc.encode("SAMPLE001", "A1").unwrap();
        assert_eq!((img.width(), img.height()), (236, 286));
        assert_eq!(enc.label_size(), (236, 286));
    }

    #[test]
    fn dimensions_follow_footprint() {
        for (dpi, w, h) in [(300, 10.0, 20.0), (203, 25.0, 15.0), (600, 8.0, 8.0)] {
            let spec = LabelSpec::new(dpi, w, h);
            let img = encoder(spec).encode("X-42", "id").unwrap();
            let expect_w = (w / 25.4 * dpi as f64).round() as u32;
            let expect_h = (h / 25.4 * dpi as f64).round() as u32 + 50;
            assert_eq!((img.width(), img.height()), (expect_w, expect_h));
        }
    }

    #[test]
    fn encoding_is_deterministic() {
        let enc = encoder(LabelSpec::default());
        let a = enc.encode("SAMPLE002", "A2").unwrap();
        let b = enc.encode("SAMPLE002", "A2").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn modules_survive_stretching() {
        let enc = encoder(LabelSpec::default());
        let img = enc.encode("SAMPLE001", "A1").unwrap();
        let code = QrCode::with_error_correction_level("SAMPLE001", EcLevel::L).unwrap();
        let modules = code.width() as u32;
        let colors = code.to_colors();

        let box_size = 236 / MODULE_GRID;
        let natural = (modules + 2 * QUIET_ZONE) * box_size;
        let ratio = 236.0 / natural as f64;
        let sample = |m: u32| {
            let centre = ((m + QUIET_ZONE) * box_size) as f64 + box_size as f64 / 2.0;
            (centre * ratio) as u32
        };

        for my in 0..modules {
            for mx in 0..modules {
                let dark = img.as_rgb().get_pixel(sample(mx), sample(my))[0] < 128;
                let expected = colors[(my * modules + mx) as usize] == Color::Dark;
                assert_eq!(dark, expected, "module ({mx}, {my})");
            }
        }
    }

    #[test]
    fn label_scans_back_to_content() {
        let img = encoder(LabelSpec::default()).encode("SAMPLE001", "A1").unwrap();
        assert_eq!(decode(&img, 236), "SAMPLE001");
    }

    #[test]
    fn stretched_footprint_still_scans() {
        let spec = LabelSpec::new(300, 20.0, 12.0);
        let img = encoder(spec).encode("SAMPLE117", "B7").unwrap();
        assert_eq!(decode(&img, spec.pixel_height()), "SAMPLE117");
    }

    #[test]
    fn label_text_is_centred_below_code() {
        let enc = encoder(LabelSpec::default());
        let img = enc.encode("SAMPLE001", "HH").unwrap();
        let rgb = img.as_rgb();
        // "HH" is 22px wide at scale 2, so it spans columns 107..=128.
        let dark_cols: Vec<u32> = (0..rgb.width())
            .filter(|&x| (236..286).any(|y| rgb.get_pixel(x, y)[0] < 128))
            .collect();
        assert_eq!(dark_cols.first(), Some(&107));
        assert_eq!(dark_cols.last(), Some(&128));
        assert!((236..241).all(|y| (0..236).all(|x| rgb.get_pixel(x, y)[0] == 255)));
    }

    #[test]
    fn empty_content_is_invalid() {
        let err = encoder(LabelSpec::default()).encode("", "A1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn oversized_content_exceeds_capacity() {
        let content = "x".repeat(3000);
        let err = encoder(LabelSpec::default()).encode(&content, "big").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EncodingCapacityExceeded);
    }

    #[test]
    fn long_content_still_fits_footprint() {
        let content = "https://lims.example.org/samples/".repeat(4);
        let img = encoder(LabelSpec::default()).encode(&content, "L").unwrap();
        assert_eq!((img.width(), img.height()), (236, 286));
        assert_eq!(decode(&img, 236), content);
    }

    #[test]
    fn batch_reports_first_failing_record() {
        let records = vec![
            SampleRecord::new("SAMPLE001", "A1"),
            SampleRecord::new("", "A2"),
            SampleRecord::new("x".repeat(3000), "A3"),
        ];
        let err = encoder(LabelSpec::default()).encode_all(&records).unwrap_err();
        match &err {
            LabelError::Record { index, label_id, .. } => {
                assert_eq!(*index, 1);
                assert_eq!(label_id, "A2");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn batch_preserves_order() {
        let records: Vec<SampleRecord> = (1..=6)
            .map(|i| SampleRecord::new(format!("SAMPLE{i:03}"), format!("A{i}")))
            .collect();
        let labels = encoder(LabelSpec::default()).encode_all(&records).unwrap();
        let ids: Vec<&str> = labels.iter().map(|l| l.label_id.as_str()).collect();
        assert_eq!(ids, vec!["A1", "A2", "A3", "A4", "A5", "A6"]);
    }

    #[test]
    fn invalid_geometry_is_rejected_up_front() {
        let face: Arc<dyn LabelFace> = Arc::new(BitmapFace::default());
        assert!(LabelEncoder::new(LabelSpec::new(0, 12.0, 12.0), face.clone()).is_err());
        let err = LabelEncoder::new(LabelSpec::new(500, 12.0, 1.0e12), face)
            .err()
            .expect("oversized footprint accepted");
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
