use std::io::Cursor;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use qrlabel::{
    BitmapFace, Columns, ErrorKind, LabelEncoder, LabelError, LabelSpec, OutputMode, SampleRecord,
    read_records, run_batch, tile,
};

fn encoder() -> LabelEncoder {
    LabelEncoder::new(LabelSpec::default(), Arc::new(BitmapFace::default())).unwrap()
}

fn sample_records() -> Vec<SampleRecord> {
    vec![
        SampleRecord::new("SAMPLE001", "A1"),
        SampleRecord::new("SAMPLE002", "A2"),
        SampleRecord::new("SAMPLE003", "A3"),
    ]
}

#[test]
fn three_samples_make_two_sheets() {
    let labels = encoder().encode_all(&sample_records()).unwrap();
    assert_eq!(labels.len(), 3);
    for label in &labels {
        assert_eq!((label.image.width(), label.image.height()), (236, 286));
    }

    let sheets = tile(&labels).unwrap();
    assert_eq!(sheets.len(), 2);
    for sheet in &sheets {
        assert_eq!(sheet.image.dimensions(), (482, 286));
    }
    let right_half_blank = sheets[1]
        .image
        .enumerate_pixels()
        .filter(|(x, _, _)| *x >= 246)
        .all(|(_, _, p)| p.0 == [255, 255, 255]);
    assert!(right_half_blank);
}

#[test]
fn csv_to_archive() {
    let csv = "Sample Name,Code_ID\nSAMPLE001,A1\nSAMPLE002,A2\nSAMPLE003,A3\n";
    let records = read_records(csv.as_bytes(), &Columns::default()).unwrap();
    let mode = OutputMode::Archive { preview_count: 4 };
    let assembly = run_batch(&encoder(), &records, mode.assembler().as_ref()).unwrap();

    assert_eq!(assembly.outputs.len(), 1);
    assert_eq!(assembly.outputs[0].name, "qrcodes.zip");
    assert_eq!(assembly.previews.len(), 3);

    let zip = zip::ZipArchive::new(Cursor::new(assembly.outputs[0].bytes.clone())).unwrap();
    let mut names: Vec<&str> = zip.file_names().collect();
    names.sort();
    assert_eq!(names, vec!["qrcode_A1.png", "qrcode_A2.png", "qrcode_A3.png"]);
}

#[test]
fn tile_mode_names_sheets_sequentially() {
    let records: Vec<SampleRecord> = (1..=5)
        .map(|i| SampleRecord::new(format!("SAMPLE{i:03}"), format!("A{i}")))
        .collect();
    let assembly = run_batch(&encoder(), &records, OutputMode::Tile.assembler().as_ref()).unwrap();
    let names: Vec<&str> = assembly.outputs.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "combined_qrcode_1.png",
            "combined_qrcode_2.png",
            "combined_qrcode_3.png"
        ]
    );
    let sheet = image::load_from_memory(&assembly.outputs[2].bytes).unwrap();
    assert_eq!((sheet.width(), sheet.height()), (482, 286));
}

#[test]
fn empty_sheet_cannot_be_tiled() {
    let err = run_batch(&encoder(), &[], OutputMode::Tile.assembler().as_ref()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyInput);
}

#[test]
fn failing_record_aborts_batch() {
    let mut records = sample_records();
    records.push(SampleRecord::new("y".repeat(4000), "TOO-LONG"));
    let mode = OutputMode::Archive { preview_count: 4 };
    let err = run_batch(&encoder(), &records, mode.assembler().as_ref()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EncodingCapacityExceeded);
    match err {
        LabelError::Record { index, label_id, .. } => {
            assert_eq!(index, 3);
            assert_eq!(label_id, "TOO-LONG");
        }
        other => panic!("unexpected error: {other}"),
    }
}
