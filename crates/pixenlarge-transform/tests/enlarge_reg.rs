//! Enlargement regression test
//!
//! Enlarges every test image by a range of factors and checks the output
//! size, the header fields and every output pixel against its source pixel.

use pixenlarge_core::{Encoding, Raster};
use pixenlarge_io::{PnmReader, PnmWriter, read_raster_mem};
use pixenlarge_test::{RegParams, load_test_bytes, load_test_image};
use pixenlarge_transform::{
    EnlargePath, ReplicationPath, ScaleFactor, TransformError, enlarge, enlarge_mem,
    enlarge_raster, max_scale_factor,
};

const IMAGES: [&str; 6] = [
    "dots.pbm",
    "letter.pbm",
    "gradient.pgm",
    "deep.pgm",
    "colors.ppm",
    "alpha.pam",
];

/// Check that every pixel of `out` equals the source pixel it was copied from.
fn check_blocks(rp: &mut RegParams, source: &Raster, out: &Raster, factor: u32) {
    let mut mismatches = 0u32;
    for y in 0..out.height() {
        for x in 0..out.width() {
            if out.pixel(x, y) != source.pixel(x / factor, y / factor) {
                mismatches += 1;
            }
        }
    }
    rp.compare_values(0.0, f64::from(mismatches), 0.0);
}

#[test]
fn enlarge_reg() {
    let mut rp = RegParams::new("enlarge");

    for name in IMAGES {
        let bytes = load_test_bytes(name).expect("load bytes");
        let source = load_test_image(name).expect("load image");
        eprintln!(
            "=== {name}: {}x{} {:?} ===",
            source.width(),
            source.height(),
            source.header().format
        );

        for f in [1u32, 2, 3, 4, 5, 6, 8, 9] {
            let factor = ScaleFactor::new(f).expect("factor");
            let mut reader = PnmReader::new(bytes.as_slice());
            let mut writer = PnmWriter::new(Vec::new());
            let summary = enlarge(&mut reader, &mut writer, factor).expect("enlarge");
            let out = read_raster_mem(&writer.into_inner()).expect("decode output");

            rp.compare_values(f64::from(source.width() * f), f64::from(out.width()), 0.0);
            rp.compare_values(f64::from(source.height() * f), f64::from(out.height()), 0.0);
            rp.compare_values(
                f64::from(source.height() * f),
                summary.rows_written as f64,
                0.0,
            );
            rp.compare_values(
                f64::from(source.header().maxval),
                f64::from(out.header().maxval),
                0.0,
            );
            rp.compare_values(
                f64::from(source.header().depth),
                f64::from(out.header().depth),
                0.0,
            );
            check_blocks(&mut rp, &source, &out, f);

            // the in-memory path agrees with the stream
            let in_memory = enlarge_raster(&source, factor).expect("enlarge raster");
            rp.compare_rasters(&out, &in_memory);
        }

        // display mode keeps a x4 copy of each image
        let big = enlarge_raster(&source, ScaleFactor::new(4).expect("factor"))
            .expect("enlarge raster");
        rp.write_raster_and_check(&big, Encoding::Raw)
            .expect("write enlarged");
    }

    // packed images take the table paths where they exist
    let bytes = load_test_bytes("dots.pbm").expect("load bytes");
    let expected_paths = [
        (1, ReplicationPath::Identity),
        (2, ReplicationPath::Double),
        (3, ReplicationPath::Triple),
        (4, ReplicationPath::General),
        (5, ReplicationPath::Quintuple),
        (7, ReplicationPath::General),
    ];
    for (f, path) in expected_paths {
        let mut reader = PnmReader::new(bytes.as_slice());
        let mut writer = PnmWriter::new(Vec::new());
        let summary = enlarge(&mut reader, &mut writer, ScaleFactor::new(f).expect("factor"))
            .expect("enlarge");
        rp.compare_values(
            1.0,
            (summary.path == EnlargePath::Packed(path)) as u8 as f64,
            0.0,
        );
    }

    // plain output of a plain input by 1 reproduces the normalized file
    let letter = load_test_bytes("letter.pbm").expect("load bytes");
    let same = enlarge_mem(&letter, ScaleFactor::ONE, Encoding::Plain).expect("enlarge");
    let expected = b"P1\n7 7\n\
                     0001000\n0010100\n0100010\n0111110\n1000001\n1000001\n1000001\n";
    rp.compare_strings(expected, &same);

    // one factor past the limit is rejected before any output
    let max = max_scale_factor(12, 5);
    let mut reader = PnmReader::new(bytes.as_slice());
    let mut writer = PnmWriter::new(Vec::new());
    let result = enlarge(
        &mut reader,
        &mut writer,
        ScaleFactor::new(max + 1).expect("factor"),
    );
    rp.compare_values(
        1.0,
        matches!(result, Err(TransformError::DimensionOverflow { .. })) as u8 as f64,
        0.0,
    );
    rp.compare_values(0.0, writer.into_inner().len() as f64, 0.0);

    assert!(rp.cleanup(), "enlarge regression test failed");
}
