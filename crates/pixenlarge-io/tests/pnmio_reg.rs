//! Netpbm I/O regression test
//!
//! Reads every test image, writes it back raw and plain, and checks that
//! the pixels survive each round trip.

use pixenlarge_core::{Encoding, PixelFormat, PnmFormat};
use pixenlarge_io::{
    PnmReader, RasterReader, detect_format, read_header_mem, read_raster_mem, write_raster_mem,
};
use pixenlarge_test::{RegParams, load_test_bytes, load_test_image, test_data_path};

#[test]
fn pnmio_reg() {
    let mut rp = RegParams::new("pnmio");

    let images = [
        ("dots.pbm", PnmFormat::Pbm, Encoding::Raw, 12, 5),
        ("letter.pbm", PnmFormat::Pbm, Encoding::Plain, 7, 7),
        ("gradient.pgm", PnmFormat::Pgm, Encoding::Plain, 4, 3),
        ("deep.pgm", PnmFormat::Pgm, Encoding::Raw, 3, 2),
        ("colors.ppm", PnmFormat::Ppm, Encoding::Raw, 3, 2),
        ("alpha.pam", PnmFormat::Pam, Encoding::Raw, 2, 2),
    ];

    for (name, format, encoding, width, height) in images {
        eprintln!("=== {name} ===");
        let (detected, detected_encoding) =
            detect_format(test_data_path(name)).expect("detect format");
        rp.compare_values(1.0, (detected == format) as u8 as f64, 0.0);
        rp.compare_values(1.0, (detected_encoding == encoding) as u8 as f64, 0.0);

        let raster = load_test_image(name).expect("load test image");
        rp.compare_values(width as f64, raster.width() as f64, 0.0);
        rp.compare_values(height as f64, raster.height() as f64, 0.0);

        rp.write_raster_and_check(&raster, Encoding::Raw)
            .expect("raw round trip");
        if format != PnmFormat::Pam {
            rp.write_raster_and_check(&raster, Encoding::Plain)
                .expect("plain round trip");
        }
    }

    // raw files written back raw are byte-identical apart from comments
    for name in ["deep.pgm", "colors.ppm", "alpha.pam"] {
        let bytes = load_test_bytes(name).expect("load bytes");
        let raster = read_raster_mem(&bytes).expect("decode");
        let written = write_raster_mem(&raster, Encoding::Raw).expect("encode");
        rp.compare_strings(&bytes, &written);
    }

    // plain and raw encodings of the same image decode to the same pixels
    let plain = load_test_image("letter.pbm").expect("load letter.pbm");
    let raw_bytes = write_raster_mem(&plain, Encoding::Raw).expect("encode raw");
    let (header, _) = read_header_mem(&raw_bytes).expect("raw header");
    rp.compare_values(1.0, (header.pixel_format() == PixelFormat::PackedBit) as u8 as f64, 0.0);
    let raw = read_raster_mem(&raw_bytes).expect("decode raw");
    rp.compare_rasters(&plain, &raw);

    // the letter A: apex at (3, 0), crossbar on row 3
    rp.compare_values(1.0, f64::from(plain.pixel(3, 0).expect("apex")[0]), 0.0);
    rp.compare_values(0.0, f64::from(plain.pixel(0, 0).expect("corner")[0]), 0.0);
    for x in 1..6 {
        rp.compare_values(1.0, f64::from(plain.pixel(x, 3).expect("crossbar")[0]), 0.0);
    }

    // 16-bit samples keep their full range
    let deep = load_test_image("deep.pgm").expect("load deep.pgm");
    rp.compare_values(65535.0, f64::from(deep.pixel(2, 0).expect("max")[0]), 0.0);
    rp.compare_values(4660.0, f64::from(deep.pixel(0, 1).expect("0x1234")[0]), 0.0);

    // streaming reader stops cleanly at a short raster
    let bytes = load_test_bytes("colors.ppm").expect("load bytes");
    let mut reader = PnmReader::new(&bytes[..bytes.len() - 1]);
    let header = reader.read_header().expect("header");
    let mut row = vec![0; header.samples_per_row()];
    rp.compare_values(1.0, reader.read_sample_row(&mut row).is_ok() as u8 as f64, 0.0);
    rp.compare_values(1.0, reader.read_sample_row(&mut row).is_err() as u8 as f64, 0.0);

    assert!(rp.cleanup(), "pnmio regression test failed");
}
