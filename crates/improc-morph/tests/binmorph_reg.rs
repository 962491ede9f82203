//! Binary morphology regression test
//!
//! Checks erosion and dilation against a pixel-by-pixel reference, the
//! containment and disjointness laws of the derived operators, opening
//! idempotence, size rejection and the pack/unpack round trip.
//!
//! Run with:
//! ```
//! cargo test -p improc-morph --test binmorph_reg
//! ```

use improc_core::{BitImage, Error, Image};
use improc_morph::{
    MorphError, and_bits, and_not_bits, bottom_hat, close, dilate, dilate_n, erode, erode_n,
    filter_4, filter_8, open, top_hat,
};
use improc_test::{RegParams, bit_image_with_rects, random_bit_image, random_gray_image};

const WIDTHS: [u32; 6] = [9, 13, 16, 17, 31, 40];

/// Cross-kernel erosion/dilation one pixel at a time; outside is background.
fn reference(img: &BitImage, erode: bool) -> BitImage {
    let (w, h) = img.dimensions();
    let mut out = BitImage::new(w, h).unwrap();
    let at = |x: i64, y: i64| -> bool {
        x >= 0 && y >= 0 && img.get_pixel(x as u32, y as u32) == Some(true)
    };
    for y in 0..h as i64 {
        for x in 0..w as i64 {
            let cross = [at(x, y), at(x - 1, y), at(x + 1, y), at(x, y - 1), at(x, y + 1)];
            let value = if erode {
                cross.iter().all(|&p| p)
            } else {
                cross.iter().any(|&p| p)
            };
            if value {
                out.set_pixel(x as u32, y as u32, true).unwrap();
            }
        }
    }
    out
}

/// Whether every pixel of `inner` is also set in `outer`.
fn is_subset(inner: &BitImage, outer: &BitImage) -> bool {
    and_not_bits(inner, outer).unwrap().is_empty()
}

#[test]
fn binmorph_reg() {
    let mut rp = RegParams::new("binmorph");

    eprintln!("  Testing erosion and dilation against reference");
    for (i, &w) in WIDTHS.iter().enumerate() {
        let img = random_bit_image(w, 7, 0.6, 100 + i as u64).unwrap();
        rp.show_bits("source", &img);
        rp.compare_bits(&reference(&img, true), &erode(&img).unwrap());
        rp.compare_bits(&reference(&img, false), &dilate(&img).unwrap());
    }

    eprintln!("  Testing erosion <= source <= dilation");
    for (i, &w) in WIDTHS.iter().enumerate() {
        let img = random_bit_image(w, 11, 0.5, 200 + i as u64).unwrap();
        for n in 1..=3 {
            let eroded = erode_n(&img, n).unwrap();
            let dilated = dilate_n(&img, n).unwrap();
            rp.compare_values(1.0, is_subset(&eroded, &img) as u8 as f64, 0.0);
            rp.compare_values(1.0, is_subset(&img, &dilated) as u8 as f64, 0.0);
            rp.compare_values(1.0, is_subset(&open(&img, n).unwrap(), &img) as u8 as f64, 0.0);
        }
    }

    eprintln!("  Testing repeated steps equal N-times operators");
    let img = random_bit_image(23, 9, 0.7, 7).unwrap();
    let twice = erode(&erode(&img).unwrap()).unwrap();
    rp.compare_bits(&twice, &erode_n(&img, 2).unwrap());
    let twice = dilate(&dilate(&img).unwrap()).unwrap();
    rp.compare_bits(&twice, &dilate_n(&img, 2).unwrap());

    eprintln!("  Testing top-hat / bottom-hat disjointness");
    for (i, &w) in WIDTHS.iter().enumerate() {
        let img = random_bit_image(w, 12, 0.45, 300 + i as u64).unwrap();
        for n in 1..=2 {
            let th = top_hat(&img, n).unwrap();
            let bh = bottom_hat(&img, n).unwrap();
            let both = and_bits(&th, &bh).unwrap();
            rp.compare_values(0.0, both.count_foreground() as f64, 0.0);
            rp.compare_values(1.0, is_subset(&th, &img) as u8 as f64, 0.0);
            rp.compare_values(0.0, and_bits(&bh, &img).unwrap().count_foreground() as f64, 0.0);
        }
    }

    eprintln!("  Testing opening idempotence on thick shapes");
    let shapes = bit_image_with_rects(
        40,
        20,
        &[(1, 1, 5, 4), (8, 2, 3, 12), (8, 11, 14, 3), (26, 4, 10, 10), (30, 15, 6, 3)],
    )
    .unwrap();
    let opened = open(&shapes, 1).unwrap();
    rp.show_bits("opened", &opened);
    rp.compare_bits(&opened, &open(&opened, 1).unwrap());

    eprintln!("  Testing closing fills one-pixel gaps");
    let gapped = bit_image_with_rects(24, 9, &[(2, 2, 8, 5), (11, 2, 8, 5)]).unwrap();
    let closed = close(&gapped, 1).unwrap();
    rp.compare_values(1.0, closed.get_pixel(10, 4).unwrap_or(false) as u8 as f64, 0.0);
    rp.compare_values(1.0, is_subset(&gapped, &closed) as u8 as f64, 0.0);

    assert!(rp.cleanup(), "binmorph regression test failed");
}

#[test]
fn binmorph_size_reg() {
    let mut rp = RegParams::new("binmorph_size");

    for (w, h) in [(8, 3), (9, 2), (1, 1), (8, 100)] {
        let img = BitImage::new(w, h).unwrap();
        let results = [
            erode(&img),
            dilate(&img),
            erode_n(&img, 2),
            dilate_n(&img, 2),
            open(&img, 1),
            close(&img, 1),
            top_hat(&img, 1),
            bottom_hat(&img, 1),
            filter_4(&img),
            filter_8(&img),
        ];
        let rejected = results
            .iter()
            .filter(|r| matches!(r, Err(MorphError::Core(Error::TooSmall { .. }))))
            .count();
        rp.compare_values(results.len() as f64, rejected as f64, 0.0);
    }

    let img = BitImage::new(9, 3).unwrap();
    rp.compare_values(1.0, erode(&img).is_ok() as u8 as f64, 0.0);
    for r in [erode_n(&img, 0), dilate_n(&img, 0), open(&img, 0), close(&img, 0)] {
        rp.compare_values(
            1.0,
            matches!(r, Err(MorphError::InvalidIterations(0))) as u8 as f64,
            0.0,
        );
    }

    assert!(rp.cleanup(), "binmorph_size regression test failed");
}

#[test]
fn pack_reg() {
    let mut rp = RegParams::new("pack");

    for (i, w) in (2..=17).chain([24, 33, 64]).enumerate() {
        let gray = random_gray_image(w, 3, 400 + i as u64).unwrap();
        for threshold in [0.0, 127.5, 200.0] {
            let bits = BitImage::pack(&gray, threshold).unwrap();
            let round = bits.unpack().unwrap();
            let expected: Vec<u8> = gray
                .as_u8()
                .unwrap()
                .iter()
                .map(|&v| if v as f64 > threshold { 255 } else { 0 })
                .collect();
            let actual = round.as_u8().unwrap();
            let mismatches = expected.iter().zip(actual).filter(|(e, a)| e != a).count();
            rp.compare_values(0.0, mismatches as f64, 0.0);

            // padding bits past the last column stay clear
            let mask = bits.last_byte_mask();
            let stray = (0..bits.height())
                .filter(|&y| bits.row(y)[bits.stride() - 1] & !mask != 0)
                .count();
            rp.compare_values(0.0, stray as f64, 0.0);
        }
    }

    let small = Image::from_u8(&[255], 1, 1).unwrap();
    rp.compare_values(1.0, BitImage::pack(&small, 0.0).is_err() as u8 as f64, 0.0);

    assert!(rp.cleanup(), "pack regression test failed");
}
