//! Connected component labeling regression test
//!
//! Checks 4-connected labeling against a flood-fill reference on random
//! images, the component tables, partition independence of the box merge
//! and the helpers built on label arrays.
//!
//! Run with:
//! ```
//! cargo test -p improc-region --test label_reg
//! ```

use std::collections::VecDeque;

use improc_core::{BitImage, Error};
use improc_morph::filter_4;
use improc_region::{
    ConnectedComponents, RegionError, extract_component, filter_by_area, label_4_connected,
    label_4_connected_labels, render_components,
};
use improc_test::{RegParams, bit_image_from_rows, bit_image_with_rects, random_bit_image};

/// Flood-fill labeling in raster order of each component's first pixel.
fn reference_labels(img: &BitImage) -> Vec<usize> {
    let (w, h) = img.dimensions();
    let (w, h) = (w as usize, h as usize);
    let mut labels = vec![0usize; w * h];
    let mut next = 0;
    let mut queue = VecDeque::new();
    for start in 0..w * h {
        let (sx, sy) = ((start % w) as u32, (start / w) as u32);
        if labels[start] != 0 || !img.get_pixel_unchecked(sx, sy) {
            continue;
        }
        next += 1;
        labels[start] = next;
        queue.push_back(start);
        while let Some(i) = queue.pop_front() {
            let (x, y) = (i % w, i / w);
            let mut neighbors = Vec::with_capacity(4);
            if x > 0 {
                neighbors.push(i - 1);
            }
            if x + 1 < w {
                neighbors.push(i + 1);
            }
            if y > 0 {
                neighbors.push(i - w);
            }
            if y + 1 < h {
                neighbors.push(i + w);
            }
            for j in neighbors {
                let on = img.get_pixel_unchecked((j % w) as u32, (j / w) as u32);
                if on && labels[j] == 0 {
                    labels[j] = next;
                    queue.push_back(j);
                }
            }
        }
    }
    labels
}

#[test]
fn label_reg() {
    let mut rp = RegParams::new("label");

    eprintln!("  Testing two separated squares");
    let img = bit_image_with_rects(32, 16, &[(2, 2, 3, 3), (20, 9, 3, 3)]).unwrap();
    let (labels, cc) = label_4_connected(&img).unwrap();
    rp.compare_values(3.0, cc.count() as f64, 0.0);
    let expected = [(2, 4, 2, 4), (20, 22, 9, 11)];
    for (label, &(x0, x1, y0, y1)) in (1..).zip(&expected) {
        let b = cc.get(label).unwrap();
        rp.compare_values(9.0, b.area as f64, 0.0);
        rp.compare_values(x0 as f64, b.xmin as f64, 0.0);
        rp.compare_values(x1 as f64, b.xmax as f64, 0.0);
        rp.compare_values(y0 as f64, b.ymin as f64, 0.0);
        rp.compare_values(y1 as f64, b.ymax as f64, 0.0);
    }
    rp.compare_values(0.0, labels.get(0, 0).unwrap_or(99) as f64, 0.0);

    eprintln!("  Testing diagonal neighbours");
    let diag = bit_image_from_rows(&[
        "............",
        ".#..........",
        "..#.....##..",
        "........##..",
        "..........##",
        "..........##",
    ])
    .unwrap();
    let (labels, cc) = label_4_connected(&diag).unwrap();
    // single diagonal pixels have no edge neighbour, so the filter_4 pass
    // in front of labeling turns them into background; blocks touching at
    // a corner show the 4-connected separation instead
    rp.compare_values(0.0, labels.get(1, 1).unwrap_or(99) as f64, 0.0);
    rp.compare_values(0.0, labels.get(2, 2).unwrap_or(99) as f64, 0.0);
    rp.compare_values(2.0, cc.num_components() as f64, 0.0);
    let a = labels.get(9, 3).unwrap_or(0);
    let b = labels.get(10, 4).unwrap_or(0);
    rp.compare_values(1.0, (a != 0 && b != 0 && a != b) as u8 as f64, 0.0);

    eprintln!("  Testing empty image");
    let empty = BitImage::new(40, 10).unwrap();
    let (labels, cc) = label_4_connected(&empty).unwrap();
    rp.compare_values(1.0, cc.count() as f64, 0.0);
    rp.compare_values(0.0, labels.max_label() as f64, 0.0);

    eprintln!("  Testing spiral");
    let spiral = bit_image_from_rows(&[
        "##########....",
        "#........#....",
        "#.######.#....",
        "#.#....#.#....",
        "#.#.##.#.#..##",
        "#.#..#...#..##",
        "#.####...#....",
        "#........#....",
        "##########....",
    ])
    .unwrap();
    let (labels, cc) = label_4_connected(&spiral).unwrap();
    rp.compare_values(3.0, cc.num_components() as f64, 0.0);
    let outer = cc.get(1).unwrap();
    rp.compare_values(34.0, outer.area as f64, 0.0);
    rp.compare_values(18.0, cc.get(2).unwrap().area as f64, 0.0);
    rp.compare_values(2.0, labels.get(4, 4).unwrap_or(0) as f64, 0.0);
    rp.compare_values(3.0, labels.get(12, 4).unwrap_or(0) as f64, 0.0);

    assert!(rp.cleanup(), "label regression test failed");
}

#[test]
fn label_random_reg() {
    let mut rp = RegParams::new("label_random");

    for (i, (w, h)) in [(9, 3), (16, 8), (31, 17), (64, 40), (100, 33)]
        .into_iter()
        .enumerate()
    {
        for density in [0.3, 0.55, 0.8] {
            let img = random_bit_image(w, h, density, 500 + i as u64).unwrap();
            let (labels, cc) = label_4_connected(&img).unwrap();

            let filtered = filter_4(&img).unwrap();
            rp.compare_labels(&reference_labels(&filtered), labels.as_slice());
            rp.compare_labels(
                labels.as_slice(),
                label_4_connected_labels(&img).unwrap().as_slice(),
            );

            let total: u64 = cc.iter().map(|(_, b)| b.area).sum();
            rp.compare_values(filtered.count_foreground() as f64, total as f64, 0.0);
            rp.compare_values((labels.max_label() + 1) as f64, cc.count() as f64, 0.0);

            for rows in [1, 2, 5, h as usize, usize::MAX] {
                let other = ConnectedComponents::from_labels_partitioned(&labels, rows).unwrap();
                rp.compare_values(1.0, (other == cc) as u8 as f64, 0.0);
            }
        }
    }

    assert!(rp.cleanup(), "label_random regression test failed");
}

#[test]
fn label_helpers_reg() {
    let mut rp = RegParams::new("label_helpers");

    let img = bit_image_with_rects(
        48,
        20,
        &[(1, 1, 2, 2), (6, 1, 5, 5), (14, 3, 12, 2), (30, 2, 8, 14), (1, 10, 20, 1)],
    )
    .unwrap();
    let (labels, cc) = label_4_connected(&img).unwrap();
    rp.compare_values(5.0, cc.num_components() as f64, 0.0);

    let mut extracted = 0;
    for (label, b) in cc.iter() {
        let part = extract_component(&labels, label).unwrap();
        rp.compare_values(b.area as f64, part.count_foreground() as f64, 0.0);
        let outside = improc_morph::and_not_bits(&part, &img).unwrap();
        rp.compare_values(0.0, outside.count_foreground() as f64, 0.0);
        extracted += part.count_foreground();
    }
    rp.compare_values(img.count_foreground() as f64, extracted as f64, 0.0);
    rp.compare_bits(&img, &filter_by_area(&labels, &cc, 0, u64::MAX).unwrap());

    let large = filter_by_area(&labels, &cc, 20, 100).unwrap();
    // the 5x5 block, the 12x2 bar, the 20x1 line; the 8x14 block is too big
    rp.compare_values((25 + 24 + 20) as f64, large.count_foreground() as f64, 0.0);
    rp.compare_values(0.0, large.get_pixel(31, 5).unwrap_or(true) as u8 as f64, 0.0);

    let colored = render_components(&labels).unwrap();
    let black = (0..20)
        .flat_map(|y| (0..48).map(move |x| (x, y)))
        .filter(|&(x, y)| colored.get_rgb(x, y) == Some([0, 0, 0]))
        .count();
    rp.compare_values(
        (48 * 20) as f64 - img.count_foreground() as f64,
        black as f64,
        0.0,
    );

    let small = BitImage::new(8, 20).unwrap();
    rp.compare_values(
        1.0,
        matches!(
            label_4_connected(&small),
            Err(RegionError::Core(Error::TooSmall { .. }))
        ) as u8 as f64,
        0.0,
    );

    assert!(rp.cleanup(), "label_helpers regression test failed");
}
