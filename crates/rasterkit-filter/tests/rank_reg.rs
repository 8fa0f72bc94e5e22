//! Rank filter regression test

use rasterkit_core::{PixelBuffer, PixelFormat};
use rasterkit_filter::{max_filter, median_filter, min_filter};
use rasterkit_test::{RegParams, gradient_rgb, uniform_gray};

fn with_impulse(base: u8, w: u32, h: u32, x: u32, y: u32, v: u8) -> PixelBuffer {
    let buf = PixelBuffer::new(w, h, PixelFormat::Gray8).unwrap();
    let mut m = buf.try_into_mut().unwrap();
    for yy in 0..h {
        for xx in 0..w {
            m.set_gray_unchecked(xx, yy, base);
        }
    }
    m.set_gray_unchecked(x, y, v);
    m.into()
}

#[test]
fn rank_reg() {
    let mut rp = RegParams::new("rank");

    // --- Test 1: window 1 is the identity at every rank ---
    let pixs = gradient_rgb(12, 8);
    for out in [
        median_filter(&pixs, 1).expect("median w1"),
        min_filter(&pixs, 1).expect("min w1"),
        max_filter(&pixs, 1).expect("max w1"),
    ] {
        rp.compare_buffers(&pixs, &out);
    }

    // --- Test 2: median removes an isolated impulse ---
    let noisy = with_impulse(50, 9, 9, 4, 4, 255);
    let cleaned = median_filter(&noisy, 3).expect("median 3");
    rp.compare_buffers(&uniform_gray(9, 9, 50), &cleaned);

    // --- Test 3: min/max bracket the median ---
    let mins = min_filter(&noisy, 3).expect("min 3");
    let maxs = max_filter(&noisy, 3).expect("max 3");
    let mut ordered = true;
    for y in 0..9 {
        for x in 0..9 {
            let lo = mins.get_pixel_unchecked(x, y);
            let mid = cleaned.get_pixel_unchecked(x, y);
            let hi = maxs.get_pixel_unchecked(x, y);
            if !(lo <= mid && mid <= hi) {
                ordered = false;
            }
        }
    }
    rp.compare_values(1.0, if ordered { 1.0 } else { 0.0 }, 0.0);

    // --- Test 4: max dilates the impulse across the window ---
    rp.compare_values(255.0, maxs.get_pixel_unchecked(3, 3) as f64, 0.0);
    rp.compare_values(255.0, maxs.get_pixel_unchecked(5, 5) as f64, 0.0);
    rp.compare_values(50.0, maxs.get_pixel_unchecked(0, 0) as f64, 0.0);

    // --- Test 5: dimensions preserved for windows larger than the image ---
    let tiny = uniform_gray(2, 2, 9);
    let out = median_filter(&tiny, 7).expect("median 7");
    rp.compare_values(2.0, out.width() as f64, 0.0);
    rp.compare_values(2.0, out.height() as f64, 0.0);

    assert!(rp.cleanup(), "rank regression test failed");
}
