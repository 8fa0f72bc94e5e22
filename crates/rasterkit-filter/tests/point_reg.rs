//! Point-operation regression test

use rasterkit_filter::point::{
    DEFAULT_BRIGHTNESS_DELTA, DEFAULT_CONTRAST, DEFAULT_GAMMA, adjust_brightness,
    adjust_contrast, gamma_correct, invert,
};
use rasterkit_test::{RegParams, gradient_rgb, uniform_rgb};

#[test]
fn point_reg() {
    let mut rp = RegParams::new("point");

    let pixs = gradient_rgb(16, 16);

    // --- Test 1: invert is an involution ---
    let twice = invert(&invert(&pixs));
    rp.compare_buffers(&pixs, &twice);

    // --- Test 2: identity parameters are no-ops ---
    rp.compare_buffers(&pixs, &adjust_brightness(&pixs, 0));
    rp.compare_buffers(&pixs, &adjust_contrast(&pixs, 0.0).expect("contrast 0"));
    rp.compare_buffers(&pixs, &gamma_correct(&pixs, 1.0).expect("gamma 1"));

    // --- Test 3: defaults stay in range and preserve dimensions ---
    let b = adjust_brightness(&pixs, DEFAULT_BRIGHTNESS_DELTA);
    let c = adjust_contrast(&pixs, DEFAULT_CONTRAST).expect("default contrast");
    let g = gamma_correct(&pixs, DEFAULT_GAMMA).expect("default gamma");
    for out in [&b, &c, &g] {
        rp.compare_values(pixs.width() as f64, out.width() as f64, 0.0);
        rp.compare_values(pixs.height() as f64, out.height() as f64, 0.0);
    }

    // --- Test 4: brightness on a uniform field shifts it exactly ---
    let flat = uniform_rgb(4, 4, 100, 150, 200);
    let shifted = adjust_brightness(&flat, 40);
    rp.compare_buffers(&uniform_rgb(4, 4, 140, 190, 240), &shifted);
    let clamped = adjust_brightness(&flat, 100);
    rp.compare_buffers(&uniform_rgb(4, 4, 200, 250, 255), &clamped);

    // --- Test 5: gamma > 1 darkens midtones, < 1 lightens them ---
    let mid = uniform_rgb(2, 2, 128, 128, 128);
    let darker = gamma_correct(&mid, 2.0).expect("gamma 2");
    let lighter = gamma_correct(&mid, 0.5).expect("gamma 0.5");
    let (dr, _, _, _) = darker.get_rgba(0, 0).unwrap();
    let (lr, _, _, _) = lighter.get_rgba(0, 0).unwrap();
    rp.compare_values(1.0, if dr < 128 { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(1.0, if lr > 128 { 1.0 } else { 0.0 }, 0.0);

    assert!(rp.cleanup(), "point regression test failed");
}
