//! Kernel file format regression test
//!
//! Covers the persisted text layout, parse failures, and the caller-side
//! fallback policy on a failed load.

use rasterkit_filter::{FilterError, Kernel};
use rasterkit_test::RegParams;

#[test]
fn kernel_reg() {
    let mut rp = RegParams::new("kernel");

    // --- Test 1: parse the documented layout ---
    let text = "3 3\n\
                0 -1 0\n\
                -1 5 -1\n\
                0 -1 0\n\
                1\n\
                0\n\
                1 1\n";
    let parsed = Kernel::parse(text).expect("parse sharpen");
    rp.compare_values(1.0, if parsed == Kernel::sharpen_3() { 1.0 } else { 0.0 }, 0.0);

    // --- Test 2: serialize/parse round-trip for every named kernel ---
    for kernel in [
        Kernel::box_blur_3(),
        Kernel::gaussian_5(),
        Kernel::sharpen_3(),
        Kernel::edge_detect_3(),
        Kernel::emboss_3(),
    ] {
        let reparsed = Kernel::parse(&kernel.to_text()).expect("reparse");
        rp.compare_values(1.0, if reparsed == kernel { 1.0 } else { 0.0 }, 0.0);
    }

    // --- Test 3: save/load through a file ---
    let path = std::env::temp_dir().join("rasterkit_kernel_reg.flt");
    let kernel = Kernel::new(2, 3, &[vec![1, 2, 1], vec![2, 4, 2]], 12, 0, 1, 1).expect("build");
    kernel.save(&path).expect("save");
    let loaded = Kernel::load(&path).expect("load");
    let _ = std::fs::remove_file(&path);
    rp.compare_values(1.0, if loaded == kernel { 1.0 } else { 0.0 }, 0.0);

    // --- Test 4: failure taxonomy ---
    let missing = Kernel::load("/definitely/not/here.flt");
    rp.compare_values(
        1.0,
        matches!(missing, Err(FilterError::Io(_))) as i32 as f64,
        0.0,
    );
    let truncated = Kernel::parse("3 3\n1 1 1\n");
    rp.compare_values(
        1.0,
        matches!(truncated, Err(FilterError::Parse(_))) as i32 as f64,
        0.0,
    );
    let garbled = Kernel::parse("2 2\na b\nc d\n1\n0\n0 0\n");
    rp.compare_values(
        1.0,
        matches!(garbled, Err(FilterError::Parse(_))) as i32 as f64,
        0.0,
    );

    // --- Test 5: fallback policy lives with the caller ---
    let kernel = Kernel::load("/definitely/not/here.flt").unwrap_or_else(|_| Kernel::box_blur_3());
    rp.compare_values(1.0, if kernel == Kernel::box_blur_3() { 1.0 } else { 0.0 }, 0.0);

    assert!(rp.cleanup(), "kernel regression test failed");
}
