use fbg::math::{hsl_to_rgb, randf, rgb_to_hsl, Color};

fn close(a: u8, b: u8) -> bool {
    (a as i16 - b as i16).abs() <= 1
}

#[test]
fn test_rgb_hsl_rgb_round_trip() {
    for r in (0..=255u16).step_by(17) {
        for g in (0..=255u16).step_by(17) {
            for b in (0..=255u16).step_by(51) {
                let (r, g, b) = (r as u8, g as u8, b as u8);
                let hsl = rgb_to_hsl(r, g, b);
                let back = hsl_to_rgb(hsl.h, hsl.s, hsl.l);
                assert!(
                    close(back.r, r) && close(back.g, g) && close(back.b, b),
                    "({}, {}, {}) -> {:?} -> {:?}",
                    r, g, b, hsl, back
                );
            }
        }
    }
}

#[test]
fn test_hsl_rgb_hsl_round_trip() {
    for h in (0..360).step_by(15) {
        for &s in &[0.25f32, 0.5, 1.0] {
            for &l in &[0.25f32, 0.5, 0.75] {
                let c = hsl_to_rgb(h as f32, s, l);
                let back = hsl_to_rgb_back(c);
                let again = hsl_to_rgb(back.0, back.1, back.2);
                assert!(close(again.r, c.r) && close(again.g, c.g) && close(again.b, c.b));
                assert!((back.2 - l).abs() <= 1.0 / 255.0 + 1e-4, "lightness of {:?}", (h, s, l));
            }
        }
    }
}

fn hsl_to_rgb_back(c: Color) -> (f32, f32, f32) {
    let hsl = rgb_to_hsl(c.r, c.g, c.b);
    (hsl.h, hsl.s, hsl.l)
}

#[test]
fn test_zero_saturation_is_exact_gray() {
    for step in 0..=20 {
        let l = step as f32 / 20.0;
        let expected = (l * 255.0) as u8;
        assert_eq!(hsl_to_rgb(200.0, 0.0, l), Color::gray(expected));
    }
}

#[test]
fn test_randf_bounds() {
    let samples: Vec<f32> = (0..500).map(|_| randf(10.0, 20.0)).collect();
    assert!(samples.iter().all(|v| (10.0..20.0).contains(v)));
    // not all equal
    assert!(samples.iter().any(|&v| v != samples[0]));
}
