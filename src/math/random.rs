use rand::Rng;

/// Pseudo random float in `[min, max)`; returns `min` for an empty range
pub fn randf(min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rand::thread_rng().gen_range(min..max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn randf_stays_in_range() {
        for _ in 0..1000 {
            let v = randf(-2.0, 3.0);
            assert!((-2.0..3.0).contains(&v));
        }
    }

    #[test]
    fn randf_empty_range() {
        assert_eq!(randf(4.0, 4.0), 4.0);
        assert_eq!(randf(5.0, 1.0), 5.0);
    }
}
