//! Utility types shared across the overlay engine

mod errors;

pub use errors::{OverlayError, Result};

/// Round to one decimal place, normalizing `-0.0` to `0.0`
#[must_use]
pub fn round_tenth(value: f32) -> f32 {
    (value * 10.0).round() / 10.0 + 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_tenths() {
        assert_eq!(round_tenth(2.9999), 3.0);
        assert_eq!(round_tenth(1.04), 1.0);
        assert_eq!(round_tenth(1.06), 1.1);
        assert!(round_tenth(-0.01).is_sign_positive());
    }
}
