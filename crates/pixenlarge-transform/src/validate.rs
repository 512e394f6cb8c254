//! Scale factor and output dimension checks
//!
//! Output width and height are `width * factor` and `height * factor`.
//! Both are used directly as header fields and buffer sizes, so the factor
//! is checked against the input size before anything is allocated or
//! written.

use crate::{TransformError, TransformResult};
use pixenlarge_core::MAX_DIMENSION;
use std::fmt;
use std::num::NonZeroU32;

/// Integer magnification applied identically to both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScaleFactor(NonZeroU32);

impl ScaleFactor {
    /// Factor 1, the identity
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a scale factor.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidScaleFactor`] if `factor` is 0.
    pub fn new(factor: u32) -> TransformResult<Self> {
        NonZeroU32::new(factor)
            .map(Self)
            .ok_or(TransformError::InvalidScaleFactor(factor))
    }

    /// Get the factor as an integer.
    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for ScaleFactor {
    type Error = TransformError;

    fn try_from(factor: u32) -> TransformResult<Self> {
        Self::new(factor)
    }
}

impl fmt::Display for ScaleFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Largest factor that keeps both output dimensions within
/// [`MAX_DIMENSION`].
pub fn max_scale_factor(width: u32, height: u32) -> u32 {
    MAX_DIMENSION / width.max(height).max(1)
}

/// Check that `factor` can enlarge a `width` x `height` image.
///
/// Accepts exactly when `factor * max(width, height) <= MAX_DIMENSION`.
///
/// # Errors
///
/// Returns [`TransformError::DimensionOverflow`] naming the largest
/// acceptable factor otherwise.
pub fn validate_dimensions(width: u32, height: u32, factor: ScaleFactor) -> TransformResult<()> {
    let max_factor = max_scale_factor(width, height);
    if factor.get() > max_factor {
        return Err(TransformError::DimensionOverflow {
            factor: factor.get(),
            width,
            height,
            max_factor,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factor(n: u32) -> ScaleFactor {
        ScaleFactor::new(n).unwrap()
    }

    #[test]
    fn test_scale_factor_rejects_zero() {
        assert!(matches!(
            ScaleFactor::new(0),
            Err(TransformError::InvalidScaleFactor(0))
        ));
        assert_eq!(ScaleFactor::try_from(7).unwrap().get(), 7);
        assert_eq!(ScaleFactor::ONE.get(), 1);
        assert_eq!(factor(12).to_string(), "12");
    }

    #[test]
    fn test_boundary() {
        let (w, h) = (1000, 300);
        let max = max_scale_factor(w, h);
        assert_eq!(max, MAX_DIMENSION / 1000);
        assert!(validate_dimensions(w, h, factor(max)).is_ok());
        match validate_dimensions(w, h, factor(max + 1)) {
            Err(TransformError::DimensionOverflow {
                factor,
                width,
                height,
                max_factor,
            }) => {
                assert_eq!((factor, width, height, max_factor), (max + 1, w, h, max));
            }
            other => panic!("expected overflow, got {other:?}"),
        }
    }

    #[test]
    fn test_accepts_iff_product_fits() {
        for &(w, h) in &[(1, 1), (3, 7), (100_000, 1), (1, 65_536), (MAX_DIMENSION, 1)] {
            for f in [1u32, 2, 3, 21_474, 21_475, 1 << 20, u32::MAX] {
                let fits = u64::from(f) * u64::from(w.max(h)) <= u64::from(MAX_DIMENSION);
                assert_eq!(
                    validate_dimensions(w, h, factor(f)).is_ok(),
                    fits,
                    "{w}x{h} factor {f}"
                );
            }
        }
    }

    #[test]
    fn test_wide_image_overflow() {
        let err = validate_dimensions(100_000, 1, factor(30_000)).unwrap_err();
        assert!(matches!(
            err,
            TransformError::DimensionOverflow {
                max_factor: 21_474,
                ..
            }
        ));
    }
}
