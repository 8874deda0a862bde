/// A tunable value outside the range the drive model can use.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum InvalidTuning {
    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: f32,
    },
    #[error("{field} is not finite")]
    NonFinite { field: &'static str },
}

impl InvalidTuning {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::OutOfRange { field, .. } | Self::NonFinite { field } => field,
        }
    }
}

/// `Ok` when `ok` holds for `value`. NaN never passes.
pub fn check_range(
    field: &'static str,
    value: f32,
    expected: &'static str,
    ok: impl Fn(f32) -> bool,
) -> Result<(), InvalidTuning> {
    if value.is_nan() || !ok(value) {
        return Err(InvalidTuning::OutOfRange {
            field,
            expected,
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_is_out_of_range() {
        let err = check_range("gain", f32::NAN, ">= 0", |v| v >= 0.0).unwrap_err();
        assert_eq!(err.field(), "gain");
        assert!(err.to_string().starts_with("gain must be >= 0"));
    }

    #[test]
    fn in_range_passes() {
        assert!(check_range("gain", 0.5, "in (0, 1]", |v| v > 0.0 && v <= 1.0).is_ok());
        assert!(check_range("gain", 0.0, "in (0, 1]", |v| v > 0.0 && v <= 1.0).is_err());
    }
}
