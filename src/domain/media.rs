//! Inline image and money value objects.
//!
//! Images are persisted as `data:<mime>;base64,<payload>` strings rather than
//! blob-store references. Money crosses the API as a decimal and is stored as
//! integer minor units (two decimal places).

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::errors::{AppError, AppResult};

/// Uploaded image: base64 payload plus its MIME type
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ImageUpload {
    #[schema(example = "image/png")]
    pub content_type: String,
    /// Standard base64 (no data-URI prefix)
    pub data: String,
}

impl ImageUpload {
    pub fn new(content_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            content_type: content_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Validate and convert to a data URI.
    pub fn into_data_uri(self) -> AppResult<String> {
        let mime = self.content_type.trim().to_ascii_lowercase();
        if !mime.starts_with("image/") || mime.len() == "image/".len() {
            return Err(AppError::validation(format!(
                "Unsupported image type: {}",
                self.content_type
            )));
        }

        let bytes = STANDARD
            .decode(self.data.trim())
            .map_err(|_| AppError::validation("Image data is not valid base64"))?;
        if bytes.is_empty() {
            return Err(AppError::validation("Image data is empty"));
        }

        Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
    }
}

/// Convert a list of uploads, failing on the first invalid one.
pub fn into_data_uris(uploads: Vec<ImageUpload>) -> AppResult<Vec<String>> {
    uploads.into_iter().map(ImageUpload::into_data_uri).collect()
}

/// Decimal amount -> stored minor units.
pub fn to_minor_units(amount: Decimal) -> AppResult<i64> {
    scaled(amount, RoundingStrategy::MidpointNearestEven)
}

/// Lower price bound in minor units; rounds up so nothing cheaper matches.
pub fn min_bound_minor_units(amount: Decimal) -> AppResult<i64> {
    scaled(amount, RoundingStrategy::ToPositiveInfinity)
}

/// Upper price bound in minor units; rounds down so nothing dearer matches.
pub fn max_bound_minor_units(amount: Decimal) -> AppResult<i64> {
    scaled(amount, RoundingStrategy::ToZero)
}

fn scaled(amount: Decimal, strategy: RoundingStrategy) -> AppResult<i64> {
    if amount.is_sign_negative() {
        return Err(AppError::validation("Amount cannot be negative"));
    }
    amount
        .round_dp_with_strategy(2, strategy)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|minor| minor.to_i64())
        .ok_or_else(|| AppError::validation("Amount is too large"))
}

/// Stored minor units -> decimal amount.
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_image_upload_becomes_data_uri() {
        let upload = ImageUpload::new("image/png", b"\x89PNG fake");
        let uri = upload.into_data_uri().unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_non_image_mime_rejected() {
        let upload = ImageUpload::new("application/pdf", b"%PDF");
        assert!(matches!(
            upload.into_data_uri(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_invalid_base64_rejected() {
        let upload = ImageUpload {
            content_type: "image/jpeg".to_string(),
            data: "not base64!!".to_string(),
        };
        assert!(upload.into_data_uri().is_err());
    }

    #[test]
    fn test_minor_units() {
        let price = Decimal::from_str("100.50").unwrap();
        assert_eq!(to_minor_units(price).unwrap(), 10050);
        assert_eq!(from_minor_units(10050), price);
        assert_eq!(to_minor_units(Decimal::from_str("0.005").unwrap()).unwrap(), 0);
        assert!(to_minor_units(Decimal::from_str("-1").unwrap()).is_err());
    }

    #[test]
    fn test_oversized_amounts_are_rejected() {
        assert!(matches!(
            to_minor_units(Decimal::MAX),
            Err(AppError::Validation(_))
        ));
        let huge = Decimal::from_str("79228162514264337593543950335").unwrap();
        assert!(matches!(min_bound_minor_units(huge), Err(AppError::Validation(_))));
        assert!(matches!(max_bound_minor_units(huge), Err(AppError::Validation(_))));
        // Fits in Decimal but not in i64 minor units
        let too_big = Decimal::from_str("92233720368547758.08").unwrap();
        assert!(to_minor_units(too_big).is_err());
    }

    #[test]
    fn test_price_bounds_round_inward() {
        let amount = Decimal::from_str("100.004").unwrap();
        assert_eq!(min_bound_minor_units(amount).unwrap(), 10001);
        assert_eq!(max_bound_minor_units(amount).unwrap(), 10000);

        let exact = Decimal::from_str("100.00").unwrap();
        assert_eq!(min_bound_minor_units(exact).unwrap(), 10000);
        assert_eq!(max_bound_minor_units(exact).unwrap(), 10000);
    }
}
