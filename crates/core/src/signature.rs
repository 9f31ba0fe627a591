//! Signature field overlay model and the page coordinate system.
//!
//! Coordinates are plain pixel values on a 816x1056 logical canvas
//! (8.5in x 11in at 96 DPI), absolute from the page's top-left origin.
//! The interactive placement editor and the PDF renderer share this space
//! 1:1 -- neither side rescales, or previously authored templates would
//! misplace their boxes.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Logical page width in pixels (8.5in at 96 DPI).
pub const PAGE_WIDTH_PX: u32 = 816;
/// Logical page height in pixels (11in at 96 DPI).
pub const PAGE_HEIGHT_PX: u32 = 1056;
/// Interior content padding in pixels (0.5in at 96 DPI). Applied inside
/// the content container, never as PDF-engine page margins.
pub const PAGE_MARGIN_PX: u32 = 48;

/// A positioned, sized overlay region where a signature or initials belong.
///
/// Stored as part of the template and copied by value into each rendered
/// document, so later template edits never move boxes on documents that
/// were already rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureField {
    pub id: String,
    pub name: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SignatureField {
    /// Validate geometry: positive size, non-negative position.
    ///
    /// A field may sit outside the page bounds (it simply won't be visible)
    /// but zero or negative dimensions are authoring errors.
    pub fn validate(&self) -> CoreResult<()> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(CoreError::Validation(format!(
                "Signature field \"{}\" must have positive width and height",
                self.name
            )));
        }
        if self.x < 0.0 || self.y < 0.0 {
            return Err(CoreError::Validation(format!(
                "Signature field \"{}\" must have non-negative coordinates",
                self.name
            )));
        }
        Ok(())
    }
}

/// Validate a whole set of fields, naming the first offender.
pub fn validate_signature_fields(fields: &[SignatureField]) -> CoreResult<()> {
    for field in fields {
        field.validate()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn field(x: f64, y: f64, width: f64, height: f64) -> SignatureField {
        SignatureField {
            id: "sig-1".into(),
            name: "signature_1".into(),
            label: "Client signature".into(),
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn accepts_valid_geometry() {
        assert!(field(50.0, 900.0, 180.0, 40.0).validate().is_ok());
    }

    #[test]
    fn rejects_zero_width() {
        let err = field(0.0, 0.0, 0.0, 40.0).validate().unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) => {
            assert!(msg.contains("signature_1"));
        });
    }

    #[test]
    fn rejects_negative_height() {
        assert!(field(0.0, 0.0, 100.0, -1.0).validate().is_err());
    }

    #[test]
    fn rejects_negative_position() {
        assert!(field(-5.0, 0.0, 100.0, 40.0).validate().is_err());
    }

    #[test]
    fn out_of_bounds_position_is_allowed() {
        // Off-page fields render invisibly; they are not rejected.
        assert!(field(2000.0, 3000.0, 100.0, 40.0).validate().is_ok());
    }

    #[test]
    fn page_constants_match_letter_at_96_dpi() {
        assert_eq!(PAGE_WIDTH_PX, 816);
        assert_eq!(PAGE_HEIGHT_PX, 1056);
        assert_eq!(PAGE_MARGIN_PX, 48);
    }

    #[test]
    fn round_trips_through_json() {
        let f = field(100.0, 600.0, 200.0, 60.0);
        let json = serde_json::to_string(&f).unwrap();
        let back: SignatureField = serde_json::from_str(&json).unwrap();
        assert_eq!(f, back);
    }
}
