//! Device frame and screen slot layout.

use crate::error::MockupError;

/// Width of the phone frame canvas, in pixels.
pub const PHONE_WIDTH: u32 = 1242;
/// Height of the phone frame canvas, in pixels.
pub const PHONE_HEIGHT: u32 = 2688;
/// Width of the screen slot, in pixels.
pub const SCREEN_WIDTH: u32 = 1080;
/// Height of the screen slot, in pixels.
pub const SCREEN_HEIGHT: u32 = 2340;

/// Immutable layout of one device template: the phone canvas and the screen
/// slot centered inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenGeometry {
    /// Canvas width; equals the template width.
    pub phone_width: u32,
    /// Canvas height; equals the template height.
    pub phone_height: u32,
    /// Screen slot width.
    pub screen_width: u32,
    /// Screen slot height.
    pub screen_height: u32,
}

impl Default for ScreenGeometry {
    fn default() -> Self {
        Self::IPHONE
    }
}

impl ScreenGeometry {
    /// The bundled iPhone frame.
    pub const IPHONE: Self = Self {
        phone_width: PHONE_WIDTH,
        phone_height: PHONE_HEIGHT,
        screen_width: SCREEN_WIDTH,
        screen_height: SCREEN_HEIGHT,
    };

    /// Check that every side is non-zero and the screen fits inside the phone.
    ///
    /// # Errors
    ///
    /// Returns [`MockupError::InvalidGeometry`] describing the first violation.
    pub fn validate(&self) -> Result<(), MockupError> {
        if self.phone_width == 0
            || self.phone_height == 0
            || self.screen_width == 0
            || self.screen_height == 0
        {
            return Err(MockupError::InvalidGeometry(format!(
                "zero-sized dimension in {self:?}"
            )));
        }
        if self.screen_width > self.phone_width || self.screen_height > self.phone_height {
            return Err(MockupError::InvalidGeometry(format!(
                "screen {}x{} exceeds phone {}x{}",
                self.screen_width, self.screen_height, self.phone_width, self.phone_height
            )));
        }
        Ok(())
    }

    /// Screen slot aspect ratio (width / height).
    #[must_use]
    pub fn screen_ratio(&self) -> f64 {
        f64::from(self.screen_width) / f64::from(self.screen_height)
    }

    /// Size of a `width x height` source once fitted into the screen slot
    /// with its aspect ratio preserved.
    ///
    /// Wider-than-screen sources take the full slot width, all others the full
    /// slot height; the derived side is rounded and never drops below 1.
    #[must_use]
    pub fn fit(&self, width: u32, height: u32) -> (u32, u32) {
        let source_ratio = f64::from(width) / f64::from(height);
        if source_ratio > self.screen_ratio() {
            let derived = round_to_px(f64::from(self.screen_width) / source_ratio);
            (self.screen_width, derived.min(self.screen_height))
        } else {
            let derived = round_to_px(f64::from(self.screen_height) * source_ratio);
            (derived.min(self.screen_width), self.screen_height)
        }
    }

    /// Top-left offset that centers a `width x height` image on the phone canvas.
    #[must_use]
    pub fn center_offset(&self, width: u32, height: u32) -> (i64, i64) {
        (
            (i64::from(self.phone_width) - i64::from(width)).div_euclid(2),
            (i64::from(self.phone_height) - i64::from(height)).div_euclid(2),
        )
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_to_px(value: f64) -> u32 {
    value.round().max(1.0) as u32
}
