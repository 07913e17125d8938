//! Length units used by WordprocessingML.
//!
//! Lengths are stored in English Metric Units (914400 per inch), the same
//! base the markup converts from: twentieths of a point for indentation,
//! spacing and page margins, half-points for font sizes.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

const EMU_PER_INCH: f64 = 914_400.0;
const EMU_PER_CM: f64 = 360_000.0;
const EMU_PER_PT: f64 = 12_700.0;
const EMU_PER_TWIP: f64 = 635.0;

/// A signed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Length(i64);

impl Length {
    /// Zero length.
    pub const ZERO: Length = Length(0);

    /// Length from EMU.
    pub const fn emu(emu: i64) -> Self {
        Self(emu)
    }

    /// Length from centimetres.
    pub fn cm(cm: f64) -> Self {
        Self((cm * EMU_PER_CM).round() as i64)
    }

    /// Length from points.
    pub fn pt(pt: f64) -> Self {
        Self((pt * EMU_PER_PT).round() as i64)
    }

    /// Length from inches.
    pub fn inches(inches: f64) -> Self {
        Self((inches * EMU_PER_INCH).round() as i64)
    }

    /// Length from twentieths of a point.
    pub fn twips(twips: i64) -> Self {
        Self(twips * EMU_PER_TWIP as i64)
    }

    /// Length from centimetres, rejecting non-finite input.
    pub fn try_cm(field: &'static str, cm: f64) -> Result<Self> {
        if !cm.is_finite() {
            return Err(Error::invalid_value(field, cm));
        }
        Ok(Self::cm(cm))
    }

    /// Length from points, rejecting non-finite input.
    pub fn try_pt(field: &'static str, pt: f64) -> Result<Self> {
        if !pt.is_finite() {
            return Err(Error::invalid_value(field, pt));
        }
        Ok(Self::pt(pt))
    }

    /// Value in EMU.
    pub const fn as_emu(self) -> i64 {
        self.0
    }

    /// Value in centimetres.
    pub fn to_cm(self) -> f64 {
        self.0 as f64 / EMU_PER_CM
    }

    /// Value in points.
    pub fn to_pt(self) -> f64 {
        self.0 as f64 / EMU_PER_PT
    }

    /// Value in twentieths of a point, rounded to the nearest twip.
    pub fn to_twips(self) -> i64 {
        (self.0 as f64 / EMU_PER_TWIP).round() as i64
    }

    /// Absolute value.
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Check if the length is negative.
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

/// A font size in points, stored as the half-point count the markup uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontSize(u32);

impl FontSize {
    /// Font size from points.
    ///
    /// Rejects sizes that are non-finite, not positive, or too large to
    /// be represented (Word caps sizes at 1638 pt).
    pub fn try_from_pt(field: &'static str, pt: f64) -> Result<Self> {
        if !pt.is_finite() || pt <= 0.0 || pt > 1638.0 {
            return Err(Error::invalid_value(field, pt));
        }
        Ok(Self(((pt * 2.0).round() as u32).max(1)))
    }

    /// Font size from the half-point count.
    pub const fn from_half_points(half_points: u32) -> Self {
        Self(half_points)
    }

    /// Half-point count.
    pub const fn half_points(self) -> u32 {
        self.0
    }

    /// Size in points.
    pub fn to_pt(self) -> f64 {
        f64::from(self.0) / 2.0
    }
}
