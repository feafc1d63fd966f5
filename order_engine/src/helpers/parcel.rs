//! Combined-parcel estimation for a seller group.
//!
//! The marketplace does not attempt bin-packing. A seller group ships as a single estimated parcel: total weight is
//! the sum of item weight × quantity, and each dimension is the element-wise maximum of the items' declared
//! dimensions. This deliberately under-estimates volume for multi-item groups; it is a documented limitation of the
//! rate quote, not a bug.

/// The declared shipping attributes of one cart line.
#[derive(Debug, Clone, Copy)]
pub struct ParcelItem {
    pub weight_grams: Option<i64>,
    pub length_mm: Option<i64>,
    pub width_mm: Option<i64>,
    pub height_mm: Option<i64>,
    pub quantity: i64,
}

/// A single-parcel estimate for one seller group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombinedParcel {
    pub weight_grams: i64,
    pub length_mm: i64,
    pub width_mm: i64,
    pub height_mm: i64,
}

impl CombinedParcel {
    /// Combines the items of a seller group into one parcel estimate. Returns `None` if the total weight is zero
    /// (no part in the group declares a weight); callers must treat that as a hard error rather than guess.
    pub fn combine(items: &[ParcelItem]) -> Option<CombinedParcel> {
        let mut parcel = CombinedParcel { weight_grams: 0, length_mm: 0, width_mm: 0, height_mm: 0 };
        for item in items {
            parcel.weight_grams += item.weight_grams.unwrap_or(0) * item.quantity.max(0);
            parcel.length_mm = parcel.length_mm.max(item.length_mm.unwrap_or(0));
            parcel.width_mm = parcel.width_mm.max(item.width_mm.unwrap_or(0));
            parcel.height_mm = parcel.height_mm.max(item.height_mm.unwrap_or(0));
        }
        if parcel.weight_grams <= 0 {
            return None;
        }
        Some(parcel)
    }
}
