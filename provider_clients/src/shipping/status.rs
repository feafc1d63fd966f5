use std::fmt::Display;

/// The closed set of tracking states the marketplace acts on. Every vendor status string is funnelled through
/// [`TrackingStatus::from_vendor`] at the boundary; unrecognised strings map to `Unknown` and are logged by the
/// caller rather than failing the delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingStatus {
    Unknown,
    PreTransit,
    InTransit,
    Delivered,
    Failure,
    Returned,
}

impl TrackingStatus {
    pub fn from_vendor(status: &str) -> Self {
        match status.to_ascii_uppercase().as_str() {
            "PRE_TRANSIT" => TrackingStatus::PreTransit,
            "TRANSIT" | "IN_TRANSIT" | "OUT_FOR_DELIVERY" => TrackingStatus::InTransit,
            "DELIVERED" => TrackingStatus::Delivered,
            "FAILURE" | "FAILED" => TrackingStatus::Failure,
            "RETURNED" | "RETURN_TO_SENDER" => TrackingStatus::Returned,
            _ => TrackingStatus::Unknown,
        }
    }
}

impl Display for TrackingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TrackingStatus::Unknown => "Unknown",
            TrackingStatus::PreTransit => "PreTransit",
            TrackingStatus::InTransit => "InTransit",
            TrackingStatus::Delivered => "Delivered",
            TrackingStatus::Failure => "Failure",
            TrackingStatus::Returned => "Returned",
        };
        write!(f, "{s}")
    }
}
