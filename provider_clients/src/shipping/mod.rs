mod api;
mod config;
mod data_objects;
mod error;
mod status;

pub use api::CarrierApi;
pub use config::ShippingConfig;
pub use data_objects::{AddressPayload, LabelPurchase, ParcelPayload, ShippingRate, TrackingInfo, TrackingCheckpoint};
pub use error::ShippingError;
pub use status::TrackingStatus;
