mod order_number;
mod parcel;

pub use order_number::generate_order_number;
pub use parcel::{CombinedParcel, ParcelItem};
