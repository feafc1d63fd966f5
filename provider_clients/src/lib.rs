//! HTTP clients for the marketplace's two external providers.
//!
//! Both clients are deliberately ignorant of the order engine: they speak the provider's vocabulary (intent ids,
//! rate ids, vendor tracking strings) and the server layer translates between that vocabulary and the engine's
//! closed internal enums. Everything the providers send us arrives twice, late, or out of order eventually, so the
//! webhook helpers here only verify and parse; idempotency lives in the engine.

pub mod payments;
pub mod shipping;

pub use payments::{PaymentEvent, PaymentIntent, PaymentProcessorApi, PaymentsConfig, PaymentsError, RefundOutcome};
pub use shipping::{
    CarrierApi,
    LabelPurchase,
    ShippingConfig,
    ShippingError,
    ShippingRate,
    TrackingStatus,
};
