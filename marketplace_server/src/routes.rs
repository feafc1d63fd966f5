//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Every handler here is async and awaits the engine and provider calls, so worker threads never block on I/O.
//! Webhook handlers live in [`crate::webhook_routes`]; they authenticate by signature rather than by access token.

use actix_web::{get, web, HttpResponse, Responder};
use futures::future::try_join_all;
use log::*;
use order_engine::{
    order_objects::{CheckoutReceipt, CheckoutRequest, LabelRequest, PaymentAuthorization, PurchasedLabel,
        RefundRequest, ShippingQuoteRequest},
    traits::{OrderManagement, RefundManagement, ShipmentManagement},
    CheckoutApi,
    FulfillmentApi,
    RefundApi,
};
use provider_clients::{CarrierApi, PaymentProcessorApi};

use crate::{
    auth::{JwtClaims, Role},
    data_objects::{
        address_payload,
        parcel_payload,
        CancelResponse,
        CheckoutBody,
        LabelBody,
        RefundBody,
        SellerRates,
        ShippingQuoteBody,
        TrackingView,
    },
    config::TrackingWebhookUrl,
    errors::ServerError,
    webhook_routes::tracking_update_from_checkpoint,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal) => {
        paste::paste! { pub struct [<$name:camel Route>];}
        paste::paste! {
                impl [<$name:camel Route>] {
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self { Self }
            }
        }
        paste::paste! {
            impl actix_web::dev::HttpServiceFactory for [<$name:camel Route>] {
                fn register(self, config: &mut actix_web::dev::AppService) {
                    let res = actix_web::Resource::new($path)
                        .name(stringify!($name))
                        .guard(actix_web::guard::$method())
                        .to($name);
                    actix_web::dev::HttpServiceFactory::register(res, config);
                }
            }
        }
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//------------------------------------------   Shipping quotes  ------------------------------------------------

/// Each seller group's quote carries at most this many rates, cheapest first.
const MAX_RATES_PER_SELLER: usize = 3;

route!(shipping_quote => Post "/shipping/quote" impl OrderManagement);
/// Route handler for the shipping quote endpoint.
///
/// The cart is grouped by seller and each group is reduced to a single-parcel estimate, which is then priced
/// against the live rate aggregator, one concurrent rate request per group. A failure for any one seller group
/// fails the whole call, so the buyer never sees a quote that silently omits part of the cart.
pub async fn shipping_quote<B: OrderManagement>(
    claims: JwtClaims,
    body: web::Json<ShippingQuoteBody>,
    api: web::Data<CheckoutApi<B>>,
    carrier: web::Data<CarrierApi>,
) -> Result<HttpResponse, ServerError> {
    let body = body.into_inner();
    debug!("💻️ POST shipping quote for buyer {} ({} cart line(s))", claims.user_id, body.items.len());
    let request = ShippingQuoteRequest {
        buyer_id: claims.user_id,
        items: body.items,
        shipping_address_id: body.shipping_address_id,
    };
    let parcels = api.quote_seller_parcels(&request).await?;
    // Every seller group ships to the same destination. It is validated and normalised once, and the normalised
    // form is what gets priced, so the quote matches what a label would actually be purchased against.
    let Some(first) = parcels.first() else {
        return Ok(HttpResponse::Ok().json(Vec::<SellerRates>::new()));
    };
    let destination = carrier.validate_address(&address_payload(&first.to)).await?;
    let rate_requests = parcels
        .iter()
        .map(|parcel| {
            let from = address_payload(&parcel.from);
            let payload = parcel_payload(&parcel.parcel);
            let carrier = &carrier;
            let destination = &destination;
            async move { carrier.fetch_rates(&from, destination, &payload).await }
        });
    let group_rates = try_join_all(rate_requests).await?;
    let result = parcels
        .iter()
        .zip(group_rates)
        .map(|(parcel, mut rates)| {
            rates.sort_by_key(|r| r.amount);
            rates.truncate(MAX_RATES_PER_SELLER);
            SellerRates { seller_id: parcel.seller_id, parcel_weight_grams: parcel.parcel.weight_grams, rates }
        })
        .collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(result))
}

//----------------------------------------------   Orders  -----------------------------------------------------

route!(checkout => Post "/orders" impl OrderManagement);
/// Route handler for checkout.
///
/// Checkout is two-phase around the processor call: the engine validates the cart and fixes the totals, the
/// processor authorizes a payment intent for exactly that total, and only then is the order persisted with the
/// intent attached. If the processor call fails nothing has been written.
pub async fn checkout<B: OrderManagement>(
    claims: JwtClaims,
    body: web::Json<CheckoutBody>,
    api: web::Data<CheckoutApi<B>>,
    payments: web::Data<PaymentProcessorApi>,
) -> Result<HttpResponse, ServerError> {
    let body = body.into_inner();
    debug!("💻️ POST checkout for buyer {} ({} cart line(s))", claims.user_id, body.items.len());
    let request = CheckoutRequest {
        buyer_id: claims.user_id,
        items: body.items,
        shipping_address_id: body.shipping_address_id,
        billing_address_id: body.billing_address_id,
    };
    let quote = api.prepare_checkout(&request).await?;
    let intent = payments.create_payment_intent(quote.total, quote.order_number.as_str()).await?;
    let auth = PaymentAuthorization {
        payment_intent_id: intent.id,
        client_secret: intent.client_secret.clone(),
        amount: quote.total,
    };
    let order = api.commit_checkout(quote, auth).await?;
    let receipt = CheckoutReceipt {
        order_id: order.id,
        order_number: order.order_number,
        client_secret: intent.client_secret,
    };
    Ok(HttpResponse::Ok().json(receipt))
}

route!(my_orders => Get "/orders" impl OrderManagement);
/// All orders belonging to the authenticated buyer, newest first.
pub async fn my_orders<B: OrderManagement>(
    claims: JwtClaims,
    api: web::Data<CheckoutApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET my_orders for buyer {}", claims.user_id);
    let orders = api.orders_for_buyer(claims.user_id).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(order_by_id => Get "/orders/{id}" impl OrderManagement);
/// One order with its items. Owner-scoped: an order belonging to someone else comes back as a 404.
pub async fn order_by_id<B: OrderManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<CheckoutApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    debug!("💻️ GET order {order_id} for buyer {}", claims.user_id);
    let details = api.order_for_buyer(order_id, claims.user_id).await?;
    Ok(HttpResponse::Ok().json(details))
}

route!(cancel_order => Post "/orders/{id}/cancel" impl OrderManagement);
/// Cancels the pending payment authorization for an order the buyer has abandoned.
///
/// Only the processor-side cancellation happens here. The order itself moves to `Cancelled` when the processor's
/// cancellation event arrives on the webhook, keeping the webhook as the single source of payment state.
pub async fn cancel_order<B: OrderManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<CheckoutApi<B>>,
    payments: web::Data<PaymentProcessorApi>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    debug!("💻️ POST cancel order {order_id} for buyer {}", claims.user_id);
    let intent_id = api.pending_payment_intent(order_id, claims.user_id).await?;
    let intent = payments.cancel_payment_intent(&intent_id).await?;
    Ok(HttpResponse::Ok().json(CancelResponse { order_id, payment_intent_id: intent.id }))
}

//--------------------------------------------   Fulfillment  --------------------------------------------------

route!(fulfillable_items => Get "/fulfillment/items" impl ShipmentManagement);
/// The seller's fulfillment queue: paid, unshipped items, oldest payment first.
pub async fn fulfillable_items<B: ShipmentManagement>(
    claims: JwtClaims,
    api: web::Data<FulfillmentApi<B>>,
) -> Result<HttpResponse, ServerError> {
    claims.require_role(Role::Seller)?;
    debug!("💻️ GET fulfillment queue for seller {}", claims.user_id);
    let items = api.fulfillable_items(claims.user_id).await?;
    Ok(HttpResponse::Ok().json(items))
}

route!(purchase_label => Post "/fulfillment/labels" impl ShipmentManagement);
/// Route handler for label purchases.
///
/// Mirrors checkout's two-phase shape: the engine validates the request and assembles the parcel, the aggregator
/// purchase happens in the middle, and the shipment is recorded only once the aggregator has committed the
/// transaction. A rejected purchase leaves the order items untouched.
pub async fn purchase_label<B: ShipmentManagement>(
    claims: JwtClaims,
    body: web::Json<LabelBody>,
    api: web::Data<FulfillmentApi<B>>,
    carrier: web::Data<CarrierApi>,
    callback: web::Data<TrackingWebhookUrl>,
) -> Result<HttpResponse, ServerError> {
    claims.require_role(Role::Seller)?;
    let body = body.into_inner();
    debug!("💻️ POST label purchase for seller {} ({} item(s))", claims.user_id, body.order_item_ids.len());
    let request =
        LabelRequest { seller_id: claims.user_id, order_item_ids: body.order_item_ids, rate_id: body.rate_id };
    let label_order = api.prepare_label_purchase(&request).await?;
    let purchase = carrier.purchase_label(&label_order.rate_id).await?;
    let label = PurchasedLabel {
        transaction_id: purchase.transaction_id,
        carrier: purchase.carrier,
        tracking_number: purchase.tracking_number,
        tracking_url: purchase.tracking_url,
        label_url: purchase.label_url,
    };
    let shipment = api.record_label_purchase(&label_order, label).await?;
    // Best effort: the label has already been bought and recorded, so a registration failure must not fail the
    // request. A shipment the aggregator never pushes events for is still reachable via the refresh endpoint.
    if let Err(e) = carrier.register_tracking_webhook(callback.as_str()).await {
        warn!("💻️ Could not register the tracking webhook for shipment {}: {e}", shipment.id);
    }
    Ok(HttpResponse::Ok().json(shipment))
}

route!(shipment_tracking => Get "/shipments/{id}/tracking" impl ShipmentManagement);
/// The shipment and its tracking history. Visible to the shipment's seller and the order's buyer only; everyone
/// else gets a 404.
pub async fn shipment_tracking<B: ShipmentManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<FulfillmentApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let shipment_id = path.into_inner();
    debug!("💻️ GET tracking for shipment {shipment_id} (user {})", claims.user_id);
    let (shipment, events) = api.shipment_for_user(shipment_id, claims.user_id).await?;
    Ok(HttpResponse::Ok().json(TrackingView { shipment, events }))
}

route!(refresh_tracking => Post "/shipments/{id}/tracking/refresh" impl ShipmentManagement);
/// Polls the aggregator for the current tracking state and reconciles it, then returns the refreshed view.
///
/// The webhook is the primary tracking channel; this exists for support staff and impatient users. Reconciliation
/// goes through the same idempotent path as the webhook, so polling can never corrupt state.
pub async fn refresh_tracking<B: ShipmentManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<FulfillmentApi<B>>,
    carrier: web::Data<CarrierApi>,
) -> Result<HttpResponse, ServerError> {
    let shipment_id = path.into_inner();
    debug!("💻️ POST tracking refresh for shipment {shipment_id} (user {})", claims.user_id);
    let (shipment, _) = api.shipment_for_user(shipment_id, claims.user_id).await?;
    let info = carrier.get_tracking(&shipment.carrier, &shipment.tracking_number).await?;
    if let Some(checkpoint) = info.tracking_status {
        if let Some(update) = tracking_update_from_checkpoint(&shipment.tracking_number, &checkpoint) {
            api.apply_tracking_update(update).await?;
        }
    }
    let (shipment, events) = api.shipment_for_user(shipment_id, claims.user_id).await?;
    Ok(HttpResponse::Ok().json(TrackingView { shipment, events }))
}

//----------------------------------------------   Refunds  ----------------------------------------------------

route!(request_refund => Post "/refunds" impl RefundManagement);
/// Route handler for buyer refund requests.
///
/// Eligibility is validated before the processor is asked for anything, and the refund row is only recorded once
/// the processor has accepted the request. The refund's final outcome arrives later on the payment webhook.
pub async fn request_refund<B: RefundManagement>(
    claims: JwtClaims,
    body: web::Json<RefundBody>,
    api: web::Data<RefundApi<B>>,
    payments: web::Data<PaymentProcessorApi>,
) -> Result<HttpResponse, ServerError> {
    let body = body.into_inner();
    debug!("💻️ POST refund request from buyer {} for item {}", claims.user_id, body.order_item_id);
    let request = RefundRequest {
        buyer_id: claims.user_id,
        order_item_id: body.order_item_id,
        reason: body.reason.clone(),
        amount: body.amount,
    };
    let eligibility = api.validate_refund(&request).await?;
    let outcome = payments.create_refund(&eligibility.charge_id, eligibility.amount, &body.reason).await?;
    let refund = api.record_refund(&eligibility, &outcome.id, &body.reason).await?;
    Ok(HttpResponse::Ok().json(refund))
}
