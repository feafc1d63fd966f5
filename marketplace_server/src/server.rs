use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use order_engine::{CheckoutApi, FulfillmentApi, PaymentEventApi, RefundApi, SqliteDatabase};
use provider_clients::{CarrierApi, PaymentProcessorApi};

use crate::{
    auth::TokenIssuer,
    config::{ServerConfig, TrackingWebhookUrl},
    errors::ServerError,
    middleware::HmacMiddlewareFactory,
    routes::{
        health,
        CancelOrderRoute,
        CheckoutRoute,
        FulfillableItemsRoute,
        MyOrdersRoute,
        OrderByIdRoute,
        PurchaseLabelRoute,
        RefreshTrackingRoute,
        RequestRefundRoute,
        ShipmentTrackingRoute,
        ShippingQuoteRoute,
    },
    webhook_routes::{PaymentWebhookRoute, ShippingWebhookRoute, CARRIER_HMAC_HEADER},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::InitializeError(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    // The provider clients hold a shared connection pool each, so they are built once and cloned into the workers.
    let payments = PaymentProcessorApi::new(config.payments.clone())?;
    let carrier = CarrierApi::new(config.shipping.clone())?;
    let tracking_callback = TrackingWebhookUrl::new(&config.public_url);
    let srv = HttpServer::new(move || {
        let checkout_api = CheckoutApi::new(db.clone());
        let fulfillment_api = FulfillmentApi::new(db.clone());
        let payment_events_api = PaymentEventApi::new(db.clone());
        let refund_api = RefundApi::new(db.clone());
        let jwt_signer = TokenIssuer::new(&config.auth);
        let payments_api = payments.clone();
        let carrier_api = carrier.clone();
        let tracking_callback = tracking_callback.clone();
        let carrier_webhook_secret = config.shipping.webhook_secret.clone();
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("apm::access_log"))
            .app_data(web::Data::new(checkout_api))
            .app_data(web::Data::new(fulfillment_api))
            .app_data(web::Data::new(payment_events_api))
            .app_data(web::Data::new(refund_api))
            .app_data(web::Data::new(payments_api))
            .app_data(web::Data::new(carrier_api))
            .app_data(web::Data::new(tracking_callback))
            .app_data(web::Data::new(jwt_signer));
        // Routes that require an access token
        let api_scope = web::scope("/api")
            .service(ShippingQuoteRoute::<SqliteDatabase>::new())
            .service(CheckoutRoute::<SqliteDatabase>::new())
            .service(MyOrdersRoute::<SqliteDatabase>::new())
            .service(OrderByIdRoute::<SqliteDatabase>::new())
            .service(CancelOrderRoute::<SqliteDatabase>::new())
            .service(FulfillableItemsRoute::<SqliteDatabase>::new())
            .service(PurchaseLabelRoute::<SqliteDatabase>::new())
            .service(ShipmentTrackingRoute::<SqliteDatabase>::new())
            .service(RefreshTrackingRoute::<SqliteDatabase>::new())
            .service(RequestRefundRoute::<SqliteDatabase>::new());
        // Webhook routes authenticate by signature. The payment route verifies its timestamped signature scheme in
        // the handler; the carrier route gets a body-HMAC check in front of it.
        let webhook_scope = web::scope("/webhook")
            .service(PaymentWebhookRoute::<SqliteDatabase>::new())
            .service(
                web::scope("")
                    .wrap(HmacMiddlewareFactory::new(
                        CARRIER_HMAC_HEADER,
                        carrier_webhook_secret,
                        config.shipping_webhook_hmac_checks,
                    ))
                    .service(ShippingWebhookRoute::<SqliteDatabase>::new()),
            );
        app.service(health).service(api_scope).service(webhook_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
