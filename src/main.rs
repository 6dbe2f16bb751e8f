//! Booking PayPal HTTP server.
//!
//! # Usage
//!
//! ```bash
//! BOOKING_PAYPAL__PAYPAL__CLIENT_ID=... \
//! BOOKING_PAYPAL__PAYPAL__CLIENT_SECRET=... \
//! BOOKING_PAYPAL__PAYPAL__CHECKOUT_COMPLETE_URL=https://hotel.example/checkout/complete \
//!   cargo run
//! ```
//!
//! Set `BOOKING_PAYPAL__REDIS__URL` for shared rate-limit counters and
//! `BOOKING_PAYPAL__DATABASE__URL` for the PostgreSQL reservation store.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use booking_paypal::adapters::events::InMemoryEventPublisher;
use booking_paypal::adapters::http::{payment_router, PaymentAppState, ProxyTrust};
use booking_paypal::adapters::paypal::{
    PaypalAccessTokenProvider, PaypalApi, PaypalApiConfig, PaypalOrdersClient,
    PaypalWebhookVerifier,
};
use booking_paypal::adapters::rate_limiter::{InMemoryRateLimiter, RedisRateLimiter};
use booking_paypal::adapters::reservation::{
    InMemoryReservationRepository, PostgresReservationRepository,
};
use booking_paypal::application::{
    GatewayPorts, GatewaySettings, PaymentIntentSettings, PaypalPaymentGateway,
};
use booking_paypal::config::AppConfig;
use booking_paypal::ports::{AccessTokenProvider, RateLimiter, ReservationRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    // PayPal
    let api = PaypalApi::new(
        PaypalApiConfig::new(
            config.paypal.client_id.clone(),
            config.paypal.client_secret.clone(),
            &config.paypal.mode,
        )
        .with_webhook_id(config.paypal.webhook_id().map(String::from))
        .with_timeout(config.paypal.request_timeout()),
    )?;
    let tokens: Arc<dyn AccessTokenProvider> = Arc::new(PaypalAccessTokenProvider::new(api.clone()));
    let orders = Arc::new(PaypalOrdersClient::new(api.clone(), tokens.clone()));
    let verifier = Arc::new(PaypalWebhookVerifier::new(api.clone(), tokens));
    info!(base_url = api.config().base_url(), flow_mode = ?config.paypal.flow_mode, "PayPal client ready");

    // Rate limiting
    let rate_limiter: Arc<dyn RateLimiter> = match &config.redis {
        Some(redis_config) => {
            let conn = redis_config.connect().await?;
            info!("Using Redis rate limiter");
            Arc::new(RedisRateLimiter::new(conn))
        }
        None => {
            info!("Redis not configured, using in-memory rate limiter");
            Arc::new(InMemoryRateLimiter::new())
        }
    };

    // Reservations
    let reservations: Arc<dyn ReservationRepository> = match &config.database {
        Some(database) => {
            let pool = database.pool_options().connect(&database.url).await?;
            info!("Using PostgreSQL reservation store");
            Arc::new(PostgresReservationRepository::new(pool))
        }
        None => {
            info!("Database not configured, using in-memory reservation store");
            Arc::new(InMemoryReservationRepository::new())
        }
    };

    let gateway = Arc::new(PaypalPaymentGateway::new(
        GatewayPorts {
            orders,
            verifier,
            reservations,
            publisher: Arc::new(InMemoryEventPublisher::new()),
            rate_limiter,
        },
        GatewaySettings {
            client_id: config.paypal.client_id.clone(),
            webhook_id: config.paypal.webhook_id().map(String::from),
            intent: PaymentIntentSettings {
                flow_mode: config.paypal.flow_mode,
                currency: config.paypal.currency.to_ascii_uppercase(),
                checkout_complete_url: config.paypal.checkout_complete_url.clone(),
                brand_name: config.paypal.brand_name.clone(),
            },
            rate_limit: config.rate_limit.capture_limits(),
        },
    ));

    let state = PaymentAppState {
        capture_handler: gateway.capture_handler(),
        gateway,
        proxy_trust: ProxyTrust(config.server.trust_proxy_headers),
    };
    let app = payment_router(state, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.server.log_level.clone().into());
    let registry = tracing_subscriber::registry().with(filter);

    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, draining connections"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
    }
}
