use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use blockonomics_tools::BlockonomicsApi;
use brew_payment_engine::{
    db_types::OrderStatusType,
    events::{EventHandlers, EventHooks, EventProducers},
    traits::{OrderStore, PaymentProcessor},
    CheckoutApi,
    MemoryOrderStore,
    OrderFlowApi,
    SqliteDatabase,
};
use log::*;

use crate::{
    config::{ServerConfig, StoreKind},
    errors::ServerError,
    helpers::{cors_headers, json_config, preflight_or_not_found, query_config},
    integrations::blockonomics::BlockonomicsProcessor,
    middleware::CallbackSecretMiddlewareFactory,
    push_watcher::PushWatcher,
    routes::{
        CallbackGetRoute,
        CallbackPostRoute,
        HealthRoute,
        MonitorUsdtTransactionRoute,
        NewAddressRoute,
        OrderStatusRoute,
    },
};

const EVENT_BUFFER_SIZE: usize = 25;
const MAX_DB_CONNECTIONS: u32 = 25;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let api = BlockonomicsApi::new(config.blockonomics.clone())
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let processor = BlockonomicsProcessor::new(api);
    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, logging_hooks());
    let producers = handlers.producers();
    handlers.start_handlers().await;
    info!("💻️ Reconciliation policy: {}. Order store: {}", config.reconciliation, config.store);
    let srv = match config.store {
        StoreKind::Sqlite => {
            let db = SqliteDatabase::new_with_url(&config.database_url, MAX_DB_CONNECTIONS)
                .await
                .map_err(|e| ServerError::InitializeError(e.to_string()))?;
            create_server_instance(config, db, processor, producers)?
        },
        StoreKind::Memory => {
            warn!("💻️ Orders are kept in memory and will be lost when the server stops.");
            create_server_instance(config, MemoryOrderStore::new(), processor, producers)?
        },
    };
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance<B, P>(
    config: ServerConfig,
    db: B,
    processor: P,
    producers: EventProducers,
) -> Result<Server, ServerError>
where
    B: OrderStore + Clone + Send + Sync + 'static,
    P: PaymentProcessor + Clone + Send + 'static,
{
    let orders_api = OrderFlowApi::new(db, config.reconciliation, producers);
    let checkout_api = CheckoutApi::new(orders_api.clone(), processor);
    let watcher = config.push_watcher.enabled.then(|| {
        info!("💻️ Push watcher is enabled. New addresses will be watched on {}", config.blockonomics.push_url);
        Arc::new(PushWatcher::new(orders_api.clone(), &config.blockonomics.push_url, config.push_watcher.watch_timeout))
    });
    let srv = HttpServer::new(move || {
        let mut app = App::new()
            .app_data(json_config())
            .app_data(query_config())
            .app_data(web::Data::new(orders_api.clone()))
            .app_data(web::Data::new(checkout_api.clone()));
        if let Some(watcher) = &watcher {
            app = app.app_data(web::Data::from(Arc::clone(watcher)));
        }
        let callback_scope = web::scope("/callback")
            .wrap(CallbackSecretMiddlewareFactory::new(config.callback_secret.clone()))
            .service(CallbackGetRoute::<B>::new())
            .service(CallbackPostRoute::<B>::new());
        app.wrap(cors_headers(&config.cors_origin))
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("bbc::access_log"))
            .service(HealthRoute::<B>::new())
            .service(NewAddressRoute::<B, P>::new())
            .service(MonitorUsdtTransactionRoute::<B, P>::new())
            .service(OrderStatusRoute::<B>::new())
            .service(callback_scope)
            .default_service(web::to(preflight_or_not_found))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Announces paid and confirmed orders in the log.
pub fn logging_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks
        .on_order_created(|ev| {
            Box::pin(async move {
                debug!("📬️ Order created: {}", ev.order);
            }) as Pin<Box<dyn Future<Output = ()> + Send>>
        })
        .on_status_changed(|ev| {
            Box::pin(async move {
                let order = &ev.new;
                match ev.new_status() {
                    OrderStatusType::Paid => info!("📬️ Payment seen for [{}]: {order}", order.address),
                    OrderStatusType::Confirmed => info!("📬️ Payment confirmed for [{}]: {order}", order.address),
                    OrderStatusType::Pending => {
                        warn!("📬️ Order [{}] went from {} back to pending", order.address, ev.old_status())
                    },
                }
            }) as Pin<Box<dyn Future<Output = ()> + Send>>
        });
    hooks
}
