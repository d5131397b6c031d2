//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Every storage and upstream call is therefore async. The engine's
//! futures are not `Send`, which is fine here because actix runs each handler to completion on its own worker.
use actix_web::{web, HttpResponse};
use blockonomics_tools::CallbackParams;
use brew_payment_engine::{
    db_types::Order,
    traits::{OrderStore, PaymentProcessor},
    CheckoutApi,
    OrderFlowApi,
};
use log::*;

use crate::{
    data_objects::{HealthResponse, JsonResponse, MonitorUsdtRequest},
    errors::ServerError,
    helpers::signal_from_callback,
    push_watcher::PushWatcher,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
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
route!(health => Get "/health" impl OrderStore);
pub async fn health<B: OrderStore>(api: web::Data<OrderFlowApi<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received health check request");
    let orders = api.order_count().await?;
    Ok(HttpResponse::Ok().json(HealthResponse::ok(orders)))
}

//----------------------------------------------   Checkout  ----------------------------------------------------
route!(new_address => Post "/new_address" impl OrderStore, PaymentProcessor);
/// Asks Blockonomics for a fresh Bitcoin address and opens a pending order for it.
///
/// The upstream JSON (`{"address": "...", ...}`) is returned to the storefront unchanged. If Blockonomics refuses the
/// request, its status code and message are passed through as `{"error": <message>, "details": <status text>}`.
///
/// When the push watcher is enabled, the new address is also watched on the Blockonomics push channel.
pub async fn new_address<B, P>(
    api: web::Data<CheckoutApi<B, P>>,
    watcher: Option<web::Data<PushWatcher<B>>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderStore + 'static,
    P: PaymentProcessor,
{
    debug!("💻️ POST new_address");
    let issued = api.issue_btc_address().await?;
    if let Some(watcher) = watcher {
        watcher.into_inner().watch(&issued.address);
    }
    Ok(HttpResponse::Ok().json(issued.payload))
}

route!(monitor_usdt_transaction => Post "/monitor_usdt_transaction" impl OrderStore, PaymentProcessor);
/// Registers a USDT transfer that the shopper made from their own wallet.
///
/// Expects `{"txhash": "...", "usdtAddress": "..."}`. Both fields are required.
pub async fn monitor_usdt_transaction<B: OrderStore, P: PaymentProcessor>(
    body: web::Json<MonitorUsdtRequest>,
    api: web::Data<CheckoutApi<B, P>>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    let txhash = req.txhash.unwrap_or_default();
    let address = req.usdt_address.unwrap_or_default();
    debug!("💻️ POST monitor_usdt_transaction for {txhash} to [{address}]");
    api.monitor_usdt_transaction(&txhash, &address).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success()))
}

//----------------------------------------------   Callback  ----------------------------------------------------
// These are mounted under the `/callback` scope, behind the callback secret guard.
route!(callback_get => Get "" impl OrderStore);
/// The Blockonomics HTTP callback: `GET /callback?addr=..&status=..&value=..&txid=..`
pub async fn callback_get<B: OrderStore>(
    params: web::Query<CallbackParams>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET callback: {:?}", params);
    apply_callback(params.into_inner(), api.as_ref()).await
}

route!(callback_post => Post "" impl OrderStore);
/// The same callback, posted as JSON `{ addr, status, value, txid }`.
pub async fn callback_post<B: OrderStore>(
    body: web::Json<CallbackParams>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST callback: {:?}", body);
    apply_callback(body.into_inner(), api.as_ref()).await
}

async fn apply_callback<B: OrderStore>(
    params: CallbackParams,
    api: &OrderFlowApi<B>,
) -> Result<HttpResponse, ServerError> {
    let signal = signal_from_callback(params)?;
    let order = api.process_signal(signal).await.map_err(|e| {
        debug!("💻️ Callback could not be applied. {e}");
        e
    })?;
    trace!("💻️ Callback applied. {order}");
    Ok(HttpResponse::Ok().json(JsonResponse::success()))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(order_status => Get "/order_status/{address}" impl OrderStore);
/// Returns the stored order for the address, for clients that poll.
pub async fn order_status<B: OrderStore>(
    path: web::Path<String>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let address = path.into_inner();
    trace!("💻️ GET order_status for [{address}]");
    let order: Order = api.order_status(&address).await?;
    Ok(HttpResponse::Ok().json(order))
}
