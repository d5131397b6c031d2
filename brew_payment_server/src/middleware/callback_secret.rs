//! Shared-secret guard for the Blockonomics callback.
//!
//! Blockonomics lets the merchant append query parameters to the callback URL it calls. Configure the callback URL as
//! `https://cafe.example/callback?secret=<BBC_CALLBACK_SECRET>` and wrap the callback scope with this middleware to
//! reject calls that do not carry the same secret.
//!
//! When no secret is configured the middleware lets every request through.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web,
    Error,
};
use brew_common::Secret;
use futures::future::LocalBoxFuture;
use log::{trace, warn};
use serde::Deserialize;

use crate::errors::ServerError;

#[derive(Deserialize)]
struct SecretParam {
    secret: Option<String>,
}

pub struct CallbackSecretMiddlewareFactory {
    secret: Option<Secret<String>>,
}

impl CallbackSecretMiddlewareFactory {
    pub fn new(secret: Option<Secret<String>>) -> Self {
        Self { secret }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CallbackSecretMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = CallbackSecretMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CallbackSecretMiddlewareService { secret: self.secret.clone(), service: Rc::new(service) }))
    }
}

pub struct CallbackSecretMiddlewareService<S> {
    secret: Option<Secret<String>>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for CallbackSecretMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let expected = self.secret.as_ref().map(|s| s.reveal().clone());
        Box::pin(async move {
            let Some(expected) = expected else {
                trace!("🔐️ No callback secret configured. Allowing request.");
                return service.call(req).await;
            };
            let supplied = web::Query::<SecretParam>::from_query(req.query_string())
                .ok()
                .and_then(|q| q.into_inner().secret);
            match supplied {
                Some(s) if s == expected => {
                    trace!("🔐️ Callback secret check ✅️");
                    service.call(req).await
                },
                Some(_) => {
                    warn!("🔐️ Callback with an invalid secret from {:?}. Denying access.", req.peer_addr());
                    Err(ServerError::CallbackForbidden.into())
                },
                None => {
                    warn!("🔐️ Callback without a secret from {:?}. Denying access.", req.peer_addr());
                    Err(ServerError::CallbackForbidden.into())
                },
            }
        })
    }
}
