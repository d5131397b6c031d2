mod callback_secret;

pub use callback_secret::{CallbackSecretMiddlewareFactory, CallbackSecretMiddlewareService};
