//! Business logic services

pub mod auth;
pub mod authorize;
pub mod gateway;
pub mod lending;
pub mod token;

use std::sync::Arc;

use crate::{config::AppConfig, store::Stores};

pub use auth::AuthService;
pub use authorize::Authorizer;
pub use gateway::AccessGateway;
pub use lending::LendingLedger;
pub use token::TokenCodec;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub gateway: AccessGateway,
}

impl Services {
    /// Wire all services onto the given stores.
    pub fn new(stores: Stores, config: &AppConfig) -> Self {
        let codec = Arc::new(TokenCodec::new(&config.auth));
        let authorizer = Authorizer::new(codec.clone(), stores.users.clone());
        let ledger = LendingLedger::new(stores.clone(), &config.lending);

        Self {
            auth: AuthService::new(stores.users.clone(), codec),
            gateway: AccessGateway::new(authorizer, ledger),
        }
    }
}
