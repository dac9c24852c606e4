use std::sync::Arc;

use crate::auth::TokenCodec;
use crate::config::AppConfig;
use crate::db::Store;
use crate::images::{ImageStore, InlineImageStore};

/// Everything a handler needs, shared across workers through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: TokenCodec,
    pub images: Arc<dyn ImageStore>,
    pub hash_cost: u32,
}

impl AppState {
    pub fn new(config: &AppConfig, store: Arc<dyn Store>) -> Self {
        AppState {
            store,
            tokens: TokenCodec::new(config.jwt_secret.as_bytes(), config.token_ttl),
            images: Arc::new(InlineImageStore::new(config.image_folder.clone())),
            hash_cost: config.bcrypt_cost,
        }
    }
}
