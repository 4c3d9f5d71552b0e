use crate::app_system::Stores;
use crate::auth::AuthService;

/// Shared by every handler behind an `Arc`.
pub struct AppState {
    pub stores: Stores,
    pub auth: AuthService,
    pub invoice_tax_rate: f64,
}

impl AppState {
    pub fn new(stores: Stores, auth: AuthService, invoice_tax_rate: f64) -> Self {
        Self {
            stores,
            auth,
            invoice_tax_rate,
        }
    }
}
