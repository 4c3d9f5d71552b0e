use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{error, info, warn};

use super::SystemError;
use crate::actor_framework::{sequence, ResourceActor};
use crate::clients::{OrderClient, ProductClient, ReportClient, UserClient};
use crate::domain::{MissingProductReport, Order, Product, User};

/// Cloneable handles to every running store.
#[derive(Clone)]
pub struct Stores {
    pub products: ProductClient,
    pub orders: OrderClient,
    pub users: UserClient,
    pub reports: ReportClient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Liveness {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreHealth {
    pub products: Liveness,
    pub orders: Liveness,
    pub users: Liveness,
    pub reports: Liveness,
}

impl StoreHealth {
    pub fn all_up(&self) -> bool {
        [self.products, self.orders, self.users, self.reports]
            .iter()
            .all(|store| *store == Liveness::Up)
    }
}

fn liveness<T, E>(probe: Result<Result<T, E>, tokio::time::error::Elapsed>) -> Liveness {
    match probe {
        Ok(Ok(_)) => Liveness::Up,
        _ => Liveness::Down,
    }
}

impl Stores {
    /// Asks every store for its record count; a store that does not answer
    /// within `limit` is reported down.
    pub async fn health(&self, limit: Duration) -> StoreHealth {
        let (products, orders, users, reports) = tokio::join!(
            timeout(limit, self.products.count_products()),
            timeout(limit, self.orders.count_orders()),
            timeout(limit, self.users.count_users()),
            timeout(limit, self.reports.count_reports()),
        );
        StoreHealth {
            products: liveness(products),
            orders: liveness(orders),
            users: liveness(users),
            reports: liveness(reports),
        }
    }
}

/// The main application system that orchestrates all actors.
///
/// Responsible for starting up actors, wiring them together, and handling shutdown.
pub struct StoreSystem {
    pub stores: Stores,
    handles: Vec<(&'static str, JoinHandle<()>)>,
}

impl StoreSystem {
    pub fn start(buffer_size: usize) -> Self {
        let (user_actor, user_inner) = ResourceActor::<User>::new(buffer_size, sequence());
        let users = UserClient::new(user_inner);
        let user_handle = tokio::spawn(user_actor.run());

        let (product_actor, product_inner) = ResourceActor::<Product>::new(buffer_size, sequence());
        let products = ProductClient::new(product_inner);
        let product_handle = tokio::spawn(product_actor.run());

        let (report_actor, report_inner) = ResourceActor::<MissingProductReport>::new(buffer_size, sequence());
        let reports = ReportClient::new(report_inner);
        let report_handle = tokio::spawn(report_actor.run());

        // Orders reserve stock and raise reports, so they get both clients.
        let (order_actor, order_inner) = ResourceActor::<Order>::new(buffer_size, sequence());
        let orders = OrderClient::new(order_inner, products.clone(), reports.clone());
        let order_handle = tokio::spawn(order_actor.run());

        info!(buffer_size, "All stores started");
        Self {
            stores: Stores {
                products,
                orders,
                users,
                reports,
            },
            handles: vec![
                ("order", order_handle),
                ("report", report_handle),
                ("product", product_handle),
                ("user", user_handle),
            ],
        }
    }

    /// Sends every store an explicit shutdown message, then waits for the
    /// tasks. Clones of the clients held elsewhere do not keep stores alive.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        let stores = self.stores;
        let sent = [
            ("order", stores.orders.shutdown().await.map_err(|e| e.to_string())),
            ("report", stores.reports.shutdown().await.map_err(|e| e.to_string())),
            ("product", stores.products.shutdown().await.map_err(|e| e.to_string())),
            ("user", stores.users.shutdown().await.map_err(|e| e.to_string())),
        ];
        for (kind, result) in sent {
            if let Err(e) = result {
                warn!(kind, error = %e, "Store was already closed");
            }
        }

        let mut failed = None;
        for (kind, handle) in self.handles {
            if let Err(e) = handle.await {
                error!(kind, error = %e, "Actor task failed");
                failed.get_or_insert(format!("{kind}: {e}"));
            }
        }
        if let Some(failure) = failed {
            return Err(SystemError::ActorTask(failure));
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
