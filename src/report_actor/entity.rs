use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::{MissingProductReport, ReportCreate, ReportStatus, ReportStatusUpdate};

impl Entity for MissingProductReport {
    type Id = u64;
    type CreateParams = ReportCreate;
    type Patch = ReportStatusUpdate;
    type Action = ();
    type ActionResult = ();

    const KIND: &'static str = "report";

    fn id(&self) -> &u64 {
        &self.id
    }

    fn from_create_params(id: u64, params: ReportCreate) -> Result<Self, String> {
        if params.requested_quantity == 0 {
            return Err("Requested quantity must be positive".to_string());
        }
        let now = Utc::now();
        Ok(Self {
            id,
            product_id: params.product_id,
            product_name: params.product_name,
            requested_quantity: params.requested_quantity,
            customer_id: params.customer_id,
            customer_name: params.customer_name,
            status: ReportStatus::Pending,
            request_count: 1,
            created_at: now,
            updated_at: now,
        })
    }

    fn on_update(&mut self, patch: ReportStatusUpdate) -> Result<(), String> {
        self.status = patch.status;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
