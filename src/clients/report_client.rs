use std::cmp::Reverse;

use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{MissingProductReport, ReportCreate, ReportStatus, ReportStatusUpdate};
use crate::report_actor::ReportError;

/// Client for the missing-product report store.
#[derive(Clone)]
pub struct ReportClient {
    inner: ResourceClient<MissingProductReport>,
}

impl_basic_client!(ReportClient, MissingProductReport, ReportError, report);

impl ReportClient {
    #[instrument(skip(self, params), fields(product_id = params.product_id, shortfall = params.requested_quantity))]
    pub async fn record_shortfall(&self, params: ReportCreate) -> Result<MissingProductReport, ReportError> {
        debug!("Sending request");
        let id = self.inner.create(params).await?;
        info!(report_id = id, "Missing product recorded");
        self.require_report(id).await
    }

    /// Pending reports, most requested first, then newest first.
    #[instrument(skip(self))]
    pub async fn list_pending(&self) -> Result<Vec<MissingProductReport>, ReportError> {
        debug!("Sending request");
        let mut reports = self
            .inner
            .list(|report| report.status == ReportStatus::Pending)
            .await?;
        reports.sort_by_key(|report| (Reverse(report.request_count), Reverse(report.created_at), Reverse(report.id)));
        Ok(reports)
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, id: u64, status: ReportStatus) -> Result<MissingProductReport, ReportError> {
        debug!("Sending request");
        let report = self.inner.update(id, ReportStatusUpdate { status }).await?;
        info!(report_id = id, status = ?status, "Report status updated");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::{sequence, ResourceActor};

    #[tokio::test]
    async fn test_pending_reports_hide_resolved_ones() {
        let (actor, inner) = ResourceActor::<MissingProductReport>::new(8, sequence());
        tokio::spawn(actor.run());
        let client = ReportClient::new(inner);

        let first = client
            .record_shortfall(ReportCreate {
                product_id: 1,
                product_name: "Mug".into(),
                requested_quantity: 2,
                customer_id: None,
                customer_name: "Guest".into(),
            })
            .await
            .unwrap();
        assert_eq!(first.status, ReportStatus::Pending);
        assert_eq!(first.request_count, 1);

        client
            .record_shortfall(ReportCreate {
                product_id: 2,
                product_name: "Lamp".into(),
                requested_quantity: 1,
                customer_id: Some(3),
                customer_name: "Cy".into(),
            })
            .await
            .unwrap();

        client.update_status(first.id, ReportStatus::Restocked).await.unwrap();

        let pending = client.list_pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].product_name, "Lamp");

        assert!(matches!(
            client.update_status(77, ReportStatus::Dismissed).await,
            Err(ReportError::NotFound(_))
        ));
    }
}
