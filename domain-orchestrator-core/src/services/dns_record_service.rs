//! DNS record management service

use std::sync::Arc;

use chrono::Utc;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{CreateDnsRecordRequest, DnsRecord, UpdateDnsRecordRequest};
use crate::validation;

/// Manages a tenant's DNS record set. Every create/update validates before
/// anything is persisted; the root `NS`/`@` record is immutable and
/// non-deletable at this layer (the validator stays pure).
pub struct DnsRecordService {
    ctx: Arc<ServiceContext>,
}

impl DnsRecordService {
    /// Create a DNS record service instance
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Fetch one record.
    pub async fn get(&self, school_id: &str, record_id: &str) -> CoreResult<DnsRecord> {
        self.ctx
            .dns_records
            .find_by_id(school_id, record_id)
            .await?
            .ok_or_else(|| CoreError::RecordNotFound(record_id.to_string()))
    }

    /// List a tenant's records.
    pub async fn list_for_school(&self, school_id: &str) -> CoreResult<Vec<DnsRecord>> {
        self.ctx.dns_records.find_by_school(school_id).await
    }

    /// Records associated with one transfer.
    pub async fn list_for_transfer(
        &self,
        school_id: &str,
        transfer_id: &str,
    ) -> CoreResult<Vec<DnsRecord>> {
        self.ctx
            .dns_records
            .find_by_transfer(school_id, transfer_id)
            .await
    }

    /// Validate and create a record.
    pub async fn create(
        &self,
        school_id: &str,
        request: CreateDnsRecordRequest,
    ) -> CoreResult<DnsRecord> {
        validation::validate_record(
            request.record_type,
            &request.name,
            &request.value,
            request.priority,
        )?;

        let now = Utc::now();
        let record = DnsRecord {
            id: uuid::Uuid::new_v4().to_string(),
            school_id: school_id.to_string(),
            transfer_id: request.transfer_id,
            record_type: request.record_type,
            name: request.name,
            value: request.value,
            ttl: request.ttl,
            priority: request.priority,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.ctx.dns_records.save(&record).await?;
        Ok(record)
    }

    /// Validate and update a record. The root nameserver record is immutable.
    pub async fn update(
        &self,
        school_id: &str,
        record_id: &str,
        request: UpdateDnsRecordRequest,
    ) -> CoreResult<DnsRecord> {
        let mut record = self.get(school_id, record_id).await?;

        if record.is_root_ns() {
            return Err(CoreError::PreconditionFailed(
                "The root nameserver record cannot be modified".to_string(),
            ));
        }

        validation::validate_record(
            record.record_type,
            &request.name,
            &request.value,
            request.priority,
        )?;

        record.name = request.name;
        record.value = request.value;
        record.ttl = request.ttl;
        record.priority = request.priority;
        if let Some(is_active) = request.is_active {
            record.is_active = is_active;
        }
        record.touch();
        self.ctx.dns_records.save(&record).await?;
        Ok(record)
    }

    /// Delete a record. The root nameserver record is protected.
    pub async fn delete(&self, school_id: &str, record_id: &str) -> CoreResult<()> {
        let record = self.get(school_id, record_id).await?;
        if record.is_root_ns() {
            return Err(CoreError::PreconditionFailed(
                "The root nameserver record cannot be deleted".to_string(),
            ));
        }
        self.ctx.dns_records.delete(school_id, record_id).await
    }
}
