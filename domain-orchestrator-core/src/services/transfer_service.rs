//! Domain transfer lifecycle service

use std::sync::Arc;

use chrono::Utc;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{CreateTransferRequest, DomainTransfer, TransferAction, TransferStatus};

/// Owns the transfer state machine. Every status change goes through
/// [`TransferStatus::transition`]; an action that is illegal in the current
/// state is rejected centrally with `InvalidTransition`.
pub struct TransferService {
    ctx: Arc<ServiceContext>,
}

impl TransferService {
    /// Create a transfer service instance
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Declare a new inbound transfer (starts `Pending`).
    pub async fn create(
        &self,
        school_id: &str,
        request: CreateTransferRequest,
    ) -> CoreResult<DomainTransfer> {
        if request.domain.is_empty() {
            return Err(CoreError::ValidationError("Domain is required".to_string()));
        }
        if request.admin_email.is_empty() {
            return Err(CoreError::ValidationError(
                "Administrative contact email is required".to_string(),
            ));
        }
        let transfer = DomainTransfer::new(school_id.to_string(), request);
        self.ctx.transfers.save(&transfer).await?;
        log::info!("Transfer declared for {} ({})", transfer.domain, transfer.id);
        Ok(transfer)
    }

    /// Fetch one transfer.
    pub async fn get(&self, school_id: &str, transfer_id: &str) -> CoreResult<DomainTransfer> {
        self.ctx
            .transfers
            .find_by_id(school_id, transfer_id)
            .await?
            .ok_or_else(|| CoreError::TransferNotFound(transfer_id.to_string()))
    }

    /// List a tenant's transfers.
    pub async fn list_for_school(&self, school_id: &str) -> CoreResult<Vec<DomainTransfer>> {
        self.ctx.transfers.find_by_school(school_id).await
    }

    /// Registrar-side processing of a pending transfer. A registrar failure
    /// applies the `Fail` transition and records the reason on the entity
    /// instead of bubbling up.
    pub async fn begin_processing(
        &self,
        school_id: &str,
        transfer_id: &str,
    ) -> CoreResult<DomainTransfer> {
        let mut transfer = self.get(school_id, transfer_id).await?;
        let next = Self::require_transition(&transfer, TransferAction::BeginProcessing)?;

        match self.ctx.registrar.process_transfer(&transfer.domain).await {
            Ok(()) => transfer.transfer_status = next,
            Err(e) => {
                log::warn!("Registrar rejected transfer of {}: {e}", transfer.domain);
                transfer.transfer_status = TransferStatus::Failed;
                transfer.transfer_notes = Some(e.to_string());
            }
        }
        transfer.touch();
        self.ctx.transfers.save(&transfer).await?;
        Ok(transfer)
    }

    /// Submit the EPP auth code. From `Pending` this registers intent and
    /// moves to `AwaitingApproval` without storing the code; from
    /// `AwaitingApproval` the code is stored and the transfer moves to
    /// `Processing`.
    pub async fn submit_auth_code(
        &self,
        school_id: &str,
        transfer_id: &str,
        auth_code: &str,
    ) -> CoreResult<DomainTransfer> {
        if auth_code.is_empty() {
            return Err(CoreError::ValidationError(
                "Authorization code is required".to_string(),
            ));
        }
        let mut transfer = self.get(school_id, transfer_id).await?;
        let next = Self::require_transition(&transfer, TransferAction::SubmitAuthCode)?;

        if transfer.transfer_status == TransferStatus::Pending && transfer.auth_code.is_some() {
            return Err(CoreError::PreconditionFailed(
                "An authorization code was already submitted for this transfer".to_string(),
            ));
        }

        if next == TransferStatus::Processing {
            transfer.auth_code = Some(auth_code.to_string());
            if let Err(e) = self.ctx.registrar.process_transfer(&transfer.domain).await {
                log::warn!("Registrar rejected auth code for {}: {e}", transfer.domain);
                transfer.transfer_status = TransferStatus::Failed;
                transfer.transfer_notes = Some(e.to_string());
                transfer.touch();
                self.ctx.transfers.save(&transfer).await?;
                return Ok(transfer);
            }
        }

        transfer.transfer_status = next;
        transfer.touch();
        self.ctx.transfers.save(&transfer).await?;
        Ok(transfer)
    }

    /// Administrative approval of a processing transfer; sets
    /// `completed_at`, the terminal success state.
    pub async fn approve(&self, school_id: &str, transfer_id: &str) -> CoreResult<DomainTransfer> {
        let mut transfer = self.get(school_id, transfer_id).await?;
        let next = Self::require_transition(&transfer, TransferAction::Approve)?;

        match self.ctx.registrar.approve_transfer(&transfer.domain).await {
            Ok(()) => {
                transfer.transfer_status = next;
                transfer.completed_at = Some(Utc::now());
                log::info!("Transfer completed for {}", transfer.domain);
            }
            Err(e) => {
                log::warn!("Registrar refused approval for {}: {e}", transfer.domain);
                transfer.transfer_status = TransferStatus::Failed;
                transfer.transfer_notes = Some(e.to_string());
            }
        }
        transfer.touch();
        self.ctx.transfers.save(&transfer).await?;
        Ok(transfer)
    }

    /// Abandon a non-terminal transfer.
    pub async fn cancel(&self, school_id: &str, transfer_id: &str) -> CoreResult<DomainTransfer> {
        self.apply(school_id, transfer_id, TransferAction::Cancel).await
    }

    /// Record a registrar-side failure on a non-terminal transfer.
    pub async fn fail(
        &self,
        school_id: &str,
        transfer_id: &str,
        reason: &str,
    ) -> CoreResult<DomainTransfer> {
        let mut transfer = self.apply(school_id, transfer_id, TransferAction::Fail).await?;
        transfer.transfer_notes = Some(reason.to_string());
        self.ctx.transfers.save(&transfer).await?;
        Ok(transfer)
    }

    /// Engage the registrar lock. Always permitted; locking a domain
    /// mid-transfer is a legitimate operational step.
    pub async fn lock_domain(
        &self,
        school_id: &str,
        transfer_id: &str,
    ) -> CoreResult<DomainTransfer> {
        self.set_lock(school_id, transfer_id, true).await
    }

    /// Release the registrar lock. Always permitted.
    pub async fn unlock_domain(
        &self,
        school_id: &str,
        transfer_id: &str,
    ) -> CoreResult<DomainTransfer> {
        self.set_lock(school_id, transfer_id, false).await
    }

    /// Flip or set auto-renewal.
    pub async fn set_auto_renew(
        &self,
        school_id: &str,
        transfer_id: &str,
        auto_renew: Option<bool>,
    ) -> CoreResult<DomainTransfer> {
        let mut transfer = self.get(school_id, transfer_id).await?;
        transfer.auto_renew = auto_renew.unwrap_or(!transfer.auto_renew);
        transfer.touch();
        self.ctx.transfers.save(&transfer).await?;
        Ok(transfer)
    }

    /// Delete a transfer record. Permitted only for `Pending`, `Failed`, or
    /// `Cancelled`; in-flight or completed transfers must not be silently
    /// discarded. Associated DNS records survive — deleting routing along
    /// with the paperwork would orphan live traffic.
    pub async fn delete(&self, school_id: &str, transfer_id: &str) -> CoreResult<()> {
        let transfer = self.get(school_id, transfer_id).await?;
        if !transfer.transfer_status.is_deletable() {
            return Err(CoreError::PreconditionFailed(format!(
                "A transfer in state {} cannot be deleted",
                transfer.transfer_status
            )));
        }
        self.ctx.transfers.delete(school_id, transfer_id).await
    }

    async fn set_lock(
        &self,
        school_id: &str,
        transfer_id: &str,
        locked: bool,
    ) -> CoreResult<DomainTransfer> {
        let mut transfer = self.get(school_id, transfer_id).await?;
        transfer.lock_status = locked;
        transfer.touch();
        self.ctx.transfers.save(&transfer).await?;
        Ok(transfer)
    }

    async fn apply(
        &self,
        school_id: &str,
        transfer_id: &str,
        action: TransferAction,
    ) -> CoreResult<DomainTransfer> {
        let mut transfer = self.get(school_id, transfer_id).await?;
        transfer.transfer_status = Self::require_transition(&transfer, action)?;
        transfer.touch();
        self.ctx.transfers.save(&transfer).await?;
        Ok(transfer)
    }

    fn require_transition(
        transfer: &DomainTransfer,
        action: TransferAction,
    ) -> CoreResult<TransferStatus> {
        transfer
            .transfer_status
            .transition(action)
            .ok_or_else(|| CoreError::InvalidTransition {
                entity: "transfer",
                from: transfer.transfer_status.to_string(),
                action: action.to_string(),
            })
    }
}
