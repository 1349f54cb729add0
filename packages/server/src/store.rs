//! Persistence seam for the matching services.

use async_trait::async_trait;
use chrono::Utc;
use matching::{
    BloodRequest, DonationEvent, DonationHistory, DonorProfile, DonorRecord, HospitalContact,
    RequestStatus,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use thiserror::Error;
use uuid::Uuid;

use crate::entity::{blood_request, donation, donor, profile};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] DbErr),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Read access to requests and donors, plus the one status write alerting needs.
#[async_trait]
pub trait DonorStore: Send + Sync {
    async fn fetch_request(&self, id: Uuid) -> Result<Option<BloodRequest>, StoreError>;

    /// Donor records owned by one hospital.
    async fn fetch_hospital_donors(&self, hospital_id: Uuid)
    -> Result<Vec<DonorRecord>, StoreError>;

    /// Every profile that has a blood group set.
    async fn fetch_all_donor_profiles(&self) -> Result<Vec<DonorProfile>, StoreError>;

    /// Donation count and latest donation date of a self-registered donor.
    async fn fetch_donation_history(&self, user_id: Uuid) -> Result<DonationHistory, StoreError>;

    async fn fetch_hospital_contact(
        &self,
        hospital_id: Uuid,
    ) -> Result<Option<HospitalContact>, StoreError>;

    async fn mark_alert_sent(&self, request_id: Uuid) -> Result<(), StoreError>;
}

/// [`DonorStore`] backed by the application database.
#[derive(Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DonorStore for SeaOrmStore {
    async fn fetch_request(&self, id: Uuid) -> Result<Option<BloodRequest>, StoreError> {
        let model = blood_request::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(BloodRequest::from))
    }

    async fn fetch_hospital_donors(
        &self,
        hospital_id: Uuid,
    ) -> Result<Vec<DonorRecord>, StoreError> {
        let models = donor::Entity::find()
            .filter(donor::Column::HospitalId.eq(hospital_id))
            .order_by_asc(donor::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(DonorRecord::from).collect())
    }

    async fn fetch_all_donor_profiles(&self) -> Result<Vec<DonorProfile>, StoreError> {
        let models = profile::Entity::find()
            .filter(profile::Column::BloodGroup.is_not_null())
            .order_by_asc(profile::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models
            .into_iter()
            .filter_map(profile::Model::into_donor_profile)
            .collect())
    }

    async fn fetch_donation_history(&self, user_id: Uuid) -> Result<DonationHistory, StoreError> {
        let events: Vec<DonationEvent> = donation::Entity::find()
            .filter(donation::Column::DonorUserId.eq(user_id))
            .order_by_desc(donation::Column::DonationDate)
            .all(&self.db)
            .await?
            .into_iter()
            .map(DonationEvent::from)
            .collect();
        Ok(DonationHistory::from_events(&events))
    }

    async fn fetch_hospital_contact(
        &self,
        hospital_id: Uuid,
    ) -> Result<Option<HospitalContact>, StoreError> {
        let model = profile::Entity::find_by_id(hospital_id).one(&self.db).await?;
        Ok(model.map(|m| m.hospital_contact()))
    }

    async fn mark_alert_sent(&self, request_id: Uuid) -> Result<(), StoreError> {
        let update = blood_request::ActiveModel {
            id: Set(request_id),
            status: Set(RequestStatus::AlertSent),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        update.update(&self.db).await?;
        Ok(())
    }
}
