use matching::{BloodRequest, RequestStatus, UrgencyLevel};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blood_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Profile id of the requesting hospital.
    pub hospital_id: Option<Uuid>,
    pub blood_group: String,
    pub units_needed: i32,
    pub urgency_level: UrgencyLevel,
    pub patient_name: String,
    pub patient_contact: String,
    pub status: RequestStatus,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for BloodRequest {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            hospital_id: m.hospital_id,
            blood_group: m.blood_group,
            units_needed: m.units_needed,
            urgency_level: m.urgency_level,
            patient_name: m.patient_name,
            patient_contact: m.patient_contact,
            status: m.status,
        }
    }
}
