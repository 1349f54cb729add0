use matching::DonorRecord;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "donors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(indexed)]
    pub hospital_id: Uuid,
    pub full_name: String,
    pub blood_group: String,
    pub phone: String,
    pub email: Option<String>,
    pub location: String,
    /// Cached by the donation-recording flow.
    pub donation_count: Option<i32>,
    pub last_donation_date: Option<Date>,
    /// Self-registered account this record is linked to, if any.
    pub user_id: Option<Uuid>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for DonorRecord {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            full_name: m.full_name,
            blood_group: m.blood_group,
            phone: m.phone,
            email: m.email,
            location: m.location,
            donation_count: m
                .donation_count
                .and_then(|count| u32::try_from(count).ok())
                .unwrap_or(0),
            last_donation_date: m.last_donation_date,
            hospital_id: Some(m.hospital_id),
            linked_user_id: m.user_id,
        }
    }
}
