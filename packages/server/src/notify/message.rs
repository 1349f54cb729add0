//! Alert text shared by every recipient of one request.

use matching::{BloodRequest, HospitalContact};

const PATIENT_LIMIT: usize = 15;
const HOSPITAL_LIMIT: usize = 20;
const ADDRESS_LIMIT: usize = 25;
const ELLIPSIS: &str = "...";

/// Cut `s` to at most `limit` characters, marking the cut with `...`.
pub fn truncate(s: &str, limit: usize) -> String {
    if s.chars().count() <= limit {
        return s.to_string();
    }
    let kept: String = s.chars().take(limit.saturating_sub(ELLIPSIS.len())).collect();
    kept + ELLIPSIS
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    /// Compact SMS text; fields are truncated to keep it within one segment.
    pub sms_body: String,
    pub email_subject: String,
    blood_group: String,
    units_needed: i32,
    urgency: String,
    patient_name: String,
    patient_contact: String,
    hospital_name: String,
    hospital_address: Option<String>,
}

impl AlertMessage {
    pub fn compose(request: &BloodRequest, hospital: &HospitalContact) -> Self {
        let address = hospital
            .address
            .as_deref()
            .map(|a| truncate(a, ADDRESS_LIMIT))
            .unwrap_or_else(|| "Address not provided".into());
        let contact = hospital.phone.as_deref().unwrap_or("Contact not provided");

        let sms_body = format!(
            "URGENT BLOOD NEEDED\n\
             Type: {}\n\
             Units: {}\n\
             Patient: {}\n\
             Hospital: {}\n\
             Address: {}\n\
             Contact: {}\n\
             Save a life! Please respond if available. HEMO LINK Team",
            request.blood_group,
            request.units_needed,
            truncate(&request.patient_name, PATIENT_LIMIT),
            truncate(&hospital.name, HOSPITAL_LIMIT),
            address,
            contact,
        );

        Self {
            sms_body,
            email_subject: format!("URGENT: {} Blood Needed - HEMO LINK", request.blood_group),
            blood_group: request.blood_group.clone(),
            units_needed: request.units_needed,
            urgency: request.urgency_level.as_str().to_uppercase(),
            patient_name: request.patient_name.clone(),
            patient_contact: request.patient_contact.clone(),
            hospital_name: hospital.name.clone(),
            hospital_address: hospital.address.clone(),
        }
    }

    /// Personalised email body. Fields are not truncated here.
    pub fn email_html(&self, donor_name: &str) -> String {
        let address = self
            .hospital_address
            .as_deref()
            .map(|a| format!("<p><strong>Address:</strong> {}</p>", escape_html(a)))
            .unwrap_or_default();

        format!(
            "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
             <h1>URGENT BLOOD NEEDED</h1>\
             <p>Dear <strong>{donor}</strong>,</p>\
             <p>A patient urgently needs blood donation. Your blood type matches!</p>\
             <p><strong>Blood Type:</strong> {bg}</p>\
             <p><strong>Units Needed:</strong> {units}</p>\
             <p><strong>Urgency:</strong> {urgency}</p>\
             <p><strong>Patient:</strong> {patient}</p>\
             <p><strong>Contact:</strong> {contact}</p>\
             <p><strong>Hospital:</strong> {hospital}</p>\
             {address}\
             <p>Your donation can save a life! Please respond if available.</p>\
             <p>Thank you for being a blood donor.<br>- HEMO LINK Team</p>\
             </div>",
            donor = escape_html(donor_name),
            bg = escape_html(&self.blood_group),
            units = self.units_needed,
            urgency = self.urgency,
            patient = escape_html(&self.patient_name),
            contact = escape_html(&self.patient_contact),
            hospital = escape_html(&self.hospital_name),
        )
    }
}
