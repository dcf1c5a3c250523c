//! Contact inbox records and phone-field normalization.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::ResourceKind;

/// An inbound contact message as the server returns it.
///
/// The phone fields have drifted through several backend revisions; every
/// historical key is captured so [`resolve_phone`] can pick the survivor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub phone: PhoneFields,
}

/// Every key name the message source has historically used for the phone
/// number and country code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PhoneFields {
    #[serde(default, rename = "countryCode")]
    pub country_code: Option<String>,
    #[serde(default, rename = "country_code")]
    pub country_code_snake: Option<String>,
    #[serde(default)]
    pub cc: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, rename = "phoneNumber")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default, rename = "contactNumber")]
    pub contact_number: Option<String>,
}

/// A phone resolved to one display value per sub-field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPhone {
    pub country_code: String,
    pub phone: String,
}

impl ResolvedPhone {
    /// Renders for display: dash placeholder when no number, country code
    /// prefixed with a single space when present.
    pub fn display(&self) -> String {
        if self.phone.is_empty() {
            return "-".to_string();
        }
        if self.country_code.is_empty() {
            self.phone.clone()
        } else {
            format!("{} {}", self.country_code, self.phone)
        }
    }
}

/// Resolves the phone fields of a record, first non-empty key winning,
/// independently per sub-field.
///
/// Country code order: `countryCode`, `country_code`, `cc`.
/// Phone order: `phone`, `phoneNumber`, `mobile`, `contactNumber`.
pub fn resolve_phone(record: &PhoneFields) -> ResolvedPhone {
    ResolvedPhone {
        country_code: first_non_empty(&[
            &record.country_code,
            &record.country_code_snake,
            &record.cc,
        ]),
        phone: first_non_empty(&[
            &record.phone,
            &record.phone_number,
            &record.mobile,
            &record.contact_number,
        ]),
    }
}

fn first_non_empty(candidates: &[&Option<String>]) -> String {
    candidates
        .iter()
        .filter_map(|candidate| candidate.as_deref())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(ToString::to_string)
        .unwrap_or_default()
}

/// Kind descriptor for the `/contact` collection.
///
/// Messages are read and deleted only; the console never creates them, and
/// no image part applies.
#[derive(Debug, Clone, Copy)]
pub struct Messages;

impl ResourceKind for Messages {
    type Record = Message;
    const PATH: &'static str = "/contact";
    const NAME: &'static str = "message";
    const ACCEPTS_IMAGE: bool = false;

    fn id(record: &Self::Record) -> &str {
        &record.id
    }
}
