use serde::{Deserialize, Serialize};

use crate::utils::format_phone;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Family {
    pub id: u32,
    pub name: String,
    #[serde(rename = "primaryContactId")]
    pub primary_contact_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Family {
    /// Display name for a party: "<Last> Family" for groups, the person's name otherwise.
    ///
    /// The registration sheet itself only ever produces "<Last> Family" for groups,
    /// which reads as " Family" when the last name cell is blank. This departs from
    /// that by using the first name instead ("Solo Family").
    pub fn display_name(first_name: &str, last_name: &str, party_size: u8) -> String {
        if party_size > 1 {
            let surname = if last_name.is_empty() { first_name } else { last_name };
            format!("{} Family", surname)
        } else {
            format!("{} {}", first_name, last_name).trim().to_string()
        }
    }

    pub fn contact_line(&self) -> Option<String> {
        match (&self.phone, &self.email) {
            (Some(phone), Some(email)) => Some(format!("{} / {}", format_phone(phone), email)),
            (Some(phone), None) => Some(format_phone(phone)),
            (None, Some(email)) => Some(email.clone()),
            (None, None) => None,
        }
    }
}
