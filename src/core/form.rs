use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::models::activity::{Activity, Insert, Update};
use crate::error::Error;

pub const FIELD_IDS: [&str; 13] = [
    "name",
    "link",
    "type",
    "field",
    "description",
    "requirements",
    "email",
    "phone",
    "date",
    "recurring_time",
    "county",
    "city",
    "address",
];

/// Fields a new activity must carry.
pub const CREATE_REQUIRED: [&str; 12] = [
    "name",
    "type",
    "field",
    "email",
    "date",
    "county",
    "city",
    "description",
    "phone",
    "requirements",
    "recurring_time",
    "address",
];

/// Fields an edited activity must keep.
pub const EDIT_REQUIRED: [&str; 8] = ["name", "type", "field", "email", "date", "county", "city", "description"];

pub const US_STATES: [&str; 50] = [
    "Alabama",
    "Alaska",
    "Arizona",
    "Arkansas",
    "California",
    "Colorado",
    "Connecticut",
    "Delaware",
    "Florida",
    "Georgia",
    "Hawaii",
    "Idaho",
    "Illinois",
    "Indiana",
    "Iowa",
    "Kansas",
    "Kentucky",
    "Louisiana",
    "Maine",
    "Maryland",
    "Massachusetts",
    "Michigan",
    "Minnesota",
    "Mississippi",
    "Missouri",
    "Montana",
    "Nebraska",
    "Nevada",
    "New Hampshire",
    "New Jersey",
    "New Mexico",
    "New York",
    "North Carolina",
    "North Dakota",
    "Ohio",
    "Oklahoma",
    "Oregon",
    "Pennsylvania",
    "Rhode Island",
    "South Carolina",
    "South Dakota",
    "Tennessee",
    "Texas",
    "Utah",
    "Vermont",
    "Virginia",
    "Washington",
    "West Virginia",
    "Wisconsin",
    "Wyoming",
];

pub fn display_name(id: &str) -> &str {
    match id {
        "name" => "Organization Name",
        "link" => "Activity Link",
        "type" => "Activity Type",
        "field" => "Activity Field",
        "description" => "Description",
        "requirements" => "Requirements",
        "email" => "Contact Email",
        "phone" => "Phone Number",
        "date" => "Date",
        "recurring_time" => "Duration",
        "county" => "State",
        "city" => "City",
        "address" => "Specific Location",
        other => other,
    }
}

/// Flat record behind the create/edit forms. Every input is kept as the raw
/// string the user typed; typing happens in `to_insert`/`to_update`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityForm {
    pub name: String,
    pub link: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub field: String,
    pub description: String,
    pub requirements: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub recurring_time: String,
    pub county: String,
    pub city: String,
    pub address: String,
}

fn optional(v: &str) -> Option<String> {
    let v = v.trim();
    if v.is_empty() {
        None
    } else {
        Some(v.to_owned())
    }
}

impl ActivityForm {
    fn slot(&mut self, id: &str) -> Option<&mut String> {
        let slot = match id {
            "name" => &mut self.name,
            "link" => &mut self.link,
            "type" => &mut self.type_,
            "field" => &mut self.field,
            "description" => &mut self.description,
            "requirements" => &mut self.requirements,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "date" => &mut self.date,
            "recurring_time" => &mut self.recurring_time,
            "county" => &mut self.county,
            "city" => &mut self.city,
            "address" => &mut self.address,
            _ => return None,
        };
        Some(slot)
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        let v = match id {
            "name" => &self.name,
            "link" => &self.link,
            "type" => &self.type_,
            "field" => &self.field,
            "description" => &self.description,
            "requirements" => &self.requirements,
            "email" => &self.email,
            "phone" => &self.phone,
            "date" => &self.date,
            "recurring_time" => &self.recurring_time,
            "county" => &self.county,
            "city" => &self.city,
            "address" => &self.address,
            _ => return None,
        };
        Some(v.as_str())
    }

    /// Mirrors an input change into the record by its element id.
    pub fn set(&mut self, id: &str, value: impl Into<String>) -> Result<(), Error> {
        let slot = self.slot(id).ok_or_else(|| Error::invalid_field("form field", id))?;
        *slot = value.into();
        Ok(())
    }

    pub fn from_activity(activity: &Activity) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            name: activity.name.clone(),
            link: text(&activity.link),
            type_: activity.type_.to_string(),
            field: activity.field.to_string(),
            description: activity.description.clone(),
            requirements: text(&activity.requirements),
            email: activity.email.clone(),
            phone: text(&activity.phone),
            date: activity.date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
            recurring_time: text(&activity.recurring_time),
            county: text(&activity.county),
            city: text(&activity.city),
            address: text(&activity.address),
        }
    }

    /// Display names of the required fields that are blank, in list order.
    pub fn missing_fields(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|id| self.get(id).map_or(true, |v| v.trim().is_empty()))
            .map(|id| display_name(id).to_owned())
            .collect()
    }

    pub fn validate(&self, required: &[&str]) -> Result<(), Error> {
        let missing = self.missing_fields(required);
        if !missing.is_empty() {
            return Err(Error::MissingFields(missing));
        }
        Ok(())
    }

    fn parse_date(&self) -> Result<Option<NaiveDate>, Error> {
        match optional(&self.date) {
            None => Ok(None),
            Some(d) => NaiveDate::parse_from_str(&d, "%Y-%m-%d").map(Some).map_err(|_| Error::invalid_field("date", &d)),
        }
    }

    pub fn to_insert(&self, owner_id: Uuid) -> Result<Insert, Error> {
        self.validate(&CREATE_REQUIRED)?;
        Ok(Insert {
            name: self.name.trim().to_owned(),
            link: optional(&self.link),
            type_: self.type_.trim().parse()?,
            field: self.field.trim().parse()?,
            description: self.description.trim().to_owned(),
            requirements: optional(&self.requirements),
            owner_id,
            email: self.email.trim().to_owned(),
            phone: optional(&self.phone),
            date: self.parse_date()?,
            recurring_time: optional(&self.recurring_time),
            county: optional(&self.county),
            city: optional(&self.city),
            address: optional(&self.address),
        })
    }

    pub fn to_update(&self) -> Result<Update, Error> {
        self.validate(&EDIT_REQUIRED)?;
        Ok(Update {
            name: self.name.trim().to_owned(),
            link: optional(&self.link),
            type_: self.type_.trim().parse()?,
            field: self.field.trim().parse()?,
            description: self.description.trim().to_owned(),
            requirements: optional(&self.requirements),
            email: self.email.trim().to_owned(),
            phone: optional(&self.phone),
            date: self.parse_date()?,
            recurring_time: optional(&self.recurring_time),
            county: optional(&self.county),
            city: optional(&self.city),
            address: optional(&self.address),
        })
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::core::models::activity::{ActivityField, ActivityType};

    pub(crate) fn complete_form() -> ActivityForm {
        let mut form = ActivityForm::default();
        for (id, value) in [
            ("name", "Eastside Food Bank"),
            ("link", "https://example.org/signup"),
            ("type", "volunteer"),
            ("field", "Social"),
            ("description", "Sort and pack donations"),
            ("requirements", "Closed-toe shoes"),
            ("email", "team@foodbank.org"),
            ("phone", "512-555-0100"),
            ("date", "2026-11-07"),
            ("recurring_time", "Saturdays 9-12"),
            ("county", "Travis"),
            ("city", "Austin"),
            ("address", "100 Main St"),
        ] {
            form.set(id, value).unwrap();
        }
        form
    }

    #[test]
    fn test_missing_description_and_phone() {
        let mut form = complete_form();
        form.set("description", "").unwrap();
        form.set("phone", "   ").unwrap();
        let err = form.to_insert(Uuid::new_v4()).unwrap_err();
        match &err {
            Error::MissingFields(fields) => assert_eq!(fields, &vec!["Description".to_string(), "Phone Number".to_string()]),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.to_string(), "Please fill out these required fields: Description, Phone Number");
    }

    #[test]
    fn test_edit_requires_fewer_fields() {
        let mut form = complete_form();
        form.set("phone", "").unwrap();
        form.set("address", "").unwrap();
        form.set("requirements", "").unwrap();
        assert!(form.validate(&CREATE_REQUIRED).is_err());
        let update = form.to_update().unwrap();
        assert_eq!(update.phone, None);
        assert_eq!(update.address, None);
    }

    #[test]
    fn test_unknown_field_id_is_rejected() {
        let mut form = ActivityForm::default();
        assert!(form.set("Org_Info", "x").is_err());
        assert_eq!(form, ActivityForm::default());
    }

    #[test]
    fn test_to_insert_types_the_record() {
        let owner = Uuid::new_v4();
        let insert = complete_form().to_insert(owner).unwrap();
        assert_eq!(insert.owner_id, owner);
        assert_eq!(insert.type_, ActivityType::Volunteer);
        assert_eq!(insert.field, ActivityField::Social);
        assert_eq!(insert.date, NaiveDate::from_ymd_opt(2026, 11, 7));
        assert_eq!(insert.city.as_deref(), Some("Austin"));
    }

    #[test]
    fn test_bad_enum_or_date_is_invalid_field() {
        let mut form = complete_form();
        form.set("type", "gala").unwrap();
        assert!(matches!(form.to_insert(Uuid::nil()), Err(Error::InvalidField { .. })));
        let mut form = complete_form();
        form.set("date", "next week").unwrap();
        assert!(matches!(form.to_insert(Uuid::nil()), Err(Error::InvalidField { .. })));
    }

    #[test]
    fn test_form_round_trips_through_activity() {
        let insert = complete_form().to_insert(Uuid::nil()).unwrap();
        let activity = insert.into_activity(3);
        assert_eq!(ActivityForm::from_activity(&activity), complete_form());
    }

    #[test]
    fn test_every_field_id_is_settable() {
        let mut form = ActivityForm::default();
        for id in FIELD_IDS {
            form.set(id, "x").unwrap();
            assert_eq!(form.get(id), Some("x"));
        }
    }
}
