use std::fmt::{self, Display};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Volunteer,
    Workshop,
    Fundraiser,
    Other,
}

impl ActivityType {
    pub const ALL: [ActivityType; 4] = [Self::Volunteer, Self::Workshop, Self::Fundraiser, Self::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Volunteer => "volunteer",
            Self::Workshop => "workshop",
            Self::Fundraiser => "fundraiser",
            Self::Other => "other",
        }
    }
}

impl Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::invalid_field("activity type", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityField {
    Medical,
    Tech,
    Education,
    Social,
    #[serde(rename = "Animal-Related")]
    AnimalRelated,
    Environmental,
    Other,
}

impl ActivityField {
    pub const ALL: [ActivityField; 7] = [
        Self::Medical,
        Self::Tech,
        Self::Education,
        Self::Social,
        Self::AnimalRelated,
        Self::Environmental,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Medical => "Medical",
            Self::Tech => "Tech",
            Self::Education => "Education",
            Self::Social => "Social",
            Self::AnimalRelated => "Animal-Related",
            Self::Environmental => "Environmental",
            Self::Other => "Other",
        }
    }
}

impl Display for ActivityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityField {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| Error::invalid_field("activity field", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: i32,
    pub name: String,
    pub link: Option<String>,
    #[serde(rename = "type")]
    pub type_: ActivityType,
    pub field: ActivityField,
    pub description: String,
    pub requirements: Option<String>,
    pub owner_id: Uuid,
    pub email: String,
    pub phone: Option<String>,
    pub date: Option<NaiveDate>,
    pub recurring_time: Option<String>,
    pub county: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
}

impl Activity {
    pub fn is_owned_by(&self, uid: Uuid) -> bool {
        self.owner_id == uid
    }
}

// activities table as stored, type_ and field kept as text
#[derive(Debug, Clone, FromRow)]
pub struct ActivityRow {
    pub id: i32,
    pub name: String,
    pub link: Option<String>,
    pub type_: String,
    pub field: String,
    pub description: String,
    pub requirements: Option<String>,
    pub owner_id: Uuid,
    pub email: String,
    pub phone: Option<String>,
    pub date: Option<NaiveDate>,
    pub recurring_time: Option<String>,
    pub county: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
}

impl TryFrom<ActivityRow> for Activity {
    type Error = Error;
    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        Ok(Activity {
            id: row.id,
            name: row.name,
            link: row.link,
            type_: row.type_.parse()?,
            field: row.field.parse()?,
            description: row.description,
            requirements: row.requirements,
            owner_id: row.owner_id,
            email: row.email,
            phone: row.phone,
            date: row.date,
            recurring_time: row.recurring_time,
            county: row.county,
            city: row.city,
            address: row.address,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub name: String,
    pub link: Option<String>,
    pub type_: ActivityType,
    pub field: ActivityField,
    pub description: String,
    pub requirements: Option<String>,
    pub owner_id: Uuid,
    pub email: String,
    pub phone: Option<String>,
    pub date: Option<NaiveDate>,
    pub recurring_time: Option<String>,
    pub county: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
}

impl Insert {
    pub fn into_activity(self, id: i32) -> Activity {
        Activity {
            id,
            name: self.name,
            link: self.link,
            type_: self.type_,
            field: self.field,
            description: self.description,
            requirements: self.requirements,
            owner_id: self.owner_id,
            email: self.email,
            phone: self.phone,
            date: self.date,
            recurring_time: self.recurring_time,
            county: self.county,
            city: self.city,
            address: self.address,
        }
    }
}

// everything but the owner, which never changes
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub name: String,
    pub link: Option<String>,
    pub type_: ActivityType,
    pub field: ActivityField,
    pub description: String,
    pub requirements: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub date: Option<NaiveDate>,
    pub recurring_time: Option<String>,
    pub county: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
}

impl Update {
    pub fn apply_to(self, activity: &mut Activity) {
        activity.name = self.name;
        activity.link = self.link;
        activity.type_ = self.type_;
        activity.field = self.field;
        activity.description = self.description;
        activity.requirements = self.requirements;
        activity.email = self.email;
        activity.phone = self.phone;
        activity.date = self.date;
        activity.recurring_time = self.recurring_time;
        activity.county = self.county;
        activity.city = self.city;
        activity.address = self.address;
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Query {
    pub owner_id_eq: Option<Uuid>,
}
