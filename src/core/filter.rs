//! Pure derivation of the browse view: a base list plus four selectors in,
//! the matching subset and the dropdown options out.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::core::models::activity::{Activity, ActivityField, ActivityType};
use crate::error::Error;

pub const ANY: &str = "none";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector<T> {
    Any,
    Is(T),
}

impl<T> Default for Selector<T> {
    fn default() -> Self {
        Selector::Any
    }
}

impl<T: PartialEq> Selector<T> {
    pub fn is_any(&self) -> bool {
        matches!(self, Selector::Any)
    }

    pub fn matches(&self, value: Option<&T>) -> bool {
        match self {
            Selector::Any => true,
            Selector::Is(wanted) => value == Some(wanted),
        }
    }
}

impl<T> Selector<T> {
    /// `None`, `""` and `"none"` are all unconstrained.
    pub fn parse_with<F>(raw: Option<&str>, parse: F) -> Result<Self, Error>
    where
        F: FnOnce(&str) -> Result<T, Error>,
    {
        match raw.map(str::trim) {
            None | Some("") | Some(ANY) => Ok(Selector::Any),
            Some(v) => Ok(Selector::Is(parse(v)?)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityFilter {
    pub county: Selector<String>,
    pub city: Selector<String>,
    pub type_: Selector<ActivityType>,
    pub field: Selector<ActivityField>,
}

impl ActivityFilter {
    pub fn from_params(county: Option<&str>, city: Option<&str>, type_: Option<&str>, field: Option<&str>) -> Result<Self, Error> {
        Ok(Self {
            county: Selector::parse_with(county, |v| Ok(v.to_owned()))?,
            city: Selector::parse_with(city, |v| Ok(v.to_owned()))?,
            type_: Selector::parse_with(type_, str::parse)?,
            field: Selector::parse_with(field, str::parse)?,
        })
    }

    /// Changing the county always drops the city selection.
    pub fn select_county(&mut self, county: Selector<String>) {
        self.county = county;
        self.city = Selector::Any;
    }

    pub fn matches(&self, activity: &Activity) -> bool {
        self.county.matches(activity.county.as_ref())
            && self.city.matches(activity.city.as_ref())
            && self.type_.matches(Some(&activity.type_))
            && self.field.matches(Some(&activity.field))
    }
}

pub fn apply(activities: &[Activity], filter: &ActivityFilter) -> Vec<Activity> {
    activities.iter().filter(|a| filter.matches(a)).cloned().collect()
}

fn non_empty(v: &Option<String>) -> Option<&String> {
    v.as_ref().filter(|s| !s.trim().is_empty())
}

pub fn counties(activities: &[Activity]) -> Vec<String> {
    activities.iter().filter_map(|a| non_empty(&a.county)).unique().cloned().collect()
}

/// Cities among the activities in the selected county. Nothing is offered
/// until a county is chosen.
pub fn cities(activities: &[Activity], county: &Selector<String>) -> Vec<String> {
    if county.is_any() {
        return Vec::new();
    }
    activities
        .iter()
        .filter(|a| county.matches(a.county.as_ref()))
        .filter_map(|a| non_empty(&a.city))
        .unique()
        .cloned()
        .collect()
}

pub fn types(activities: &[Activity]) -> Vec<ActivityType> {
    activities.iter().map(|a| a.type_).unique().collect()
}

pub fn fields(activities: &[Activity]) -> Vec<ActivityField> {
    activities.iter().map(|a| a.field).unique().collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub counties: Vec<String>,
    pub cities: Vec<String>,
    pub types: Vec<ActivityType>,
    pub fields: Vec<ActivityField>,
}

impl FilterOptions {
    /// Options come from the full list, never the filtered one, so choices do
    /// not shrink as selectors are applied. Only cities follow the county.
    pub fn derive(activities: &[Activity], filter: &ActivityFilter) -> Self {
        Self {
            counties: counties(activities),
            cities: cities(activities, &filter.county),
            types: types(activities),
            fields: fields(activities),
        }
    }
}
