//! Read-only detail card for one activity, with the placeholder text shown
//! for every blank field.

use crate::core::models::activity::Activity;

fn or<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    value.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(fallback)
}

pub struct ActivityInfo<'a> {
    activity: &'a Activity,
}

impl<'a> ActivityInfo<'a> {
    pub fn new(activity: &'a Activity) -> Self {
        Self { activity }
    }

    pub fn state(&self) -> &'a str {
        or(self.activity.county.as_deref(), "Not provided")
    }

    pub fn city(&self) -> &'a str {
        or(self.activity.city.as_deref(), "Not provided")
    }

    pub fn email(&self) -> &'a str {
        or(Some(self.activity.email.as_str()), "Not provided")
    }

    pub fn phone(&self) -> &'a str {
        or(self.activity.phone.as_deref(), "Not provided")
    }

    pub fn date(&self) -> String {
        self.activity.date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_else(|| "Flexible".into())
    }

    pub fn duration(&self) -> &'a str {
        or(self.activity.recurring_time.as_deref(), "Not specified")
    }

    pub fn description(&self) -> &'a str {
        or(Some(self.activity.description.as_str()), "No description available.")
    }

    pub fn requirements(&self) -> &'a str {
        or(self.activity.requirements.as_deref(), "No requirements provided.")
    }

    pub fn address(&self) -> &'a str {
        or(self.activity.address.as_deref(), "No address provided.")
    }
}
