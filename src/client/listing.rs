use std::sync::Arc;

use crate::client::backend::ActivityBackend;
use crate::core::filter::{self, ActivityFilter, FilterOptions, Selector};
use crate::core::models::activity::Activity;
use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingStatus {
    Loading,
    Failed(String),
    NoResults,
    Results(usize),
}

/// Public browse view: all activities fetched once, narrowed by four
/// selectors on the client.
pub struct ActivityListing<B> {
    backend: Arc<B>,
    activities: Option<Vec<Activity>>,
    error: Option<String>,
    filter: ActivityFilter,
}

impl<B> ActivityListing<B>
where
    B: ActivityBackend,
{
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            activities: None,
            error: None,
            filter: ActivityFilter::default(),
        }
    }

    pub async fn load(&mut self) {
        match self.backend.list_activities(None).await {
            Ok(list) => {
                self.activities = Some(list);
                self.error = None;
            }
            Err(e) => {
                log::error!("failed to load activities: {}", e);
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn filter(&self) -> &ActivityFilter {
        &self.filter
    }

    pub fn select_county(&mut self, raw: &str) {
        let county = Selector::parse_with(Some(raw), |v| Ok(v.to_owned())).unwrap_or_default();
        self.filter.select_county(county);
    }

    pub fn select_city(&mut self, raw: &str) {
        self.filter.city = Selector::parse_with(Some(raw), |v| Ok(v.to_owned())).unwrap_or_default();
    }

    pub fn select_type(&mut self, raw: &str) -> Result<(), Error> {
        self.filter.type_ = Selector::parse_with(Some(raw), str::parse)?;
        Ok(())
    }

    pub fn select_field(&mut self, raw: &str) -> Result<(), Error> {
        self.filter.field = Selector::parse_with(Some(raw), str::parse)?;
        Ok(())
    }

    pub fn clear_filters(&mut self) {
        self.filter = ActivityFilter::default();
    }

    /// `None` until the first successful load.
    pub fn filtered(&self) -> Option<Vec<Activity>> {
        self.activities.as_deref().map(|all| filter::apply(all, &self.filter))
    }

    pub fn options(&self) -> FilterOptions {
        FilterOptions::derive(self.activities.as_deref().unwrap_or_default(), &self.filter)
    }

    pub fn status(&self) -> ListingStatus {
        if let Some(e) = &self.error {
            return ListingStatus::Failed(e.clone());
        }
        match self.filtered() {
            None => ListingStatus::Loading,
            Some(list) if list.is_empty() => ListingStatus::NoResults,
            Some(list) => ListingStatus::Results(list.len()),
        }
    }
}
