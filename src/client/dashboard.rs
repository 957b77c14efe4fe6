use std::sync::Arc;

use crate::client::backend::ActivityBackend;
use crate::client::guard::Route;
use crate::core::models::account::Account;
use crate::core::models::activity::Activity;
use crate::error::Error;

/// A dashboard card with the owner's actions.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityTile<'a> {
    pub activity: &'a Activity,
    pub edit: Route,
}

/// Tile for `activity`, or `None` when the viewer does not own it.
pub fn tile<'a>(activity: &'a Activity, viewer: &Account) -> Option<ActivityTile<'a>> {
    if !activity.is_owned_by(viewer.id) {
        return None;
    }
    Some(ActivityTile {
        activity,
        edit: Route::EditActivity(activity.id),
    })
}

pub struct Dashboard<B> {
    backend: Arc<B>,
    owner: Account,
    activities: Option<Vec<Activity>>,
    error: Option<String>,
}

impl<B> Dashboard<B>
where
    B: ActivityBackend,
{
    pub fn new(backend: Arc<B>, owner: &Account) -> Self {
        Self {
            backend,
            owner: owner.clone(),
            activities: None,
            error: None,
        }
    }

    pub async fn load(&mut self) {
        match self.backend.list_activities(Some(self.owner.id)).await {
            Ok(list) => {
                self.activities = Some(list);
                self.error = None;
            }
            Err(e) => {
                log::error!("failed to load dashboard for {}: {}", self.owner.id, e);
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.activities.is_none() && self.error.is_none()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn tiles(&self) -> Vec<ActivityTile<'_>> {
        self.activities.iter().flatten().filter_map(|a| tile(a, &self.owner)).collect()
    }

    /// Deletes through the backend and drops the row locally once confirmed.
    pub async fn delete(&mut self, id: i32) -> bool {
        let owner = match self.activities.iter().flatten().find(|a| a.id == id) {
            Some(activity) => activity.owner_id,
            None => {
                self.error = Some(Error::NotFound("Activity".into()).to_string());
                return false;
            }
        };
        if owner != self.owner.id {
            self.error = Some(Error::Forbidden.to_string());
            return false;
        }
        match self.backend.delete_activity(id).await {
            Ok(_) => {
                if let Some(list) = self.activities.as_mut() {
                    list.retain(|a| a.id != id);
                }
                self.error = None;
                true
            }
            Err(e) => {
                log::error!("failed to delete activity {}: {}", id, e);
                self.error = Some(e.to_string());
                false
            }
        }
    }
}
