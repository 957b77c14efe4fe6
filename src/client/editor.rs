use std::sync::Arc;

use crate::client::backend::ActivityBackend;
use crate::client::guard::Route;
use crate::core::form::{ActivityForm, CREATE_REQUIRED, EDIT_REQUIRED, US_STATES};
use crate::core::models::account::Account;
use crate::core::models::activity::{ActivityField, ActivityType};
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(i32),
}

/// Create/edit form for one activity. `submit` validates locally first and
/// only reaches the backend with a complete form.
pub struct ActivityEditor<B> {
    backend: Arc<B>,
    owner: Account,
    mode: EditorMode,
    form: ActivityForm,
    error: Option<String>,
    editable: bool,
    submitting: bool,
    scroll_to_top: bool,
}

impl<B> ActivityEditor<B>
where
    B: ActivityBackend,
{
    /// Blank form with the contact email taken from the signed-in account.
    pub fn create(backend: Arc<B>, owner: &Account) -> Self {
        let form = ActivityForm {
            email: owner.email.clone(),
            ..Default::default()
        };
        Self {
            backend,
            owner: owner.clone(),
            mode: EditorMode::Create,
            form,
            error: None,
            editable: true,
            submitting: false,
            scroll_to_top: false,
        }
    }

    /// Loads the activity and checks ownership. On any failure the editor
    /// carries the message and refuses to submit.
    pub async fn edit(backend: Arc<B>, owner: &Account, id: Option<i32>) -> Self {
        let mut editor = Self::create(backend, owner);
        editor.form = ActivityForm::default();
        editor.editable = false;
        let id = match id {
            Some(id) => id,
            None => {
                editor.error = Some("No activity specified. Please go back and select an activity to edit.".into());
                return editor;
            }
        };
        editor.mode = EditorMode::Edit(id);
        match editor.backend.get_activity(id).await {
            Ok(Some(activity)) if activity.is_owned_by(owner.id) => {
                editor.form = ActivityForm::from_activity(&activity);
                editor.editable = true;
            }
            Ok(Some(activity)) => {
                log::warn!("{} opened activity {} owned by {}", owner.id, id, activity.owner_id);
                editor.error = Some(Error::Forbidden.to_string());
            }
            Ok(None) => editor.error = Some("Activity not found".into()),
            Err(e) => editor.error = Some(e.to_string()),
        }
        editor
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn form(&self) -> &ActivityForm {
        &self.form
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Set after a failed validation; cleared once read.
    pub fn take_scroll_to_top(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_top)
    }

    pub fn can_submit(&self) -> bool {
        self.editable && !self.submitting
    }

    pub fn required(&self) -> &'static [&'static str] {
        match self.mode {
            EditorMode::Create => &CREATE_REQUIRED,
            EditorMode::Edit(_) => &EDIT_REQUIRED,
        }
    }

    pub fn is_required(&self, id: &str) -> bool {
        self.required().iter().any(|r| *r == id)
    }

    pub fn state_choices(&self) -> &'static [&'static str] {
        &US_STATES
    }

    pub fn type_choices(&self) -> &'static [ActivityType] {
        &ActivityType::ALL
    }

    pub fn field_choices(&self) -> &'static [ActivityField] {
        &ActivityField::ALL
    }

    pub fn set(&mut self, id: &str, value: impl Into<String>) -> Result<(), Error> {
        self.form.set(id, value)
    }

    /// Returns where to navigate on success.
    pub async fn submit(&mut self) -> Option<Route> {
        if !self.can_submit() {
            return None;
        }
        self.error = None;
        if let Err(e) = self.form.validate(self.required()) {
            self.error = Some(e.to_string());
            self.scroll_to_top = true;
            return None;
        }
        self.submitting = true;
        let res = match self.mode {
            EditorMode::Create => self.backend.insert_activity(&self.form).await,
            EditorMode::Edit(id) => self.backend.update_activity(id, &self.form).await,
        };
        self.submitting = false;
        match res {
            Ok(activity) => {
                log::info!("activity {} saved by {}", activity.id, self.owner.id);
                Some(Route::Dashboard)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.scroll_to_top = true;
                None
            }
        }
    }
}
