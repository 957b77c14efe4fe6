use crate::client::backend::AuthBackend;
use crate::client::guard::Route;
use crate::client::session::SessionStore;
use crate::core::models::account::AccountUpdate;

pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";
pub const NO_CHANGES: &str = "No changes were made";
pub const UPDATED: &str = "Settings updated successfully. Please sign in again.";

/// Account settings: new email and/or new password with confirmation.
#[derive(Debug, Default)]
pub struct AccountSettings {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    error: Option<String>,
    message: Option<String>,
    submitting: bool,
}

impl AccountSettings {
    pub fn new<B: AuthBackend>(store: &SessionStore<B>) -> Self {
        Self {
            email: store.user().map(|u| u.email).unwrap_or_default(),
            ..Default::default()
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    fn changes(&self, current_email: &str) -> Result<AccountUpdate, &'static str> {
        if !self.password.is_empty() && self.password != self.confirm_password {
            return Err(PASSWORDS_DO_NOT_MATCH);
        }
        let email = self.email.trim();
        Ok(AccountUpdate {
            email: Some(email.to_owned()).filter(|e| !e.is_empty() && e != current_email),
            password: Some(self.password.clone()).filter(|p| !p.is_empty()),
        })
    }

    /// Any accepted change ends the session; the caller is sent to sign in.
    pub async fn save<B: AuthBackend>(&mut self, store: &SessionStore<B>) -> Option<Route> {
        if self.submitting {
            return None;
        }
        self.error = None;
        self.message = None;
        let current = store.user().map(|u| u.email).unwrap_or_default();
        let update = match self.changes(&current) {
            Ok(update) => update,
            Err(e) => {
                self.error = Some(e.into());
                return None;
            }
        };
        if update.is_empty() {
            self.message = Some(NO_CHANGES.into());
            return None;
        }
        self.submitting = true;
        let outcome = store.update_user(&update).await;
        self.submitting = false;
        if !outcome.success {
            self.error = outcome.error;
            return None;
        }
        self.message = Some(UPDATED.into());
        let signed_out = store.sign_out().await;
        if !signed_out.success {
            log::warn!("sign out after account update failed: {}", signed_out.error.unwrap_or_default());
        }
        Some(Route::SignIn)
    }
}
