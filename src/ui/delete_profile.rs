//! Account removal.
//!
//! Users can only remove their own account. Administrators pick any other account from the
//! profile table.

use sea_orm::DatabaseConnection;

use super::{Dialogs, Navigation, Session, Window};
use crate::database::dto::Account;
use crate::database::service;

#[derive(Debug, Clone, Default)]
pub struct DeleteProfileWindow {
    accounts: Vec<Account>,
    selected: Option<i32>,
}

impl DeleteProfileWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the profile table; only administrators get one
    pub async fn refresh(
        &mut self,
        db: &DatabaseConnection,
        session: &Session,
        dialogs: &mut dyn Dialogs,
    ) {
        if !session.account.is_admin() {
            self.selected = Some(session.account.id());
            return;
        }
        match service::list_accounts(db, &session.account).await {
            Ok(accounts) => {
                self.accounts = accounts;
                if !self
                    .selected
                    .is_some_and(|id| self.accounts.iter().any(|a| a.id() == id))
                {
                    self.selected = None;
                }
            }
            Err(e) => dialogs.error("Profiles", &e.to_string()),
        }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn rows(&self) -> Vec<String> {
        self.accounts
            .iter()
            .map(|a| format!("#{} | {}", a.id(), a.display_row()))
            .collect()
    }

    pub fn select(&mut self, profile_id: i32) -> bool {
        if self.accounts.iter().any(|a| a.id() == profile_id) {
            self.selected = Some(profile_id);
            true
        } else {
            false
        }
    }

    pub async fn on_delete(
        &mut self,
        db: &DatabaseConnection,
        session: &Session,
        dialogs: &mut dyn Dialogs,
    ) -> Navigation {
        let Some(target) = self.selected else {
            dialogs.error("Delete profile", "Select a profile first");
            return Navigation::Stay;
        };
        let own = target == session.account.id();
        let question = if own {
            "Delete your account? This cannot be undone.".to_string()
        } else {
            let name = self
                .accounts
                .iter()
                .find(|a| a.id() == target)
                .map(|a| a.username().to_string())
                .unwrap_or_else(|| format!("#{}", target));
            format!("Delete the profile of {}?", name)
        };
        if !dialogs.confirm("Delete profile", &question) {
            return Navigation::Stay;
        }

        match service::delete_profile(db, &session.account, target).await {
            Ok(()) if own => {
                dialogs.info("Delete profile", "Your account has been deleted");
                Navigation::LoggedOut
            }
            Ok(()) => {
                dialogs.info("Delete profile", "Profile deleted");
                self.selected = None;
                self.refresh(db, session, dialogs).await;
                Navigation::Stay
            }
            Err(e) => {
                dialogs.error("Delete profile", &e.to_string());
                Navigation::Stay
            }
        }
    }

    pub fn on_back(&self) -> Navigation {
        Navigation::Open(Window::Menu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{memory_db, new_admin, new_user};
    use crate::ui::dialogs::scripted::ScriptedDialogs;

    #[tokio::test]
    async fn user_deletes_own_account() {
        let db = memory_db().await;
        let session = Session::new(new_user(&db, "ana").await);
        let mut dialogs = ScriptedDialogs::answering(&[true]);

        let mut window = DeleteProfileWindow::new();
        window.refresh(&db, &session, &mut dialogs).await;
        assert!(window.accounts().is_empty());

        assert_eq!(
            window.on_delete(&db, &session, &mut dialogs).await,
            Navigation::LoggedOut
        );
        assert!(service::login(&db, "ana", "secret1").await.is_err());
    }

    #[tokio::test]
    async fn admin_cannot_delete_itself() {
        let db = memory_db().await;
        let session = Session::new(new_admin(&db, "root").await);
        let bob = new_user(&db, "bob").await;
        let mut dialogs = ScriptedDialogs::answering(&[true, true]);

        let mut window = DeleteProfileWindow::new();
        window.refresh(&db, &session, &mut dialogs).await;
        assert_eq!(window.rows().len(), 2);

        window.select(session.account.id());
        window.on_delete(&db, &session, &mut dialogs).await;
        assert_eq!(
            dialogs.last_error(),
            Some("An administrator cannot delete their own profile")
        );

        window.select(bob.id());
        assert_eq!(window.on_delete(&db, &session, &mut dialogs).await, Navigation::Stay);
        assert_eq!(window.accounts().len(), 1);
        assert_eq!(dialogs.questions[1], "Delete the profile of bob?");
    }
}
