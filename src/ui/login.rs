use sea_orm::DatabaseConnection;

use super::{Dialogs, Navigation, Window};
use crate::database::service;
use crate::utils::validate;

#[derive(Debug, Default, Clone)]
pub struct LoginWindow {
    pub username: String,
    pub password: String,
}

impl LoginWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn on_login(
        &mut self,
        db: &DatabaseConnection,
        dialogs: &mut dyn Dialogs,
    ) -> Navigation {
        if let Err(message) = validate::require_filled(&[
            ("Username", &self.username),
            ("Password", &self.password),
        ]) {
            dialogs.error("Login", &message);
            return Navigation::Stay;
        }

        match service::login(db, &self.username, &self.password).await {
            Ok(account) => {
                self.password.clear();
                Navigation::LoggedIn(account)
            }
            Err(e) => {
                self.password.clear();
                dialogs.error("Login", &e.to_string());
                Navigation::Stay
            }
        }
    }

    pub fn on_signup(&self) -> Navigation {
        Navigation::Open(Window::Signup)
    }

    pub fn on_exit(&self) -> Navigation {
        Navigation::Quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{memory_db, new_user};
    use crate::ui::dialogs::scripted::ScriptedDialogs;

    #[tokio::test]
    async fn wrong_password_keeps_the_window_open() {
        let db = memory_db().await;
        new_user(&db, "ana").await;
        let mut dialogs = ScriptedDialogs::default();

        let mut window = LoginWindow {
            username: "ana".into(),
            password: "nope-nope".into(),
        };
        assert_eq!(window.on_login(&db, &mut dialogs).await, Navigation::Stay);
        assert_eq!(dialogs.last_error(), Some("Incorrect username or password"));
        assert!(window.password.is_empty());

        window.password = "secret1".into();
        match window.on_login(&db, &mut dialogs).await {
            Navigation::LoggedIn(account) => assert_eq!(account.username(), "ana"),
            other => panic!("unexpected navigation {:?}", other),
        }
    }

    #[tokio::test]
    async fn blank_fields_are_reported() {
        let db = memory_db().await;
        let mut dialogs = ScriptedDialogs::default();
        let mut window = LoginWindow::new();

        assert_eq!(window.on_login(&db, &mut dialogs).await, Navigation::Stay);
        assert_eq!(dialogs.last_error(), Some("Please fill in: Username, Password"));
    }
}
