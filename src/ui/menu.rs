//! Main menu: navigation plus the profile editor.

use std::path::Path;

use sea_orm::DatabaseConnection;

use super::{Dialogs, Navigation, Session, Window};
use crate::database::dto::{Account, Role, SignupData, UpdateProfileData};
use crate::database::service;
use crate::entity::enums::Gender;
use crate::utils::price::format_price;

/// Profile fields as shown in the editor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub email: String,
    pub name: String,
    pub surname: String,
    pub telephone: String,
    /// Users only
    pub gender: Option<Gender>,
    /// Users only
    pub card_number: String,
    /// Administrators only
    pub current_account: String,
}

impl ProfileForm {
    pub fn from_account(account: &Account) -> Self {
        let mut form = Self {
            email: account.profile.email.clone(),
            name: account.profile.name.clone(),
            surname: account.profile.surname.clone(),
            telephone: account.profile.telephone.clone(),
            ..Default::default()
        };
        match &account.role {
            Role::User(user) => {
                form.gender = Some(user.gender);
                form.card_number = user.card_number.clone();
            }
            Role::Admin(admin) => form.current_account = admin.current_account.clone(),
        }
        form
    }

    /// Only the fields that differ from `original`
    fn changes(&self, original: &ProfileForm, is_admin: bool) -> UpdateProfileData {
        fn changed(new: &str, old: &str) -> Option<String> {
            (new != old).then(|| new.to_string())
        }

        let mut updates = UpdateProfileData {
            email: changed(&self.email, &original.email),
            name: changed(&self.name, &original.name),
            surname: changed(&self.surname, &original.surname),
            telephone: changed(&self.telephone, &original.telephone),
            ..Default::default()
        };
        if is_admin {
            updates.current_account = changed(&self.current_account, &original.current_account);
        } else {
            updates.gender = self.gender.filter(|g| Some(*g) != original.gender);
            updates.card_number = changed(&self.card_number, &original.card_number);
        }
        updates
    }
}

#[derive(Debug, Clone)]
pub struct MenuWindow {
    pub form: ProfileForm,
    original: ProfileForm,
}

impl MenuWindow {
    pub fn new(session: &Session) -> Self {
        let form = ProfileForm::from_account(&session.account);
        Self {
            original: form.clone(),
            form,
        }
    }

    /// Header line, e.g. `ana (Ana Lopez) | 2 item(s) in cart`
    pub fn greeting(&self, session: &Session) -> String {
        let account = &session.account;
        if account.is_admin() {
            format!("{} ({}) | administrator", account.username(), account.profile.full_name())
        } else {
            format!(
                "{} ({}) | {} item(s) in cart",
                account.username(),
                account.profile.full_name(),
                session.cart.total_items()
            )
        }
    }

    pub fn on_shop(&self, session: &Session) -> Navigation {
        Navigation::Open(super::home_window(&session.account))
    }

    pub fn on_cart(&self, session: &Session, dialogs: &mut dyn Dialogs) -> Navigation {
        if session.account.is_admin() {
            dialogs.error("Cart", "Administrators do not have a cart");
            return Navigation::Stay;
        }
        Navigation::Open(Window::Cart)
    }

    /// Writes back the edited profile fields
    pub async fn on_save_profile(
        &mut self,
        db: &DatabaseConnection,
        session: &mut Session,
        dialogs: &mut dyn Dialogs,
    ) -> Navigation {
        let updates = self.form.changes(&self.original, session.account.is_admin());
        match service::update_profile(db, session.account.id(), updates).await {
            Ok(account) => {
                self.form = ProfileForm::from_account(&account);
                self.original = self.form.clone();
                session.account = account;
                dialogs.info("Profile", "Profile updated");
            }
            Err(e) => dialogs.error("Profile", &e.to_string()),
        }
        Navigation::Stay
    }

    /// Restores the form to the stored profile
    pub fn on_discard(&mut self) {
        self.form = self.original.clone();
    }

    pub async fn on_change_password(
        &mut self,
        db: &DatabaseConnection,
        session: &Session,
        dialogs: &mut dyn Dialogs,
        current: &str,
        new: &str,
        confirmation: &str,
    ) -> Navigation {
        match service::change_password(db, session.account.id(), current, new, confirmation).await
        {
            Ok(()) => dialogs.info("Password", "Password changed"),
            Err(e) => dialogs.error("Password", &e.to_string()),
        }
        Navigation::Stay
    }

    /// Purchase history, newest first
    pub async fn order_history(
        &self,
        db: &DatabaseConnection,
        session: &Session,
        dialogs: &mut dyn Dialogs,
    ) -> Vec<String> {
        match service::orders_for_user(db, session.account.id()).await {
            Ok(orders) => orders
                .iter()
                .map(|order| {
                    format!(
                        "{} | {} x {} | {}",
                        chrono::DateTime::from_timestamp(order.created_at, 0)
                            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                            .unwrap_or_default(),
                        order.quantity,
                        order.game_name,
                        format_price(order.total_cents())
                    )
                })
                .collect(),
            Err(e) => {
                dialogs.error("Orders", &e.to_string());
                Vec::new()
            }
        }
    }

    pub async fn on_backup(
        &self,
        db: &DatabaseConnection,
        session: &Session,
        dialogs: &mut dyn Dialogs,
        backup_dir: &Path,
    ) -> Navigation {
        match service::backup_database(db, &session.account, backup_dir).await {
            Ok(result) => dialogs.info(
                "Backup",
                &format!("{}: {}", result.message, result.path.display()),
            ),
            Err(e) => dialogs.error("Backup", &e.to_string()),
        }
        Navigation::Stay
    }

    /// Registers another administrator on behalf of the logged-in one
    pub async fn on_create_admin(
        &self,
        db: &DatabaseConnection,
        session: &Session,
        dialogs: &mut dyn Dialogs,
        data: SignupData,
    ) -> Navigation {
        match service::create_admin(db, &session.account, data).await {
            Ok(account) => dialogs.info(
                "Administrators",
                &format!("Administrator '{}' created", account.username()),
            ),
            Err(e) => dialogs.error("Administrators", &e.to_string()),
        }
        Navigation::Stay
    }

    pub fn on_delete_profile(&self) -> Navigation {
        Navigation::Open(Window::DeleteProfile)
    }

    pub fn on_logout(&self, dialogs: &mut dyn Dialogs, session: &Session) -> Navigation {
        if !session.cart.is_empty()
            && !dialogs.confirm("Log out", "Your cart will be emptied. Log out anyway?")
        {
            return Navigation::Stay;
        }
        Navigation::LoggedOut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{admin_signup, memory_db, new_admin, new_user};
    use crate::ui::dialogs::scripted::ScriptedDialogs;

    #[tokio::test]
    async fn saving_sends_only_changed_fields() {
        let db = memory_db().await;
        let mut session = Session::new(new_user(&db, "ana").await);
        let mut dialogs = ScriptedDialogs::default();
        let mut window = MenuWindow::new(&session);

        window.form.telephone = "699 000 111".into();
        window.form.gender = Some(Gender::Other);
        window.on_save_profile(&db, &mut session, &mut dialogs).await;

        assert_eq!(dialogs.infos, ["Profile updated"]);
        assert_eq!(session.account.profile.telephone, "699 000 111");
        assert_eq!(window.form.gender, Some(Gender::Other));
    }

    #[tokio::test]
    async fn invalid_edit_keeps_the_form() {
        let db = memory_db().await;
        let mut session = Session::new(new_user(&db, "ana").await);
        let mut dialogs = ScriptedDialogs::default();
        let mut window = MenuWindow::new(&session);

        window.form.email = "not-an-email".into();
        window.on_save_profile(&db, &mut session, &mut dialogs).await;

        assert_eq!(dialogs.errors.len(), 1);
        assert_eq!(window.form.email, "not-an-email");
        assert_eq!(session.account.profile.email, "ana@mail.com");

        window.on_discard();
        assert_eq!(window.form.email, "ana@mail.com");
    }

    #[tokio::test]
    async fn logout_with_items_asks_first() {
        let db = memory_db().await;
        let mut session = Session::new(new_user(&db, "ana").await);
        session.cart.add(1, "Game A", 100, 1).unwrap();
        let window = MenuWindow::new(&session);

        let mut dialogs = ScriptedDialogs::answering(&[false, true]);
        assert_eq!(window.on_logout(&mut dialogs, &session), Navigation::Stay);
        assert_eq!(window.on_logout(&mut dialogs, &session), Navigation::LoggedOut);
    }

    #[tokio::test]
    async fn admins_go_to_the_admin_shop() {
        let db = memory_db().await;
        let session = Session::new(new_admin(&db, "root").await);
        let mut dialogs = ScriptedDialogs::default();
        let window = MenuWindow::new(&session);

        assert_eq!(window.on_shop(&session), Navigation::Open(Window::AdminShop));
        assert_eq!(window.on_cart(&session, &mut dialogs), Navigation::Stay);
        assert!(window.greeting(&session).ends_with("administrator"));
    }

    #[tokio::test]
    async fn admin_creation_needs_an_admin() {
        let db = memory_db().await;
        let root = Session::new(new_admin(&db, "root").await);
        let ana = Session::new(new_user(&db, "ana").await);
        let mut dialogs = ScriptedDialogs::default();

        MenuWindow::new(&ana)
            .on_create_admin(&db, &ana, &mut dialogs, admin_signup("mallory"))
            .await;
        assert_eq!(dialogs.last_error(), Some("Only administrators can do that"));

        MenuWindow::new(&root)
            .on_create_admin(&db, &root, &mut dialogs, admin_signup("boss"))
            .await;
        assert_eq!(dialogs.infos, ["Administrator 'boss' created"]);
        assert!(service::login(&db, "boss", "secret1").await.unwrap().is_admin());
    }
}
