use sea_orm::DatabaseConnection;

use super::{Dialogs, Navigation, Window};
use crate::database::dto::{NewRole, SignupData};
use crate::database::service;
use crate::entity::enums::Gender;

/// Signup form. Always creates a regular user account.
#[derive(Debug, Clone)]
pub struct SignupWindow {
    pub username: String,
    pub password: String,
    pub password_confirmation: String,
    pub email: String,
    pub name: String,
    pub surname: String,
    pub telephone: String,
    pub gender: Gender,
    pub card_number: String,
}

impl Default for SignupWindow {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            password_confirmation: String::new(),
            email: String::new(),
            name: String::new(),
            surname: String::new(),
            telephone: String::new(),
            gender: Gender::Other,
            card_number: String::new(),
        }
    }
}

impl SignupWindow {
    pub fn new() -> Self {
        Self::default()
    }

    fn to_signup_data(&self) -> SignupData {
        SignupData {
            username: self.username.clone(),
            password: self.password.clone(),
            password_confirmation: self.password_confirmation.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            surname: self.surname.clone(),
            telephone: self.telephone.clone(),
            role: NewRole::User {
                gender: self.gender,
                card_number: self.card_number.clone(),
            },
        }
    }

    pub async fn on_submit(
        &mut self,
        db: &DatabaseConnection,
        dialogs: &mut dyn Dialogs,
    ) -> Navigation {
        match service::signup(db, self.to_signup_data()).await {
            Ok(account) => {
                dialogs.info(
                    "Sign up",
                    &format!("Account '{}' created, you can log in now", account.username()),
                );
                Navigation::Open(Window::Login)
            }
            Err(e) => {
                dialogs.error("Sign up", &e.to_string());
                Navigation::Stay
            }
        }
    }

    pub fn on_cancel(&self) -> Navigation {
        Navigation::Open(Window::Login)
    }
}
