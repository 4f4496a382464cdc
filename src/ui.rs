//! Window controllers
//!
//! Each window owns its widget state (form fields, table rows, selection) and exposes one
//! async handler per button. Handlers talk to the user through [`Dialogs`] and answer with a
//! [`Navigation`] request; a front-end renders the state and feeds the events.

pub mod dialogs;

// === Windows ===
pub mod admin_shop;
pub mod cart;
pub mod delete_profile;
pub mod game_form;
pub mod login;
pub mod menu;
pub mod review;
pub mod shop;
pub mod signup;

pub use dialogs::Dialogs;

use crate::cart::Cart;
use crate::database::dto::Account;

/// Windows the application can open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Login,
    Signup,
    Menu,
    Shop,
    AdminShop,
    Cart,
    Review(i32),
    /// `None` adds a new game, `Some(id)` edits one
    GameForm(Option<i32>),
    DeleteProfile,
}

/// What a handler asks the front-end to do next
#[derive(Debug, Clone, PartialEq)]
pub enum Navigation {
    /// Keep the current window open
    Stay,
    /// Close the current window and open another one
    Open(Window),
    /// Credentials were accepted; start a session and open the menu
    LoggedIn(Account),
    /// End the session and return to the login window
    LoggedOut,
    Quit,
}

/// The logged-in account and its cart.
///
/// The cart is never persisted; it lives and dies with the session.
#[derive(Debug, Clone)]
pub struct Session {
    pub account: Account,
    pub cart: Cart,
}

impl Session {
    pub fn new(account: Account) -> Self {
        let cart = Cart::new(account.id());
        Self { account, cart }
    }
}

/// Window shown to an account right after login
pub fn home_window(account: &Account) -> Window {
    if account.is_admin() {
        Window::AdminShop
    } else {
        Window::Shop
    }
}
