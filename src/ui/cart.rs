//! Cart window.
//!
//! Line state: `no selection -> select -> selected (qty >= 1)`; increment and decrement keep
//! the line selected, a confirmed decrement at quantity 1 removes it and clears the selection.

use sea_orm::DatabaseConnection;

use super::{Dialogs, Navigation, Session, Window};
use crate::cart::{Cart, CartError, Decrement};
use crate::database::service;
use crate::error::StoreError;
use crate::utils::price::format_price;

#[derive(Debug, Clone, Default)]
pub struct CartWindow {
    selected: Option<i32>,
}

impl CartWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<i32> {
        self.selected
    }

    pub fn rows(&self, session: &Session) -> Vec<String> {
        session.cart.display_lines(session.account.username())
    }

    /// `Items: 3 | Total: $189.97`
    pub fn summary(&self, cart: &Cart) -> String {
        format!(
            "Items: {} | Total: {}",
            cart.total_items(),
            format_price(cart.total_cents())
        )
    }

    pub fn select(&mut self, cart: &Cart, game_id: i32) -> bool {
        if cart.line(game_id).is_some() {
            self.selected = Some(game_id);
            true
        } else {
            false
        }
    }

    fn selected_line(&self) -> Result<i32, CartError> {
        self.selected.ok_or(CartError::NoSelection)
    }

    pub fn on_increment(&mut self, cart: &mut Cart, dialogs: &mut dyn Dialogs) {
        if let Err(e) = self.selected_line().and_then(|id| cart.increment(id)) {
            dialogs.error("Cart", &e.to_string());
        }
    }

    pub fn on_decrement(&mut self, cart: &mut Cart, dialogs: &mut dyn Dialogs) {
        let result = self.selected_line().and_then(|id| Ok((id, cart.decrement(id)?)));
        match result {
            Ok((_, Decrement::Updated(_))) => {}
            Ok((id, Decrement::ConfirmRemoval)) => {
                let name = cart.line(id).map(|l| l.game_name.clone()).unwrap_or_default();
                if dialogs.confirm("Cart", &format!("Remove {} from your cart?", name)) {
                    self.remove_line(cart, id, dialogs);
                }
            }
            Err(e) => dialogs.error("Cart", &e.to_string()),
        }
    }

    pub fn on_remove(&mut self, cart: &mut Cart, dialogs: &mut dyn Dialogs) {
        match self.selected_line() {
            Ok(id) => self.remove_line(cart, id, dialogs),
            Err(e) => dialogs.error("Cart", &e.to_string()),
        }
    }

    fn remove_line(&mut self, cart: &mut Cart, game_id: i32, dialogs: &mut dyn Dialogs) {
        match cart.remove(game_id) {
            Ok(_) => self.selected = None,
            Err(e) => dialogs.error("Cart", &e.to_string()),
        }
    }

    /// Asks for confirmation, then places one order per line.
    ///
    /// Total success empties the cart and closes the window. On partial success only the
    /// failed lines stay in the cart.
    pub async fn on_checkout(
        &mut self,
        db: &DatabaseConnection,
        cart: &mut Cart,
        dialogs: &mut dyn Dialogs,
    ) -> Navigation {
        if cart.is_empty() {
            dialogs.error("Checkout", &StoreError::EmptyCart.to_string());
            return Navigation::Stay;
        }
        let question = format!(
            "Buy {} item(s) for {}?",
            cart.total_items(),
            format_price(cart.total_cents())
        );
        if !dialogs.confirm("Checkout", &question) {
            return Navigation::Stay;
        }

        let report = match service::checkout(db, cart).await {
            Ok(report) => report,
            Err(e) => {
                dialogs.error("Checkout", &e.to_string());
                return Navigation::Stay;
            }
        };

        if report.is_total_success() {
            cart.clear();
            self.selected = None;
            dialogs.info(
                "Checkout",
                &format!(
                    "Thank you! {} order(s) placed, {} charged",
                    report.orders.len(),
                    format_price(report.total_cents())
                ),
            );
            return Navigation::Open(Window::Shop);
        }

        for game_id in report.ordered_game_ids() {
            if cart.remove(game_id).is_ok() && self.selected == Some(game_id) {
                self.selected = None;
            }
        }
        let failures: Vec<String> = report
            .failures
            .iter()
            .map(|f| format!("- {}: {}", f.game_name, f.reason))
            .collect();
        dialogs.error(
            "Checkout",
            &format!(
                "{} order(s) placed, these lines failed and stay in your cart:\n{}",
                report.orders.len(),
                failures.join("\n")
            ),
        );
        Navigation::Stay
    }

    pub fn on_back(&self) -> Navigation {
        Navigation::Open(Window::Shop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fail_orders_for, memory_db, new_admin, new_game, new_user};
    use crate::ui::dialogs::scripted::ScriptedDialogs;

    fn cart_with_two_lines() -> Cart {
        let mut cart = Cart::new(1);
        cart.add(1, "Game A", 5999, 2).unwrap();
        cart.add(2, "Game B", 6999, 1).unwrap();
        cart
    }

    #[test]
    fn buttons_need_a_selection() {
        let mut cart = cart_with_two_lines();
        let mut window = CartWindow::new();
        let mut dialogs = ScriptedDialogs::default();

        window.on_increment(&mut cart, &mut dialogs);
        window.on_decrement(&mut cart, &mut dialogs);
        assert_eq!(dialogs.errors, ["Select a line first", "Select a line first"]);
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn increment_updates_totals() {
        let mut cart = cart_with_two_lines();
        let mut window = CartWindow::new();
        let mut dialogs = ScriptedDialogs::default();

        assert!(window.select(&cart, 1));
        window.on_increment(&mut cart, &mut dialogs);
        assert_eq!(window.summary(&cart), "Items: 4 | Total: $249.96");
    }

    #[test]
    fn declined_removal_keeps_the_line() {
        let mut cart = cart_with_two_lines();
        let mut window = CartWindow::new();
        let mut dialogs = ScriptedDialogs::answering(&[false]);

        window.select(&cart, 2);
        window.on_decrement(&mut cart, &mut dialogs);
        assert_eq!(dialogs.questions, ["Remove Game B from your cart?"]);
        assert_eq!(cart.line(2).map(|l| l.quantity), Some(1));
        assert_eq!(window.selected(), Some(2));
    }

    #[test]
    fn confirmed_removal_drops_the_line() {
        let mut cart = cart_with_two_lines();
        let mut window = CartWindow::new();
        let mut dialogs = ScriptedDialogs::answering(&[true]);

        window.select(&cart, 2);
        window.on_decrement(&mut cart, &mut dialogs);
        assert!(cart.line(2).is_none());
        assert_eq!(cart.total_items(), 2);
        assert_eq!(window.selected(), None);
    }

    #[tokio::test]
    async fn declined_checkout_changes_nothing() {
        let db = memory_db().await;
        let admin = new_admin(&db, "root").await;
        let game = new_game(&db, &admin, "Game A", 5999, 5).await;
        let mut session = Session::new(new_user(&db, "ana").await);
        session.cart.add_game(&game, 1).unwrap();
        let mut dialogs = ScriptedDialogs::answering(&[false]);

        let mut window = CartWindow::new();
        let nav = window.on_checkout(&db, &mut session.cart, &mut dialogs).await;
        assert_eq!(nav, Navigation::Stay);
        assert_eq!(session.cart.total_items(), 1);
        assert_eq!(service::find_game(&db, game.id).await.unwrap().stock, 5);
    }

    #[tokio::test]
    async fn successful_checkout_empties_the_cart() {
        let db = memory_db().await;
        let admin = new_admin(&db, "root").await;
        let a = new_game(&db, &admin, "Game A", 5999, 5).await;
        let b = new_game(&db, &admin, "Game B", 6999, 1).await;
        let mut session = Session::new(new_user(&db, "ana").await);
        session.cart.add_game(&a, 2).unwrap();
        session.cart.add_game(&b, 1).unwrap();
        let mut dialogs = ScriptedDialogs::answering(&[true]);

        let mut window = CartWindow::new();
        let nav = window.on_checkout(&db, &mut session.cart, &mut dialogs).await;

        assert_eq!(nav, Navigation::Open(Window::Shop));
        assert!(session.cart.is_empty());
        assert_eq!(window.summary(&session.cart), "Items: 0 | Total: $0.00");
        assert_eq!(dialogs.questions, ["Buy 3 item(s) for $189.97?"]);
    }

    #[tokio::test]
    async fn short_stock_aborts_and_keeps_the_cart() {
        let db = memory_db().await;
        let admin = new_admin(&db, "root").await;
        let a = new_game(&db, &admin, "Game A", 5999, 5).await;
        let b = new_game(&db, &admin, "Game B", 6999, 1).await;
        let mut session = Session::new(new_user(&db, "ana").await);
        session.cart.add_game(&a, 2).unwrap();
        session.cart.add_game(&b, 2).unwrap();
        let mut dialogs = ScriptedDialogs::answering(&[true]);

        let mut window = CartWindow::new();
        let nav = window.on_checkout(&db, &mut session.cart, &mut dialogs).await;

        assert_eq!(nav, Navigation::Stay);
        assert_eq!(session.cart.total_items(), 4);
        assert!(dialogs.last_error().unwrap().starts_with("Not enough stock:"));
        assert_eq!(service::find_game(&db, a.id).await.unwrap().stock, 5);
    }

    #[tokio::test]
    async fn partial_checkout_keeps_only_failed_lines() {
        let db = memory_db().await;
        let admin = new_admin(&db, "root").await;
        let a = new_game(&db, &admin, "Game A", 5999, 5).await;
        let b = new_game(&db, &admin, "Game B", 6999, 5).await;
        fail_orders_for(&db, "Game B").await;
        let mut session = Session::new(new_user(&db, "ana").await);
        session.cart.add_game(&a, 2).unwrap();
        session.cart.add_game(&b, 1).unwrap();
        let mut dialogs = ScriptedDialogs::answering(&[true]);

        let mut window = CartWindow::new();
        assert!(window.select(&session.cart, a.id));
        let nav = window.on_checkout(&db, &mut session.cart, &mut dialogs).await;

        assert_eq!(nav, Navigation::Stay);
        assert_eq!(window.selected(), None);
        assert!(session.cart.line(a.id).is_none());
        assert_eq!(session.cart.line(b.id).map(|l| l.quantity), Some(1));
        let message = dialogs.last_error().unwrap();
        assert!(message.starts_with("1 order(s) placed"));
        assert!(message.contains("- Game B:"));
        assert_eq!(service::find_game(&db, a.id).await.unwrap().stock, 3);
        assert_eq!(service::find_game(&db, b.id).await.unwrap().stock, 5);
    }
}
