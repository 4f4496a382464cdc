//! Shopping cart
//!
//! The cart is transient: it lives as long as the shop session that owns it and is never
//! persisted. Lines are keyed by game id; adding a game that is already present merges into
//! its line. Totals are derived from the lines on every read, so they can never drift.

use thiserror::Error;

use crate::entity::videogames;
use crate::utils::price::format_price;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("Quantity must be at least 1")]
    ZeroQuantity,
    #[error("Select a line first")]
    NoSelection,
    #[error("Game {0} is not in the cart")]
    LineNotFound(i32),
    #[error("Quantity is too large")]
    QuantityOverflow,
}

/// One game in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub user_id: i32,
    pub game_id: i32,
    pub game_name: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
}

impl CartLine {
    pub fn subtotal_cents(&self) -> i64 {
        self.unit_price_cents * i64::from(self.quantity)
    }

    /// Display text for the cart list.
    pub fn display(&self, username: &str) -> String {
        format!(
            "User: {} | Game: {} | Quantity: {} | Price: {} | Subtotal: {}",
            username,
            self.game_name,
            self.quantity,
            format_price(self.unit_price_cents),
            format_price(self.subtotal_cents()),
        )
    }
}

/// Outcome of a decrement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decrement {
    /// The line now holds this many copies.
    Updated(i32),
    /// The line is at 1; removing it needs the user's confirmation.
    ConfirmRemoval,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    user_id: i32,
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new(user_id: i32) -> Self {
        Self {
            user_id,
            lines: Vec::new(),
        }
    }

    pub fn user_id(&self) -> i32 {
        self.user_id
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, game_id: i32) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.game_id == game_id)
    }

    fn line_mut(&mut self, game_id: i32) -> Result<&mut CartLine, CartError> {
        self.lines
            .iter_mut()
            .find(|l| l.game_id == game_id)
            .ok_or(CartError::LineNotFound(game_id))
    }

    /// Adds `quantity` copies of a catalog game at its current price.
    pub fn add_game(
        &mut self,
        game: &videogames::Model,
        quantity: i32,
    ) -> Result<&CartLine, CartError> {
        self.add(game.id, &game.name, game.price_cents, quantity)
    }

    /// Merges into the existing line for `game_id`, or appends a new one.
    ///
    /// A merge keeps the line's original unit price.
    pub fn add(
        &mut self,
        game_id: i32,
        game_name: &str,
        unit_price_cents: i64,
        quantity: i32,
    ) -> Result<&CartLine, CartError> {
        if quantity < 1 {
            return Err(CartError::ZeroQuantity);
        }

        let index = match self.lines.iter().position(|l| l.game_id == game_id) {
            Some(index) => {
                let line = &mut self.lines[index];
                line.quantity = line
                    .quantity
                    .checked_add(quantity)
                    .ok_or(CartError::QuantityOverflow)?;
                index
            }
            None => {
                self.lines.push(CartLine {
                    user_id: self.user_id,
                    game_id,
                    game_name: game_name.to_string(),
                    unit_price_cents,
                    quantity,
                });
                self.lines.len() - 1
            }
        };
        Ok(&self.lines[index])
    }

    pub fn increment(&mut self, game_id: i32) -> Result<i32, CartError> {
        let line = self.line_mut(game_id)?;
        line.quantity = line
            .quantity
            .checked_add(1)
            .ok_or(CartError::QuantityOverflow)?;
        Ok(line.quantity)
    }

    /// Never takes a line below 1; at 1 it asks for a removal instead.
    pub fn decrement(&mut self, game_id: i32) -> Result<Decrement, CartError> {
        let line = self.line_mut(game_id)?;
        if line.quantity <= 1 {
            return Ok(Decrement::ConfirmRemoval);
        }
        line.quantity -= 1;
        Ok(Decrement::Updated(line.quantity))
    }

    pub fn remove(&mut self, game_id: i32) -> Result<CartLine, CartError> {
        let index = self
            .lines
            .iter()
            .position(|l| l.game_id == game_id)
            .ok_or(CartError::LineNotFound(game_id))?;
        Ok(self.lines.remove(index))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of quantities over all lines.
    pub fn total_items(&self) -> i64 {
        self.lines.iter().map(|l| i64::from(l.quantity)).sum()
    }

    /// Sum of quantity × unit price over all lines.
    pub fn total_cents(&self) -> i64 {
        self.lines.iter().map(CartLine::subtotal_cents).sum()
    }

    pub fn display_lines(&self, username: &str) -> Vec<String> {
        self.lines.iter().map(|l| l.display(username)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_cart() -> Cart {
        let mut cart = Cart::new(7);
        cart.add(1, "Game A", 5999, 2).unwrap();
        cart.add(2, "Game B", 6999, 1).unwrap();
        cart
    }

    #[test]
    fn totals_follow_the_lines() {
        let mut cart = sample_cart();
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_cents(), 18997);
        assert_eq!(format_price(cart.total_cents()), "$189.97");

        assert_eq!(cart.increment(1).unwrap(), 3);
        assert_eq!(cart.total_items(), 4);
        assert_eq!(format_price(cart.total_cents()), "$249.96");
    }

    #[test]
    fn same_game_merges_into_one_line() {
        let mut cart = sample_cart();
        let line = cart.add(1, "Game A", 5999, 3).unwrap();
        assert_eq!(line.quantity, 5);
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.total_items(), 6);
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let mut cart = Cart::new(1);
        assert_eq!(cart.add(1, "Game A", 100, 0), Err(CartError::ZeroQuantity));
        assert!(cart.is_empty());
    }

    #[test]
    fn decrement_at_one_asks_for_removal() {
        let mut cart = sample_cart();
        assert_eq!(cart.decrement(1).unwrap(), Decrement::Updated(1));
        assert_eq!(cart.decrement(1).unwrap(), Decrement::ConfirmRemoval);
        // declining leaves the line alone
        assert_eq!(cart.line(1).unwrap().quantity, 1);
        assert_eq!(cart.total_items(), 2);

        let removed = cart.remove(1).unwrap();
        assert_eq!(removed.quantity, 1);
        assert_eq!(cart.total_items(), 1);
        assert!(cart.line(1).is_none());
    }

    #[test]
    fn unknown_lines_are_errors() {
        let mut cart = sample_cart();
        assert_eq!(cart.increment(99), Err(CartError::LineNotFound(99)));
        assert_eq!(cart.decrement(99), Err(CartError::LineNotFound(99)));
        assert_eq!(cart.remove(99), Err(CartError::LineNotFound(99)));
    }

    #[test]
    fn display_is_derived_from_the_record() {
        let cart = sample_cart();
        assert_eq!(
            cart.display_lines("ana")[0],
            "User: ana | Game: Game A | Quantity: 2 | Price: $59.99 | Subtotal: $119.98"
        );
    }

    proptest! {
        #[test]
        fn totals_match_line_sums(
            adds in prop::collection::vec((1i32..6, 1i32..20, 0i64..10_000), 0..40)
        ) {
            let mut cart = Cart::new(1);
            for (game_id, quantity, price) in &adds {
                cart.add(*game_id, "game", *price, *quantity).unwrap();
            }

            let items: i64 = cart.lines().iter().map(|l| i64::from(l.quantity)).sum();
            let payable: i64 = cart
                .lines()
                .iter()
                .map(|l| l.unit_price_cents * i64::from(l.quantity))
                .sum();
            prop_assert_eq!(cart.total_items(), items);
            prop_assert_eq!(cart.total_cents(), payable);

            let requested: i64 = adds.iter().map(|(_, q, _)| i64::from(*q)).sum();
            prop_assert_eq!(cart.total_items(), requested);

            let mut ids: Vec<i32> = cart.lines().iter().map(|l| l.game_id).collect();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), cart.lines().len());
        }
    }
}
