//! ActorEntity implementation for [`Cart`].

use super::actions::{CartAction, CartActionResult};
use super::error::CartError;
use crate::model::{Cart, CartCreate, CartId, CartLine};
use async_trait::async_trait;
use resource_actor::ActorEntity;

#[async_trait]
impl ActorEntity for Cart {
    type Id = CartId;
    type Create = CartCreate;
    type Update = ();
    type Action = CartAction;
    type ActionResult = CartActionResult;
    type Context = ();
    type Error = CartError;

    fn from_create_params(id: CartId, params: CartCreate) -> Result<Self, CartError> {
        let mut cart = Cart::new(id);
        for line in params.lines {
            cart.add_line(line)?;
        }
        Ok(cart)
    }

    async fn handle_action(
        &mut self,
        action: CartAction,
        _ctx: &(),
    ) -> Result<CartActionResult, CartError> {
        match action {
            CartAction::AddLine(line) => {
                if self.checkout_locked {
                    return Err(CartError::Locked);
                }
                self.add_line(line)?;
                Ok(CartActionResult::Lines(self.lines.clone()))
            }
            CartAction::SetQuantity {
                product_id,
                size,
                quantity,
            } => {
                let Some(index) = self.lines.iter().position(|l| l.is_for(&product_id, &size)) else {
                    return Err(CartError::LineNotFound { product_id, size });
                };
                if quantity == 0 {
                    self.lines.remove(index);
                } else if self.checkout_locked {
                    return Err(CartError::Locked);
                } else {
                    self.lines[index].quantity = quantity;
                }
                Ok(CartActionResult::Lines(self.lines.clone()))
            }
            CartAction::RemoveLine { product_id, size } => {
                let before = self.lines.len();
                self.lines.retain(|l| !l.is_for(&product_id, &size));
                if self.lines.len() == before {
                    return Err(CartError::LineNotFound { product_id, size });
                }
                Ok(CartActionResult::Lines(self.lines.clone()))
            }
            CartAction::Clear => {
                self.lines.clear();
                self.checkout_locked = false;
                Ok(CartActionResult::Cleared)
            }
            CartAction::BeginCheckout => {
                self.checkout_locked = true;
                Ok(CartActionResult::Locked(self.lines.clone()))
            }
            CartAction::EndCheckout => {
                self.checkout_locked = false;
                Ok(CartActionResult::Unlocked)
            }
        }
    }
}

impl Cart {
    /// Merges `line` into the cart, keyed by product and size.
    fn add_line(&mut self, line: CartLine) -> Result<(), CartError> {
        if line.quantity == 0 {
            return Err(CartError::InvalidQuantity {
                product_id: line.product_id,
                quantity: 0,
            });
        }
        match self
            .lines
            .iter_mut()
            .find(|l| l.is_for(&line.product_id, &line.size))
        {
            Some(existing) => {
                existing.quantity = existing.quantity.checked_add(line.quantity).ok_or(
                    CartError::InvalidQuantity {
                        product_id: line.product_id,
                        quantity: line.quantity,
                    },
                )?;
            }
            None => self.lines.push(line),
        }
        Ok(())
    }
}
