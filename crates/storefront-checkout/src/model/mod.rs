//! Plain data types shared by the actors, the services and the checkout session.

pub mod cart;
pub mod delivery;
pub mod order;
pub mod payment;

pub use cart::*;
pub use delivery::*;
pub use order::*;
pub use payment::*;
