#![allow(unexpected_cfgs)]
use anchor_lang::prelude::*;

declare_id!("F8Ve3vB9yZvZNUe7Zo35Gycbzc7wQPRazEj2KHkF4c9f");

pub mod constants;
pub mod error;
pub mod pda;
pub mod validation;
pub mod state;
pub use state::*;
pub mod contexts;
pub use contexts::*;


#[program]
pub mod swap {
    use super::*;

    /// Opens an offer: locks `token_a_offered_amount` of mint A from the maker in a
    /// vault derived from the offer, and records that `token_b_wanted_amount` of
    /// mint B is wanted in return.
    /// Fails with `DuplicateOffer` while an offer with the same `id` is open for this maker.
    pub fn make_offer(
        ctx: Context<MakeOffer>,
        id: u64,
        token_a_offered_amount: u64,
        token_b_wanted_amount: u64,
    ) -> Result<OfferAddresses> {
        contexts::make_offer::handler(ctx, id, token_a_offered_amount, token_b_wanted_amount)
    }

    /// Settles an open offer: the taker pays the maker in mint B, receives the vaulted
    /// mint A, and the vault and offer are closed with their rent returned to the maker
    pub fn take_offer(ctx: Context<TakeOffer>) -> Result<()> {
        contexts::take_offer::handler(ctx)
    }
}
