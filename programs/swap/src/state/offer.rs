use anchor_lang::prelude::*;

use crate::error::SwapError;

/// One open swap: the maker has locked `token_a_offered_amount` of
/// `token_mint_a` in `vault` and wants `token_b_wanted_amount` of
/// `token_mint_b` back.
///
/// Lives at `["offer", maker, id]`. The vault lives at `["vault", offer]` and
/// is its own token authority.
#[account]
#[derive(InitSpace, Debug, PartialEq, Eq)]
pub struct Offer {
    pub id: u64,                     // maker-chosen offer id
    pub maker: Pubkey,               // creator of the offer
    pub token_mint_a: Pubkey,        // token locked in the vault
    pub token_mint_b: Pubkey,        // token wanted in return
    pub token_a_offered_amount: u64, // amount of token A locked in the vault
    pub token_b_wanted_amount: u64,  // amount of token B wanted
    pub vault: Pubkey,               // vault holding token A
    pub bump: u8,                    // bump of the offer address
    pub vault_bump: u8,              // bump of the vault address
}

impl Offer {
    /// A record allocated in the current transaction is still all zeroes.
    pub fn is_live(&self) -> bool {
        self.maker != Pubkey::default()
    }

    /// Reads a live offer out of an account that has not been deserialized
    /// by Anchor yet. A closed or never-created offer is `OfferNotFound`.
    pub fn load_live(info: &AccountInfo) -> Result<Offer> {
        if info.owner != &crate::ID || info.data_is_empty() {
            return err!(SwapError::OfferNotFound);
        }
        let data = info.try_borrow_data()?;
        let offer = Offer::try_deserialize(&mut &data[..])?;
        require!(offer.is_live(), SwapError::OfferNotFound);
        Ok(offer)
    }
}
