//! Preconditions of `make_offer` and `take_offer`.
//!
//! Everything here runs before the first CPI of a handler and only looks at
//! plain keys and balances, so a rejected call leaves every account as it was.

use anchor_lang::{prelude::*, system_program};
use anchor_spl::token_interface::TokenAccount;

use crate::{error::SwapError, state::Offer};

/// The parts of a token account the escrow cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenHolding {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
}

impl From<&TokenAccount> for TokenHolding {
    fn from(account: &TokenAccount) -> Self {
        Self {
            mint: account.mint,
            owner: account.owner,
            amount: account.amount,
        }
    }
}

pub fn check_offer_terms(
    token_a_offered_amount: u64,
    token_b_wanted_amount: u64,
    token_mint_a: &Pubkey,
    token_mint_b: &Pubkey,
) -> Result<()> {
    require_gt!(token_a_offered_amount, 0, SwapError::InvalidAmount);
    require_gt!(token_b_wanted_amount, 0, SwapError::InvalidAmount);
    require_keys_neq!(*token_mint_a, *token_mint_b, SwapError::SameTokenKind);
    Ok(())
}

/// Neither the offer nor its vault may exist yet. A vault address that only
/// received lamports is still free: it has no data and the system program owns it.
pub fn check_unoccupied(offer_live: bool, vault_owner: &Pubkey, vault_empty: bool) -> Result<()> {
    require!(!offer_live, SwapError::DuplicateOffer);
    require_keys_eq!(*vault_owner, system_program::ID, SwapError::DuplicateOffer);
    require!(vault_empty, SwapError::DuplicateOffer);
    Ok(())
}

/// The maker's token A account must hold the deposit and be spendable by the maker.
pub fn check_deposit_source(
    source: &TokenHolding,
    maker: &Pubkey,
    token_mint_a: &Pubkey,
    amount: u64,
) -> Result<()> {
    require_keys_eq!(source.mint, *token_mint_a, SwapError::TokenKindMismatch);
    require_keys_eq!(source.owner, *maker, SwapError::UnauthorizedSigner);
    require_gte!(source.amount, amount, SwapError::InsufficientBalance);
    Ok(())
}

/// Everything `take_offer` is handed, checked against the stored offer.
pub struct Settlement<'a> {
    pub offer: &'a Offer,
    pub taker: &'a Pubkey,
    pub maker: &'a Pubkey,
    pub token_mint_a: &'a Pubkey,
    pub token_mint_b: &'a Pubkey,
    pub taker_token_account_a: &'a TokenHolding,
    pub taker_token_account_b: &'a TokenHolding,
    pub maker_token_account_b: &'a TokenHolding,
    /// Vault contents; `owner` is the token authority.
    pub vault: &'a TokenHolding,
    pub vault_key: &'a Pubkey,
}

impl Settlement<'_> {
    pub fn check(&self) -> Result<()> {
        let offer = self.offer;

        require_keys_eq!(*self.maker, offer.maker, SwapError::RecipientMismatch);

        require_keys_eq!(*self.token_mint_a, offer.token_mint_a, SwapError::TokenKindMismatch);
        require_keys_eq!(*self.token_mint_b, offer.token_mint_b, SwapError::TokenKindMismatch);
        require_keys_eq!(
            self.taker_token_account_a.mint,
            offer.token_mint_a,
            SwapError::TokenKindMismatch
        );
        require_keys_eq!(
            self.taker_token_account_b.mint,
            offer.token_mint_b,
            SwapError::TokenKindMismatch
        );
        require_keys_eq!(
            self.maker_token_account_b.mint,
            offer.token_mint_b,
            SwapError::TokenKindMismatch
        );
        require_keys_eq!(self.vault.mint, offer.token_mint_a, SwapError::TokenKindMismatch);

        require_keys_eq!(
            self.taker_token_account_b.owner,
            *self.taker,
            SwapError::UnauthorizedSigner
        );
        require_keys_eq!(
            self.maker_token_account_b.owner,
            offer.maker,
            SwapError::RecipientMismatch
        );

        require_keys_eq!(*self.vault_key, offer.vault, SwapError::VaultMismatch);
        require_keys_eq!(self.vault.owner, offer.vault, SwapError::VaultMismatch);

        require_gte!(
            self.taker_token_account_b.amount,
            offer.token_b_wanted_amount,
            SwapError::InsufficientBalance
        );
        Ok(())
    }
}
