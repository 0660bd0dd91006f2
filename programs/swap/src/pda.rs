//! Program derived addresses for offers and their vaults.
//!
//! Neither address has a private key: the program signs for the vault by
//! re-deriving it from the offer address and the stored bump.

use anchor_lang::prelude::*;

use crate::{
    constants::{OFFER_SEED, VAULT_SEED},
    error::SwapError,
};

/// Finds the canonical address and bump for `namespace` followed by `fields`.
pub fn derive_address(namespace: &[u8], fields: &[&[u8]]) -> Result<(Pubkey, u8)> {
    let mut seeds: Vec<&[u8]> = Vec::with_capacity(fields.len() + 1);
    seeds.push(namespace);
    seeds.extend_from_slice(fields);

    Pubkey::try_find_program_address(&seeds, &crate::ID)
        .ok_or_else(|| error!(SwapError::AddressDerivationFailed))
}

pub fn offer_address(maker: &Pubkey, id: u64) -> Result<(Pubkey, u8)> {
    derive_address(OFFER_SEED, &[maker.as_ref(), &id.to_le_bytes()])
}

/// Keyed by the offer address, so a vault can't be derived before its offer.
pub fn vault_address(offer: &Pubkey) -> Result<(Pubkey, u8)> {
    derive_address(VAULT_SEED, &[offer.as_ref()])
}

pub fn verify_offer_address(offer: &Pubkey, maker: &Pubkey, id: u64, bump: u8) -> Result<()> {
    let expected = Pubkey::create_program_address(
        &[OFFER_SEED, maker.as_ref(), &id.to_le_bytes(), &[bump]],
        &crate::ID,
    )
    .map_err(|_| error!(SwapError::OfferNotFound))?;
    require_keys_eq!(expected, *offer, SwapError::OfferNotFound);
    Ok(())
}

pub fn verify_vault_address(vault: &Pubkey, offer: &Pubkey, bump: u8) -> Result<()> {
    let expected =
        Pubkey::create_program_address(&[VAULT_SEED, offer.as_ref(), &[bump]], &crate::ID)
            .map_err(|_| error!(SwapError::VaultMismatch))?;
    require_keys_eq!(expected, *vault, SwapError::VaultMismatch);
    Ok(())
}
