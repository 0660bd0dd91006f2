use anchor_lang::prelude::*;

/// Namespace of the offer record address: `["offer", maker, id]`
#[constant]
pub const OFFER_SEED: &[u8] = b"offer";

/// Namespace of the vault address: `["vault", offer]`
#[constant]
pub const VAULT_SEED: &[u8] = b"vault";

pub const ANCHOR_DISCRIMINATOR: usize = 8;

/// Base SPL token account length, used when allocating the vault
pub const VAULT_SPACE: usize = 165;
