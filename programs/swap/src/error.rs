use anchor_lang::prelude::*;

#[error_code]
pub enum SwapError {
    #[msg("Offered and wanted amounts must be greater than zero")]
    InvalidAmount,
    #[msg("An offer with this id is already open for this maker")]
    DuplicateOffer,
    #[msg("No open offer at this address")]
    OfferNotFound,
    #[msg("Token mint does not match the offer")]
    TokenKindMismatch,
    #[msg("Source token account balance is too low")]
    InsufficientBalance,
    #[msg("Signer is not the authority of the source token account")]
    UnauthorizedSigner,
    #[msg("Offered and wanted token mints must be different")]
    SameTokenKind,
    #[msg("Recipient does not belong to the offer maker")]
    RecipientMismatch,
    #[msg("Vault is not the one derived for this offer")]
    VaultMismatch,
    #[msg("No valid bump for the derived address")]
    AddressDerivationFailed,
}

#[cfg(test)]
pub(crate) fn error_code(err: anchor_lang::error::Error) -> u32 {
    match err {
        anchor_lang::error::Error::AnchorError(e) => e.error_code_number,
        anchor_lang::error::Error::ProgramError(e) => panic!("unexpected program error {e:?}"),
    }
}

#[cfg(test)]
pub(crate) fn code(err: SwapError) -> u32 {
    err as u32 + anchor_lang::error::ERROR_CODE_OFFSET
}
