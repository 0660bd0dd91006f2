use anchor_lang::{prelude::*, AccountsClose};
use anchor_spl::token_interface::{
    close_account, transfer_checked, CloseAccount, Mint, TokenAccount, TokenInterface,
    TransferChecked,
};

use crate::{
    constants::VAULT_SEED,
    error::SwapError,
    pda::{verify_offer_address, verify_vault_address},
    validation::{Settlement, TokenHolding},
    Offer,
};

/// Accounts for `take_offer`: the taker pays the maker in token B and receives the vaulted token A
#[derive(Accounts)]
pub struct TakeOffer<'info> {
    /// Signs the payment of token B
    #[account(mut)]
    pub taker: Signer<'info>,

    /// The offer's maker; receives token B and the rent of the vault and the offer
    #[account(mut)]
    pub maker: SystemAccount<'info>,

    pub token_mint_a: Box<InterfaceAccount<'info, Mint>>,

    pub token_mint_b: Box<InterfaceAccount<'info, Mint>>,

    /// Receives the vaulted token A
    #[account(mut)]
    pub taker_token_account_a: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Pays token B
    #[account(mut)]
    pub taker_token_account_b: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Receives token B
    #[account(mut)]
    pub maker_token_account_b: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: Deserialized in the handler so that a settled or unknown offer is
    /// reported as `OfferNotFound`. Owner, discriminator and address are all checked there.
    #[account(mut)]
    pub offer: UncheckedAccount<'info>,

    /// CHECK: Must be the vault recorded in the offer; address, owner and authority are
    /// checked in the handler after the offer is loaded.
    #[account(mut)]
    pub vault: UncheckedAccount<'info>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> TakeOffer<'info> {
    /// Loads the offer and checks every supplied account against it
    pub fn load_and_validate(&self) -> Result<(Offer, u64)> {
        let offer = Offer::load_live(&self.offer)?;
        verify_offer_address(self.offer.key, &offer.maker, offer.id, offer.bump)?;

        // The vault must be the one derived for this offer and still a token account
        verify_vault_address(self.vault.key, self.offer.key, offer.vault_bump)?;
        require_keys_eq!(*self.vault.owner, self.token_program.key(), SwapError::VaultMismatch);
        let vault = {
            let data = self.vault.try_borrow_data()?;
            TokenAccount::try_deserialize(&mut &data[..])?
        };

        let vault_holding = TokenHolding::from(&vault);
        Settlement {
            offer: &offer,
            taker: self.taker.key,
            maker: self.maker.key,
            token_mint_a: &self.token_mint_a.key(),
            token_mint_b: &self.token_mint_b.key(),
            taker_token_account_a: &TokenHolding::from(&**self.taker_token_account_a),
            taker_token_account_b: &TokenHolding::from(&**self.taker_token_account_b),
            maker_token_account_b: &TokenHolding::from(&**self.maker_token_account_b),
            vault: &vault_holding,
            vault_key: self.vault.key,
        }
        .check()?;

        Ok((offer, vault_holding.amount))
    }

    /// Pays the maker the wanted amount of token B
    pub fn send_wanted_tokens_to_maker(&self, offer: &Offer) -> Result<()> {
        let accounts = TransferChecked {
            from: self.taker_token_account_b.to_account_info(),
            mint: self.token_mint_b.to_account_info(),
            to: self.maker_token_account_b.to_account_info(),
            authority: self.taker.to_account_info(),
        };
        let ctx = CpiContext::new(self.token_program.to_account_info(), accounts);
        transfer_checked(ctx, offer.token_b_wanted_amount, self.token_mint_b.decimals)
    }

    /// Empties the vault into the taker's account and closes it, signing as the vault
    pub fn withdraw_and_close_vault(&self, offer: &Offer, vault_amount: u64) -> Result<()> {
        let offer_key = self.offer.key();
        // The vault is its own authority, so it signs with its own seeds
        let signer_seeds: [&[&[u8]]; 1] = [&[VAULT_SEED, offer_key.as_ref(), &[offer.vault_bump]]];

        // Send the whole vault balance of token A to the taker
        let accounts = TransferChecked {
            from: self.vault.to_account_info(),
            mint: self.token_mint_a.to_account_info(),
            to: self.taker_token_account_a.to_account_info(),
            authority: self.vault.to_account_info(),
        };
        let ctx = CpiContext::new_with_signer(
            self.token_program.to_account_info(),
            accounts,
            &signer_seeds,
        );
        transfer_checked(ctx, vault_amount, self.token_mint_a.decimals)?;

        // The vault is empty now; close it and return its rent to the maker
        let accounts = CloseAccount {
            account: self.vault.to_account_info(),
            destination: self.maker.to_account_info(),
            authority: self.vault.to_account_info(),
        };
        let ctx = CpiContext::new_with_signer(
            self.token_program.to_account_info(),
            accounts,
            &signer_seeds,
        );
        close_account(ctx)
    }

    /// Returns the offer's rent to the maker and hands the account back to the system program
    pub fn close_offer(&self) -> Result<()> {
        // Re-wrap the already validated record so Anchor's close path can retire it
        let offer = Account::<Offer>::try_from(&self.offer.to_account_info())?;

        // Moves every lamport to the maker, reassigns to the system program and wipes the data
        offer.close(self.maker.to_account_info())
    }
}

pub fn handler(ctx: Context<TakeOffer>) -> Result<()> {
    let (offer, vault_amount) = ctx.accounts.load_and_validate()?;

    ctx.accounts.send_wanted_tokens_to_maker(&offer)?;
    ctx.accounts.withdraw_and_close_vault(&offer, vault_amount)?;
    ctx.accounts.close_offer()?;

    msg!(
        "Offer {} of {} taken by {}: {} of {} for {} of {}",
        offer.id,
        offer.maker,
        ctx.accounts.taker.key(),
        vault_amount,
        offer.token_mint_a,
        offer.token_b_wanted_amount,
        offer.token_mint_b
    );
    Ok(())
}
