use anchor_lang::{
    prelude::*,
    system_program::{
        allocate, assign, create_account, transfer, Allocate, Assign, CreateAccount, Transfer,
    },
};
use anchor_spl::token_interface::{
    initialize_account3, transfer_checked, InitializeAccount3, Mint, TokenAccount, TokenInterface,
    TransferChecked,
};

use crate::{
    constants::{ANCHOR_DISCRIMINATOR, OFFER_SEED, VAULT_SEED, VAULT_SPACE},
    validation::{check_deposit_source, check_offer_terms, check_unoccupied, TokenHolding},
    Offer,
};

/// Addresses of a newly opened offer, returned to the maker.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct OfferAddresses {
    pub offer: Pubkey,
    pub vault: Pubkey,
}

/// Accounts for `make_offer`: the maker locks token A in a fresh vault and records what they want for it
#[derive(Accounts)]
#[instruction(id: u64)]
pub struct MakeOffer<'info> {
    /// Signs the deposit and pays rent for the offer and the vault
    #[account(mut)]
    pub maker: Signer<'info>,

    /// Token the maker deposits
    #[account(mint::token_program = token_program)]
    pub token_mint_a: Box<InterfaceAccount<'info, Mint>>,

    /// Token the maker wants in return
    #[account(mint::token_program = token_program)]
    pub token_mint_b: Box<InterfaceAccount<'info, Mint>>,

    /// Source of the deposit; mint, authority and balance are checked in the handler
    #[account(mut)]
    pub maker_token_account_a: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Allocated here if needed so that an occupied address surfaces as `DuplicateOffer`
    /// instead of a system program error
    #[account(
        init_if_needed,
        payer = maker,
        space = ANCHOR_DISCRIMINATOR + Offer::INIT_SPACE,
        seeds = [OFFER_SEED, maker.key().as_ref(), id.to_le_bytes().as_ref()],
        bump
    )]
    pub offer: Box<Account<'info, Offer>>,

    /// CHECK: Address is constrained by the seeds below. The handler requires it to be
    /// empty and then creates it as a token account whose authority is the vault itself.
    #[account(
        mut,
        seeds = [VAULT_SEED, offer.key().as_ref()],
        bump
    )]
    pub vault: UncheckedAccount<'info>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

impl<'info> MakeOffer<'info> {
    /// Rejects the call before anything is moved
    pub fn validate(&self, token_a_offered_amount: u64, token_b_wanted_amount: u64) -> Result<()> {
        check_offer_terms(
            token_a_offered_amount,
            token_b_wanted_amount,
            &self.token_mint_a.key(),
            &self.token_mint_b.key(),
        )?;

        check_unoccupied(
            self.offer.is_live(),
            self.vault.owner,
            self.vault.data_is_empty(),
        )?;

        check_deposit_source(
            &TokenHolding::from(&**self.maker_token_account_a),
            &self.maker.key(),
            &self.token_mint_a.key(),
            token_a_offered_amount,
        )
    }

    /// Creates the vault at its derived address and makes it its own authority,
    /// so only this program (signing with the vault seeds) can move funds out of it
    pub fn create_vault(&self, vault_bump: u8) -> Result<()> {
        let offer_key = self.offer.key();
        // The vault signs its own creation with the seeds it is derived from
        let signer_seeds: [&[&[u8]]; 1] = [&[VAULT_SEED, offer_key.as_ref(), &[vault_bump]]];

        // Rent-exempt balance for a base token account, paid by the maker
        let rent = Rent::get()?.minimum_balance(VAULT_SPACE);
        let system_program = self.system_program.to_account_info();
        let current = self.vault.lamports();

        if current == 0 {
            // Fresh address: allocate and hand it to the token program in one step
            let accounts = CreateAccount {
                from: self.maker.to_account_info(),
                to: self.vault.to_account_info(),
            };
            let ctx = CpiContext::new_with_signer(system_program, accounts, &signer_seeds);
            create_account(ctx, rent, VAULT_SPACE as u64, self.token_program.key)?;
        } else {
            // Someone sent lamports to the vault address ahead of us; create_account
            // refuses funded addresses, so top up and claim it piecewise.
            let shortfall = rent.saturating_sub(current);
            if shortfall > 0 {
                let accounts = Transfer {
                    from: self.maker.to_account_info(),
                    to: self.vault.to_account_info(),
                };
                transfer(CpiContext::new(system_program.clone(), accounts), shortfall)?;
            }

            // Reserve the token account space, then give the account to the token program
            let accounts = Allocate {
                account_to_allocate: self.vault.to_account_info(),
            };
            let ctx = CpiContext::new_with_signer(system_program.clone(), accounts, &signer_seeds);
            allocate(ctx, VAULT_SPACE as u64)?;

            let accounts = Assign {
                account_to_assign: self.vault.to_account_info(),
            };
            let ctx = CpiContext::new_with_signer(system_program, accounts, &signer_seeds);
            assign(ctx, self.token_program.key)?;
        }

        // Turn it into a token A account whose authority is the vault address itself
        let accounts = InitializeAccount3 {
            account: self.vault.to_account_info(),
            mint: self.token_mint_a.to_account_info(),
            authority: self.vault.to_account_info(),
        };
        initialize_account3(CpiContext::new(self.token_program.to_account_info(), accounts))
    }

    /// Moves the offered amount of token A from the maker into the vault
    pub fn send_offered_tokens_to_vault(&self, token_a_offered_amount: u64) -> Result<()> {
        let accounts = TransferChecked {
            from: self.maker_token_account_a.to_account_info(),
            mint: self.token_mint_a.to_account_info(),
            to: self.vault.to_account_info(),
            authority: self.maker.to_account_info(),
        };
        let ctx = CpiContext::new(self.token_program.to_account_info(), accounts);
        transfer_checked(ctx, token_a_offered_amount, self.token_mint_a.decimals)
    }

    pub fn save_offer(
        &mut self,
        id: u64,
        token_a_offered_amount: u64,
        token_b_wanted_amount: u64,
        bumps: &MakeOfferBumps,
    ) -> Result<OfferAddresses> {
        self.offer.set_inner(Offer {
            id,
            maker: self.maker.key(),
            token_mint_a: self.token_mint_a.key(),
            token_mint_b: self.token_mint_b.key(),
            token_a_offered_amount,
            token_b_wanted_amount,
            vault: self.vault.key(),
            bump: bumps.offer,
            vault_bump: bumps.vault,
        });

        msg!(
            "Offer {} opened by {}: {} of {} for {} of {}",
            id,
            self.maker.key(),
            token_a_offered_amount,
            self.token_mint_a.key(),
            token_b_wanted_amount,
            self.token_mint_b.key()
        );

        Ok(OfferAddresses {
            offer: self.offer.key(),
            vault: self.vault.key(),
        })
    }
}

pub fn handler(
    ctx: Context<MakeOffer>,
    id: u64,
    token_a_offered_amount: u64,
    token_b_wanted_amount: u64,
) -> Result<OfferAddresses> {
    ctx.accounts.validate(token_a_offered_amount, token_b_wanted_amount)?;

    ctx.accounts.create_vault(ctx.bumps.vault)?;
    ctx.accounts.send_offered_tokens_to_vault(token_a_offered_amount)?;
    ctx.accounts
        .save_offer(id, token_a_offered_amount, token_b_wanted_amount, &ctx.bumps)
}
