use anchor_lang::{
    solana_program::{
        instruction::Instruction, program_pack::Pack, pubkey::Pubkey, system_instruction,
        system_program,
    },
    InstructionData, ToAccountMetas,
};
use anchor_spl::token::spl_token;
use litesvm::{types::TransactionResult, LiteSVM};
use solana_sdk::{
    account::Account,
    instruction::InstructionError,
    signature::Keypair,
    signer::Signer,
    transaction::{Transaction, TransactionError},
};

use crate::{
    error::{code, SwapError},
    pda::{offer_address, vault_address},
};

pub const DECIMALS: u8 = 6;

/// Two funded wallets and the four token accounts they trade between.
pub struct SwapEnv {
    pub svm: LiteSVM,
    pub maker: Keypair,
    pub taker: Keypair,
    pub token_mint_a: Pubkey,
    pub token_mint_b: Pubkey,
    pub maker_token_account_a: Pubkey,
    pub maker_token_account_b: Pubkey,
    pub taker_token_account_a: Pubkey,
    pub taker_token_account_b: Pubkey,
}

/// The compiled program, from `cargo test-sbf`'s output dir or the Anchor deploy dir.
fn program_path() -> String {
    match std::env::var("SBF_OUT_DIR") {
        Ok(dir) => format!("{dir}/swap.so"),
        Err(_) => concat!(env!("CARGO_MANIFEST_DIR"), "/../../target/deploy/swap.so").to_string(),
    }
}

/// Maker holds `maker_a` of token A, taker holds `taker_b` of token B.
pub fn setup(maker_a: u64, taker_b: u64) -> SwapEnv {
    let mut svm = LiteSVM::new();
    svm.add_program_from_file(crate::ID, program_path()).unwrap();

    let issuer = Keypair::new();
    let maker = Keypair::new();
    let taker = Keypair::new();
    for wallet in [&issuer, &maker, &taker] {
        svm.airdrop(&wallet.pubkey(), 10_000_000_000).unwrap();
    }

    let token_mint_a = create_mint(&mut svm, &issuer);
    let token_mint_b = create_mint(&mut svm, &issuer);

    let maker_token_account_a = create_token_account(&mut svm, &issuer, &token_mint_a, &maker.pubkey(), maker_a);
    let maker_token_account_b = create_token_account(&mut svm, &issuer, &token_mint_b, &maker.pubkey(), 0);
    let taker_token_account_a = create_token_account(&mut svm, &issuer, &token_mint_a, &taker.pubkey(), 0);
    let taker_token_account_b = create_token_account(&mut svm, &issuer, &token_mint_b, &taker.pubkey(), taker_b);

    SwapEnv {
        svm,
        maker,
        taker,
        token_mint_a,
        token_mint_b,
        maker_token_account_a,
        maker_token_account_b,
        taker_token_account_a,
        taker_token_account_b,
    }
}

/// Signs and sends on a fresh blockhash so identical retries are not deduplicated.
pub fn send(svm: &mut LiteSVM, instructions: &[Instruction], signers: &[&Keypair]) -> TransactionResult {
    svm.expire_blockhash();
    let tx = Transaction::new_signed_with_payer(
        instructions,
        Some(&signers[0].pubkey()),
        signers,
        svm.latest_blockhash(),
    );
    svm.send_transaction(tx)
}

fn create_mint(svm: &mut LiteSVM, issuer: &Keypair) -> Pubkey {
    let mint = Keypair::new();
    let rent = svm.minimum_balance_for_rent_exemption(spl_token::state::Mint::LEN);
    let instructions = [
        system_instruction::create_account(
            &issuer.pubkey(),
            &mint.pubkey(),
            rent,
            spl_token::state::Mint::LEN as u64,
            &spl_token::ID,
        ),
        spl_token::instruction::initialize_mint2(&spl_token::ID, &mint.pubkey(), &issuer.pubkey(), None, DECIMALS)
            .unwrap(),
    ];
    send(svm, &instructions, &[issuer, &mint]).unwrap();
    mint.pubkey()
}

fn create_token_account(svm: &mut LiteSVM, issuer: &Keypair, mint: &Pubkey, owner: &Pubkey, amount: u64) -> Pubkey {
    let account = Keypair::new();
    let rent = svm.minimum_balance_for_rent_exemption(spl_token::state::Account::LEN);
    let mut instructions = vec![
        system_instruction::create_account(
            &issuer.pubkey(),
            &account.pubkey(),
            rent,
            spl_token::state::Account::LEN as u64,
            &spl_token::ID,
        ),
        spl_token::instruction::initialize_account3(&spl_token::ID, &account.pubkey(), mint, owner).unwrap(),
    ];
    if amount > 0 {
        instructions.push(
            spl_token::instruction::mint_to(&spl_token::ID, mint, &account.pubkey(), &issuer.pubkey(), &[], amount)
                .unwrap(),
        );
    }
    send(svm, &instructions, &[issuer, &account]).unwrap();
    account.pubkey()
}

pub fn token_balance(svm: &LiteSVM, account: &Pubkey) -> u64 {
    let account = svm.get_account(account).unwrap();
    spl_token::state::Account::unpack(&account.data).unwrap().amount
}

pub fn lamports(svm: &LiteSVM, account: &Pubkey) -> u64 {
    svm.get_account(account).map_or(0, |account| account.lamports)
}

/// Closed accounts either disappear or linger with no lamports.
pub fn is_closed(svm: &LiteSVM, account: &Pubkey) -> bool {
    svm.get_account(account).map_or(true, |account| account.lamports == 0)
}

pub fn snapshot(svm: &LiteSVM, account: &Pubkey) -> Account {
    svm.get_account(account).unwrap()
}

pub fn offer_and_vault(maker: &Pubkey, id: u64) -> (Pubkey, Pubkey) {
    let (offer, _) = offer_address(maker, id).unwrap();
    let (vault, _) = vault_address(&offer).unwrap();
    (offer, vault)
}

pub fn make_offer_ix(env: &SwapEnv, id: u64, token_a_offered_amount: u64, token_b_wanted_amount: u64) -> Instruction {
    let (offer, vault) = offer_and_vault(&env.maker.pubkey(), id);
    Instruction {
        program_id: crate::ID,
        accounts: crate::accounts::MakeOffer {
            maker: env.maker.pubkey(),
            token_mint_a: env.token_mint_a,
            token_mint_b: env.token_mint_b,
            maker_token_account_a: env.maker_token_account_a,
            offer,
            vault,
            token_program: spl_token::ID,
            system_program: system_program::ID,
        }
        .to_account_metas(None),
        data: crate::instruction::MakeOffer {
            id,
            token_a_offered_amount,
            token_b_wanted_amount,
        }
        .data(),
    }
}

pub fn take_offer_ix(env: &SwapEnv, id: u64) -> Instruction {
    let (offer, vault) = offer_and_vault(&env.maker.pubkey(), id);
    Instruction {
        program_id: crate::ID,
        accounts: crate::accounts::TakeOffer {
            taker: env.taker.pubkey(),
            maker: env.maker.pubkey(),
            token_mint_a: env.token_mint_a,
            token_mint_b: env.token_mint_b,
            taker_token_account_a: env.taker_token_account_a,
            taker_token_account_b: env.taker_token_account_b,
            maker_token_account_b: env.maker_token_account_b,
            offer,
            vault,
            token_program: spl_token::ID,
        }
        .to_account_metas(None),
        data: crate::instruction::TakeOffer {}.data(),
    }
}

pub fn make_offer(env: &mut SwapEnv, id: u64, token_a_offered_amount: u64, token_b_wanted_amount: u64) -> TransactionResult {
    let ix = make_offer_ix(env, id, token_a_offered_amount, token_b_wanted_amount);
    let maker = env.maker.insecure_clone();
    send(&mut env.svm, &[ix], &[&maker])
}

pub fn take_offer(env: &mut SwapEnv, id: u64) -> TransactionResult {
    let ix = take_offer_ix(env, id);
    let taker = env.taker.insecure_clone();
    send(&mut env.svm, &[ix], &[&taker])
}

pub fn assert_rejected_with(result: TransactionResult, expected: SwapError) {
    let failed = result.expect_err("transaction should have failed");
    assert_eq!(
        failed.err,
        TransactionError::InstructionError(0, InstructionError::Custom(code(expected))),
        "logs: {:#?}",
        failed.meta.logs
    );
}
