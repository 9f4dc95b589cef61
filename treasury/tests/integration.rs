use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use governance::{DaoDirectory, VotingParams};
use treasury::{Treasury, TreasuryError};
use voting::{BudgetProposals, ProposalFunding};
use wellness_core::{
    AccountId, BlockClock, ContractRef, InMemoryLedger, LedgerError, SharedLedger, TokenLedger,
};

struct StubDirectory {
    owner: AccountId,
}

impl DaoDirectory for StubDirectory {
    fn dao_owner(&self) -> AccountId {
        self.owner.clone()
    }

    fn is_paused(&self) -> bool {
        false
    }

    fn voting_params(&self) -> VotingParams {
        VotingParams {
            voting_threshold: 51,
            quorum_percentage: 20,
            proposal_duration: 1440,
        }
    }
}

/// Budget proposals the tests plant directly.
struct StubBudgets {
    proposals: RwLock<HashMap<u64, ProposalFunding>>,
}

impl StubBudgets {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            proposals: RwLock::new(HashMap::new()),
        })
    }

    fn put(&self, id: u64, executed: bool, budget: u64) {
        self.proposals
            .write()
            .unwrap()
            .insert(id, ProposalFunding { executed, budget });
    }
}

impl BudgetProposals for StubBudgets {
    fn proposal_funding(&self, id: u64) -> Option<ProposalFunding> {
        self.proposals.read().unwrap().get(&id).copied()
    }
}

fn user() -> AccountId {
    AccountId::from("ST1USER")
}

fn owner() -> AccountId {
    AccountId::from("ST1OWNER")
}

fn setup() -> (Arc<StubBudgets>, SharedLedger, BlockClock, Treasury) {
    let budgets = StubBudgets::new();
    let ledger: SharedLedger = Arc::new(RwLock::new(InMemoryLedger::new()));
    let clock = BlockClock::new();
    let treasury = Treasury::new(
        AccountId::from(".treasury"),
        ContractRef::new(
            AccountId::from(".governance"),
            Arc::new(StubDirectory { owner: owner() }) as Arc<dyn DaoDirectory>,
        ),
        ContractRef::new(
            AccountId::from(".voting"),
            budgets.clone() as Arc<dyn BudgetProposals>,
        ),
        ledger.clone(),
        clock.clone(),
    );
    (budgets, ledger, clock, treasury)
}

fn mint(ledger: &SharedLedger, amount: u64, account: &AccountId) {
    ledger.write().unwrap().mint(amount, account).unwrap();
}

fn balance(ledger: &SharedLedger, account: &AccountId) -> u64 {
    ledger.read().unwrap().balance_of(account)
}

#[test]
fn test_contributes_funds() {
    let (_budgets, ledger, _clock, mut treasury) = setup();
    mint(&ledger, 1000, &user());

    treasury.contribute(&user(), 500).unwrap();

    assert_eq!(treasury.total_funds(), 500);
    let contribution = treasury.contribution(&user()).unwrap();
    assert_eq!(contribution.amount, 500);
    assert_eq!(contribution.locked_until, 1440);
    assert_eq!(balance(&ledger, &user()), 500);
    assert_eq!(balance(&ledger, &AccountId::from(".treasury")), 500);
}

#[test]
fn test_rejects_contribution_when_paused() {
    let (_budgets, ledger, _clock, mut treasury) = setup();
    mint(&ledger, 1000, &user());
    treasury.pause(&owner()).unwrap();

    let err = treasury.contribute(&user(), 500).unwrap_err();
    assert_eq!(err, TreasuryError::AlreadyPaused);
    assert_eq!(err.code(), 305);
}

#[test]
fn test_rejects_zero_contribution() {
    let (_budgets, _ledger, _clock, mut treasury) = setup();
    let err = treasury.contribute(&user(), 0).unwrap_err();
    assert_eq!(err, TreasuryError::InvalidAmount);
    assert_eq!(err.code(), 302);
}

#[test]
fn test_ledger_failure_propagates_and_records_nothing() {
    let (_budgets, ledger, _clock, mut treasury) = setup();
    mint(&ledger, 100, &user());

    let err = treasury.contribute(&user(), 500).unwrap_err();
    assert_eq!(
        err,
        TreasuryError::Token(LedgerError::InsufficientBalance {
            requested: 500,
            available: 100
        })
    );
    assert_eq!(err.code(), 1);
    assert_eq!(treasury.total_funds(), 0);
    assert!(treasury.contribution(&user()).is_none());
    assert_eq!(balance(&ledger, &user()), 100);
}

#[test]
fn test_new_contribution_resets_lock() {
    let (_budgets, ledger, clock, mut treasury) = setup();
    mint(&ledger, 1000, &user());

    treasury.contribute(&user(), 500).unwrap();
    assert_eq!(treasury.contribution(&user()).unwrap().locked_until, 1440);

    clock.advance_to(1000);
    treasury.contribute(&user(), 300).unwrap();

    let contribution = treasury.contribution(&user()).unwrap();
    // Amount accumulates, the lock is overwritten (not extended)
    assert_eq!(contribution.amount, 800);
    assert_eq!(contribution.locked_until, 2440);
    assert_eq!(treasury.total_funds(), 800);
}

#[test]
fn test_withdraws_after_lock() {
    let (_budgets, ledger, clock, mut treasury) = setup();
    mint(&ledger, 1000, &user());
    treasury.contribute(&user(), 500).unwrap();

    clock.advance_to(1000);
    let err = treasury.withdraw_contribution(&user(), 300).unwrap_err();
    assert_eq!(
        err,
        TreasuryError::ContributionLocked {
            unlocks_at: 1440,
            height: 1000
        }
    );
    assert_eq!(err.code(), 311);

    clock.advance_to(1500);
    treasury.withdraw_contribution(&user(), 300).unwrap();
    assert_eq!(treasury.total_funds(), 200);
    let contribution = treasury.contribution(&user()).unwrap();
    assert_eq!(contribution.amount, 200);
    // Withdrawing does not refresh the lock
    assert_eq!(contribution.locked_until, 1440);
    assert_eq!(balance(&ledger, &user()), 800);
}

#[test]
fn test_rejects_overdrawn_withdrawal() {
    let (_budgets, ledger, clock, mut treasury) = setup();
    mint(&ledger, 1000, &user());
    treasury.contribute(&user(), 500).unwrap();
    clock.advance_to(1500);

    let err = treasury.withdraw_contribution(&user(), 600).unwrap_err();
    assert_eq!(
        err,
        TreasuryError::InsufficientFunds {
            requested: 600,
            available: 500
        }
    );
    assert_eq!(err.code(), 301);
    assert_eq!(treasury.total_funds(), 500);
}

#[test]
fn test_rejects_withdrawal_without_record() {
    let (_budgets, _ledger, _clock, mut treasury) = setup();
    let err = treasury.withdraw_contribution(&user(), 100).unwrap_err();
    assert_eq!(err, TreasuryError::InvalidContribution);
    assert_eq!(err.code(), 312);
}

#[test]
fn test_disburses_executed_proposal() {
    let (budgets, ledger, _clock, mut treasury) = setup();
    mint(&ledger, 10_000, &user());
    treasury.contribute(&user(), 10_000).unwrap();
    budgets.put(0, true, 5000);

    treasury
        .disburse_proposal_funds(&owner(), 0, &AccountId::from("ST2RECIPIENT"))
        .unwrap();

    assert_eq!(treasury.total_funds(), 5000);
    assert_eq!(balance(&ledger, &AccountId::from("ST2RECIPIENT")), 5000);
    assert_eq!(balance(&ledger, &AccountId::from(".treasury")), 5000);
}

#[test]
fn test_rejects_disbursement_by_non_owner() {
    let (budgets, _ledger, _clock, mut treasury) = setup();
    budgets.put(0, true, 5000);

    let err = treasury
        .disburse_proposal_funds(&AccountId::from("ST2FAKE"), 0, &AccountId::from("ST2RECIPIENT"))
        .unwrap_err();
    assert_eq!(err, TreasuryError::NotAuthorized);
    assert_eq!(err.code(), 300);
}

#[test]
fn test_rejects_disbursement_before_execution() {
    let (budgets, ledger, _clock, mut treasury) = setup();
    mint(&ledger, 10_000, &user());
    treasury.contribute(&user(), 10_000).unwrap();
    budgets.put(0, false, 5000);

    // Fails regardless of caller, funds, or recipient validity
    let err = treasury
        .disburse_proposal_funds(&owner(), 0, &AccountId::from("ST2RECIPIENT"))
        .unwrap_err();
    assert_eq!(err, TreasuryError::ProposalNotExecuted(0));
    assert_eq!(err.code(), 304);
    assert_eq!(treasury.total_funds(), 10_000);
}

#[test]
fn test_rejects_disbursement_of_unknown_proposal() {
    let (_budgets, _ledger, _clock, mut treasury) = setup();
    let err = treasury
        .disburse_proposal_funds(&owner(), 9, &AccountId::from("ST2RECIPIENT"))
        .unwrap_err();
    assert_eq!(err, TreasuryError::ProposalNotFound(9));
    assert_eq!(err.code(), 303);
}

#[test]
fn test_rejects_null_recipient() {
    let (budgets, ledger, _clock, mut treasury) = setup();
    mint(&ledger, 10_000, &user());
    treasury.contribute(&user(), 10_000).unwrap();
    budgets.put(0, true, 5000);

    let err = treasury
        .disburse_proposal_funds(&owner(), 0, &AccountId::null())
        .unwrap_err();
    assert_eq!(err, TreasuryError::InvalidRecipient);
    assert_eq!(err.code(), 307);
}

#[test]
fn test_rejects_disbursement_beyond_pool() {
    let (budgets, ledger, _clock, mut treasury) = setup();
    mint(&ledger, 1000, &user());
    treasury.contribute(&user(), 1000).unwrap();
    budgets.put(0, true, 5000);

    let err = treasury
        .disburse_proposal_funds(&owner(), 0, &AccountId::from("ST2RECIPIENT"))
        .unwrap_err();
    assert_eq!(
        err,
        TreasuryError::InsufficientFunds {
            requested: 5000,
            available: 1000
        }
    );
}

#[test]
fn test_pause_guards() {
    let (_budgets, _ledger, _clock, mut treasury) = setup();

    assert_eq!(
        treasury.pause(&AccountId::from("ST2FAKE")),
        Err(TreasuryError::NotAuthorized)
    );
    assert_eq!(treasury.unpause(&owner()), Err(TreasuryError::NotPaused));

    treasury.pause(&owner()).unwrap();
    assert!(treasury.is_paused());
    assert_eq!(treasury.pause(&owner()), Err(TreasuryError::AlreadyPaused));

    treasury.unpause(&owner()).unwrap();
    assert!(!treasury.is_paused());
}

#[test]
fn test_contract_pointer_setters() {
    let (budgets, _ledger, _clock, mut treasury) = setup();
    assert_eq!(
        treasury.governance_contract(),
        &AccountId::from(".governance")
    );
    assert_eq!(treasury.voting_contract(), &AccountId::from(".voting"));

    // Null principals are rejected
    assert_eq!(
        treasury.set_voting_contract(
            &owner(),
            ContractRef::new(AccountId::null(), budgets.clone() as Arc<dyn BudgetProposals>),
        ),
        Err(TreasuryError::InvalidRecipient)
    );

    treasury
        .set_voting_contract(
            &owner(),
            ContractRef::new(
                AccountId::from(".new-voting"),
                budgets.clone() as Arc<dyn BudgetProposals>,
            ),
        )
        .unwrap();
    assert_eq!(treasury.voting_contract(), &AccountId::from(".new-voting"));

    assert_eq!(
        treasury.set_governance_contract(
            &AccountId::from("ST2FAKE"),
            ContractRef::new(
                AccountId::from(".new-governance"),
                Arc::new(StubDirectory { owner: owner() }) as Arc<dyn DaoDirectory>,
            ),
        ),
        Err(TreasuryError::NotAuthorized)
    );
}

#[test]
fn test_total_funds_accounting() {
    let (budgets, ledger, clock, mut treasury) = setup();
    let other = AccountId::from("ST3OTHER");
    mint(&ledger, 5000, &user());
    mint(&ledger, 5000, &other);

    treasury.contribute(&user(), 3000).unwrap();
    treasury.contribute(&other, 2000).unwrap();
    assert_eq!(treasury.total_funds(), 5000);

    clock.advance_to(2000);
    treasury.withdraw_contribution(&user(), 1000).unwrap();
    assert_eq!(treasury.total_funds(), 4000);

    budgets.put(0, true, 1500);
    treasury
        .disburse_proposal_funds(&owner(), 0, &AccountId::from("ST2RECIPIENT"))
        .unwrap();

    // contributions in - withdrawals - disbursements
    assert_eq!(treasury.total_funds(), 2500);
    assert_eq!(balance(&ledger, &AccountId::from(".treasury")), 2500);
}
