//! In-memory fungible token ledger
//!
//! Implements [`TokenEffects`] for any number of tokens, with balances,
//! allowances and permit nonces. Every mutating call is atomic: it checks
//! everything first and writes only on success.

use quest_core::{
    Address, Permit, PermitDomain, PermitSignature, Timestamp, TokenEffects, TokenError,
};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct TokenState {
    name: String,
    balances: HashMap<Address, u128>,
    allowances: HashMap<(Address, Address), u128>,
    nonces: HashMap<Address, u64>,
    rejecting: bool,
}

impl TokenState {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            balances: HashMap::new(),
            allowances: HashMap::new(),
            nonces: HashMap::new(),
            rejecting: false,
        }
    }

    fn balance(&self, owner: Address) -> u128 {
        self.balances.get(&owner).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: Address, spender: Address) -> u128 {
        self.allowances.get(&(owner, spender)).copied().unwrap_or(0)
    }

    fn nonce(&self, owner: Address) -> u64 {
        self.nonces.get(&owner).copied().unwrap_or(0)
    }
}

/// Token ledger held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenLedger {
    tokens: HashMap<Address, TokenState>,
}

impl MemoryTokenLedger {
    /// Empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token named `name`; its address is derived from the name
    pub fn deploy_token(&mut self, name: &str) -> Address {
        let address = Address::derive(format!("token:{name}").as_bytes());
        self.tokens.insert(address, TokenState::new(name));
        address
    }

    fn state(&self, token: Address) -> Result<&TokenState, TokenError> {
        self.tokens.get(&token).ok_or(TokenError::UnknownToken(token))
    }

    fn state_mut(&mut self, token: Address) -> Result<&mut TokenState, TokenError> {
        self.tokens
            .get_mut(&token)
            .ok_or(TokenError::UnknownToken(token))
    }

    /// Credit `amount` to `to`
    pub fn mint(&mut self, token: Address, to: Address, amount: u128) {
        let state = self.state_mut(token).expect("token deployed");
        *state.balances.entry(to).or_insert(0) += amount;
    }

    /// Set `spender`'s allowance over `owner`'s balance
    pub fn approve(&mut self, token: Address, owner: Address, spender: Address, amount: u128) {
        let state = self.state_mut(token).expect("token deployed");
        state.allowances.insert((owner, spender), amount);
    }

    /// Make every transfer of `token` fail with `TransferRejected`
    pub fn set_rejecting(&mut self, token: Address, rejecting: bool) {
        self.state_mut(token).expect("token deployed").rejecting = rejecting;
    }

    /// Balance, for assertions
    pub fn balance(&self, token: Address, owner: Address) -> u128 {
        self.state(token).map(|s| s.balance(owner)).unwrap_or(0)
    }

    /// Permit nonce, for assertions
    pub fn nonce(&self, token: Address, owner: Address) -> u64 {
        self.state(token).map(|s| s.nonce(owner)).unwrap_or(0)
    }
}

impl TokenEffects for MemoryTokenLedger {
    fn balance_of(&self, token: Address, owner: Address) -> Result<u128, TokenError> {
        Ok(self.state(token)?.balance(owner))
    }

    fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<u128, TokenError> {
        Ok(self.state(token)?.allowance(owner, spender))
    }

    fn nonces(&self, token: Address, owner: Address) -> Result<u64, TokenError> {
        Ok(self.state(token)?.nonce(owner))
    }

    fn permit_domain(&self, token: Address) -> Result<PermitDomain, TokenError> {
        Ok(PermitDomain::new(self.state(token)?.name.clone(), token))
    }

    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), TokenError> {
        let state = self.state_mut(token)?;
        if state.rejecting {
            return Err(TokenError::TransferRejected);
        }
        let allowance = state.allowance(from, spender);
        if allowance < amount {
            return Err(TokenError::InsufficientAllowance {
                needed: amount,
                available: allowance,
            });
        }
        let balance = state.balance(from);
        if balance < amount {
            return Err(TokenError::InsufficientBalance {
                needed: amount,
                available: balance,
            });
        }
        state.allowances.insert((from, spender), allowance - amount);
        state.balances.insert(from, balance - amount);
        *state.balances.entry(to).or_insert(0) += amount;
        Ok(())
    }

    fn transfer_from_with_permit(
        &mut self,
        token: Address,
        permit: &Permit,
        signature: &PermitSignature,
        to: Address,
        now: Timestamp,
    ) -> Result<(), TokenError> {
        let domain = self.permit_domain(token)?;
        let state = self.state_mut(token)?;
        if permit.is_expired(now) {
            return Err(TokenError::PermitExpired {
                deadline: permit.deadline,
            });
        }
        if permit.nonce != state.nonce(permit.owner) {
            return Err(TokenError::BadSignature);
        }
        signature.verify(&domain, permit)?;
        if state.rejecting {
            return Err(TokenError::TransferRejected);
        }
        let balance = state.balance(permit.owner);
        if balance < permit.value {
            return Err(TokenError::InsufficientBalance {
                needed: permit.value,
                available: balance,
            });
        }
        state.nonces.insert(permit.owner, permit.nonce + 1);
        state.allowances.insert((permit.owner, permit.spender), 0);
        state.balances.insert(permit.owner, balance - permit.value);
        *state.balances.entry(to).or_insert(0) += permit.value;
        Ok(())
    }
}
