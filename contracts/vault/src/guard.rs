use soroban_sdk::Env;

use crate::error::VaultError;
use crate::storage::{is_locked, set_locked};

/// Held for the whole body of every state-mutating entry point.
/// The lock is released when the guard drops, on every exit path.
pub struct ReentrancyGuard<'a> {
    env: &'a Env,
}

impl<'a> ReentrancyGuard<'a> {
    pub fn acquire(env: &'a Env) -> Result<Self, VaultError> {
        if is_locked(env) {
            return Err(VaultError::Reentrancy);
        }
        set_locked(env, true);
        Ok(Self { env })
    }
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        set_locked(self.env, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShareVault;

    #[test]
    fn second_acquire_fails_until_release() {
        let env = Env::default();
        let vault = env.register_contract(None, ShareVault);

        env.as_contract(&vault, || {
            let guard = ReentrancyGuard::acquire(&env).unwrap();
            assert!(is_locked(&env));
            assert_eq!(
                ReentrancyGuard::acquire(&env).err(),
                Some(VaultError::Reentrancy)
            );

            drop(guard);
            assert!(!is_locked(&env));
            assert!(ReentrancyGuard::acquire(&env).is_ok());
            assert!(!is_locked(&env));
        });
    }

    #[test]
    fn released_on_early_return() {
        fn fails_midway(env: &Env) -> Result<(), VaultError> {
            let _guard = ReentrancyGuard::acquire(env)?;
            Err(VaultError::InvalidAmount)
        }

        let env = Env::default();
        let vault = env.register_contract(None, ShareVault);

        env.as_contract(&vault, || {
            assert_eq!(fails_midway(&env), Err(VaultError::InvalidAmount));
            assert!(!is_locked(&env));
        });
    }
}
