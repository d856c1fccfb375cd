use crate::models::{User, UserAccount, UserRole};

/// Fixed demo accounts. Passwords are compared in plain text.
pub fn seed_accounts() -> Vec<UserAccount> {
    vec![
        UserAccount::new(
            "1",
            "researcher@example.com",
            "password",
            "Alex Researcher",
            UserRole::Researcher,
        )
        .with_organization("AI Research Lab"),
        UserAccount::new(
            "2",
            "dev@example.com",
            "password",
            "Sam Developer",
            UserRole::Developer,
        )
        .with_organization("Tech Solutions"),
        UserAccount::new(
            "3",
            "admin@example.com",
            "password",
            "Jordan Admin",
            UserRole::Admin,
        ),
    ]
}

/// Read-only credential lookup table
#[derive(Debug, Clone)]
pub struct CredentialStore {
    accounts: Vec<UserAccount>,
}

impl CredentialStore {
    pub fn new(accounts: Vec<UserAccount>) -> Self {
        Self { accounts }
    }

    /// Exact email and password match; yields the account minus its password
    pub fn authenticate(&self, email: &str, password: &str) -> Option<User> {
        self.accounts
            .iter()
            .find(|a| a.matches(email, password))
            .map(UserAccount::to_user)
    }

    pub fn accounts(&self) -> &[UserAccount] {
        &self.accounts
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new(seed_accounts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_seed_account_authenticates() {
        let store = CredentialStore::default();
        for account in store.accounts() {
            let user = store.authenticate(&account.email, &account.password).unwrap();
            assert_eq!(user, account.to_user());
        }
    }

    #[test]
    fn test_lookup_is_exact() {
        let store = CredentialStore::default();
        assert!(store.authenticate("researcher@example.com", "Password").is_none());
        assert!(store.authenticate("Researcher@example.com", "password").is_none());
        assert!(store.authenticate(" researcher@example.com", "password").is_none());
        assert!(store.authenticate("nobody@example.com", "password").is_none());
    }

    #[test]
    fn test_admin_has_no_organization() {
        let store = CredentialStore::default();
        let admin = store.authenticate("admin@example.com", "password").unwrap();
        assert_eq!(admin.role, UserRole::Admin);
        assert!(admin.organization.is_none());
    }
}
