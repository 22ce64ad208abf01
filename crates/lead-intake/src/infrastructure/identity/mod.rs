//! Current user providers

use crate::ports::outbound::{CurrentUserProvider, UserIdentity};

pub const USER_ID_ENV: &str = "LEAD_INTAKE_USER_ID";
pub const USER_NAME_ENV: &str = "LEAD_INTAKE_USER_NAME";

/// Fixed identity, set by the host (or a test)
#[derive(Clone, Debug, Default)]
pub struct StaticUserProvider {
    user: Option<UserIdentity>,
}

impl StaticUserProvider {
    pub fn new(user: Option<UserIdentity>) -> Self {
        Self { user }
    }

    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

impl CurrentUserProvider for StaticUserProvider {
    fn current_user(&self) -> Option<UserIdentity> {
        self.user.clone()
    }
}

/// Reads the identity from `LEAD_INTAKE_USER_ID` / `LEAD_INTAKE_USER_NAME`
/// on every call
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvUserProvider;

impl EnvUserProvider {
    fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Option<UserIdentity> {
        let id = lookup(USER_ID_ENV).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())?;
        let name = lookup(USER_NAME_ENV).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Some(UserIdentity { id, display_name: name })
    }
}

impl CurrentUserProvider for EnvUserProvider {
    fn current_user(&self) -> Option<UserIdentity> {
        Self::resolve(|key| std::env::var(key).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_provider() {
        let provider = StaticUserProvider::new(Some(UserIdentity::new("u-1")));
        assert_eq!(provider.current_user().unwrap().label(), "u-1");
        assert!(StaticUserProvider::anonymous().current_user().is_none());
    }

    #[test]
    fn test_env_resolution() {
        let user = EnvUserProvider::resolve(|key| match key {
            USER_ID_ENV => Some(" u-9 ".into()),
            USER_NAME_ENV => Some("Priya".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(user.id, "u-9");
        assert_eq!(user.label(), "Priya");

        assert!(EnvUserProvider::resolve(|key| match key {
            USER_NAME_ENV => Some("Priya".into()),
            _ => None,
        })
        .is_none());
    }
}
