use crate::{RequestError, RequestResult};

/// Proof that the holder passed the admin password check.
///
/// Can only be obtained from [`AdminGate::login`] and is handed to every
/// operation that writes to the store.
#[derive(Debug, Clone)]
pub struct AdminCapability {
    _private: (),
}

/// Checks the shared admin password.
#[derive(Clone)]
pub struct AdminGate {
    password: String,
}

impl AdminGate {
    pub fn new<S: Into<String>>(password: S) -> Self {
        Self {
            password: password.into(),
        }
    }

    pub fn login(&self, attempt: &str) -> RequestResult<AdminCapability> {
        if !self.password.is_empty() && attempt == self.password {
            log::info!("Admin login succeeded");
            Ok(AdminCapability { _private: () })
        } else {
            log::warn!("Admin login rejected");
            Err(RequestError::Unauthorized)
        }
    }
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn correct_password_grants_capability() {
        let gate = AdminGate::new("admin123");
        assert!(gate.login("admin123").is_ok());
    }

    #[test]
    fn wrong_password_is_unauthorized() {
        let gate = AdminGate::new("admin123");
        let error = assert_matches!(gate.login("admin"), Err(error) => error);
        assert_matches!(error, RequestError::Unauthorized);
        assert_eq!(error.to_string(), "Incorrect password.");
    }

    #[test]
    fn empty_password_never_unlocks() {
        let gate = AdminGate::new("");
        assert_matches!(gate.login(""), Err(RequestError::Unauthorized));
    }

    #[test]
    fn debug_output_hides_the_password() {
        let gate = AdminGate::new("admin123");
        assert!(!format!("{:?}", gate).contains("admin123"));
    }
}
