use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

/// One-way salted password hashing.
///
/// Deliberately slow: the time cost comes from configuration so operators
/// can tune the throughput/security trade-off.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new(time_cost: u32) -> Self {
        // With default memory and parallelism, any t >= 1 is accepted.
        let params = Params::new(
            Params::DEFAULT_M_COST,
            time_cost.max(1),
            Params::DEFAULT_P_COST,
            None,
        )
        .unwrap_or_default();
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Hash with a fresh random salt; two calls on the same input differ.
    pub fn hash(&self, plain: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                anyhow::anyhow!(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    /// Constant-time-equivalent comparison. A malformed stored hash is
    /// treated as a mismatch, never an error.
    pub fn verify(&self, plain: &str, hashed: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hashed) else {
            error!("malformed password hash in store");
            return false;
        };
        self.argon2
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(Params::DEFAULT_T_COST)
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let h = hasher();
        let password = "Secur3P@ssw0rd!";
        let hash = h.hash(password).expect("hashing should succeed");
        assert!(h.verify(password, &hash));
    }

    #[test]
    fn same_password_hashes_differently_but_both_verify() {
        let h = hasher();
        let password = "correct-horse-battery-staple";
        let a = h.hash(password).expect("first hash");
        let b = h.hash(password).expect("second hash");
        assert_ne!(a, b);
        assert!(h.verify(password, &a));
        assert!(h.verify(password, &b));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let h = hasher();
        let hash = h.hash("right-password").expect("hashing should succeed");
        assert!(!h.verify("wrong-password", &hash));
    }

    #[test]
    fn verify_returns_false_on_malformed_hash() {
        let h = hasher();
        assert!(!h.verify("anything", "not-a-valid-hash"));
        assert!(!h.verify("anything", ""));
    }

    #[test]
    fn time_cost_is_tunable() {
        let h = PasswordHasher::new(4);
        let hash = h.hash("pw").expect("hash");
        // t=4 is embedded in the PHC string.
        assert!(hash.contains("t=4"));
        assert!(h.verify("pw", &hash));
    }
}
