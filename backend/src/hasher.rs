/* wattway
 * Copyright (C) 2025 Frederic Henrichs <frederic@tinkerforge.com>
 *
 * This library is free software; you can redistribute it and/or
 * modify it under the terms of the GNU Lesser General Public
 * License as published by the Free Software Foundation; either
 * version 2 of the License, or (at your option) any later version.
 *
 * This library is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU
 * Lesser General Public License for more details.
 *
 * You should have received a copy of the GNU Lesser General Public
 * License along with this library; if not, write to the
 * Free Software Foundation, Inc., 59 Temple Place - Suite 330,
 * Boston, MA 02111-1307, USA.
 */

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHashString, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};

use crate::error::Error;

/// Well formed hash with the default argon2 parameters that no password matches.
/// Verified against for unknown users so a failed login costs the same either way.
pub const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$d2F0dHdheS1kdW1teS1zYQ$Z7ASEd4v4McC7h3ZzBEB3W94cnt/AQtsgkHfWRiF/KU";

struct HashRequest {
    password: String,
    salt: SaltString,
    responder: tokio::sync::oneshot::Sender<argon2::password_hash::Result<PasswordHashString>>,
}

struct VerifyRequest {
    hash: PasswordHashString,
    password: String,
    responder: tokio::sync::oneshot::Sender<argon2::password_hash::Result<()>>,
}

enum Request {
    Hash(HashRequest),
    Verify(VerifyRequest),
}

/// Runs argon2 on one background task so concurrent logins cannot
/// saturate every worker thread.
pub struct HasherManager {
    tx: tokio::sync::mpsc::Sender<Request>,
}

impl Default for HasherManager {
    fn default() -> Self {
        Self::new()
    }
}

impl HasherManager {
    /// Must be called from within a running actix/tokio runtime.
    pub fn new() -> Self {
        let (tx, mut rx) = tokio::sync::mpsc::channel(10);

        actix_web::rt::spawn(async move {
            let hasher = Argon2::default();
            while let Some(request) = rx.recv().await {
                match request {
                    Request::Hash(hash_request) => {
                        let result = hasher
                            .hash_password(hash_request.password.as_bytes(), &hash_request.salt)
                            .map(|hash| hash.serialize());
                        let _ = hash_request.responder.send(result);
                    }
                    Request::Verify(verify_request) => {
                        let hash = verify_request.hash.password_hash();
                        let result =
                            hasher.verify_password(verify_request.password.as_bytes(), &hash);
                        let _ = verify_request.responder.send(result);
                    }
                }
            }
        });

        Self { tx }
    }

    /// Hash a password with a fresh salt and return the PHC string.
    pub async fn hash_password(&self, password: String) -> Result<String, Error> {
        let salt = SaltString::generate(&mut OsRng);
        let (responder_tx, responder_rx) = tokio::sync::oneshot::channel();
        let request = Request::Hash(HashRequest {
            password,
            salt,
            responder: responder_tx,
        });
        if self.tx.send(request).await.is_err() {
            log::error!("Hasher task is gone");
            return Err(Error::InternalError);
        }

        match responder_rx.await {
            Ok(Ok(hash)) => Ok(hash.to_string()),
            Ok(Err(err)) => {
                log::error!("Failed to hash password: {err}");
                Err(Error::InternalError)
            }
            Err(_err) => Err(Error::InternalError),
        }
    }

    /// Check a password against a stored PHC string.
    ///
    /// A mismatch is `Ok(false)`, only a broken hash or a dead hasher task is an error.
    pub async fn verify_password(&self, password: String, hash: &str) -> Result<bool, Error> {
        let hash = match PasswordHash::new(hash) {
            Ok(h) => h.serialize(),
            Err(err) => {
                log::error!("Stored password hash is invalid: {err}");
                return Err(Error::InternalError);
            }
        };

        let (responder_tx, responder_rx) = tokio::sync::oneshot::channel();
        let request = Request::Verify(VerifyRequest {
            hash,
            password,
            responder: responder_tx,
        });
        if self.tx.send(request).await.is_err() {
            log::error!("Hasher task is gone");
            return Err(Error::InternalError);
        }

        match responder_rx.await {
            Ok(Ok(())) => Ok(true),
            Ok(Err(argon2::password_hash::Error::Password)) => Ok(false),
            Ok(Err(err)) => {
                log::error!("Failed to verify password: {err}");
                Err(Error::InternalError)
            }
            Err(_err) => Err(Error::InternalError),
        }
    }

    /// Spend one verification on [`DUMMY_HASH`].
    pub async fn verify_dummy(&self, password: String) -> Result<(), Error> {
        self.verify_password(password, DUMMY_HASH).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_hash_and_verify() {
        let hasher = HasherManager::new();
        let hash = hasher.hash_password("TestTestTest".to_string()).await.unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(hasher.verify_password("TestTestTest".to_string(), &hash).await.unwrap());
        assert!(!hasher.verify_password("TestTestTest1".to_string(), &hash).await.unwrap());
    }

    #[actix_web::test]
    async fn test_same_password_different_salt() {
        let hasher = HasherManager::new();
        let first = hasher.hash_password("password123".to_string()).await.unwrap();
        let second = hasher.hash_password("password123".to_string()).await.unwrap();
        assert_ne!(first, second);
    }

    #[actix_web::test]
    async fn test_dummy_hash_matches_nothing() {
        let hasher = HasherManager::new();
        assert_eq!(
            hasher.verify_password("".to_string(), DUMMY_HASH).await,
            Ok(false)
        );
        assert_eq!(
            hasher.verify_password("wattway".to_string(), DUMMY_HASH).await,
            Ok(false)
        );
        assert_eq!(hasher.verify_dummy("password123".to_string()).await, Ok(()));
    }

    #[actix_web::test]
    async fn test_dummy_hash_uses_default_cost() {
        let hasher = HasherManager::new();
        let real = hasher.hash_password("password123".to_string()).await.unwrap();
        let real = PasswordHash::new(&real).unwrap();
        let dummy = PasswordHash::new(DUMMY_HASH).unwrap();

        assert_eq!(dummy.algorithm, real.algorithm);
        assert_eq!(dummy.version, real.version);
        assert_eq!(dummy.params, real.params);
        assert_eq!(
            dummy.hash.map(|h| h.len()),
            real.hash.map(|h| h.len())
        );
    }

    #[actix_web::test]
    async fn test_garbage_hash_is_error() {
        let hasher = HasherManager::new();
        assert_eq!(
            hasher.verify_password("password123".to_string(), "garbage").await,
            Err(Error::InternalError)
        );
    }
}
