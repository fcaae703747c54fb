//! Registration, login and bearer-token verification.

use std::sync::Arc;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use tigerwatch_core::{
  store::UserStore,
  user::{NewUser, User},
};
use uuid::Uuid;

use crate::AccountError;

/// Registration input. The password is plaintext and is hashed here.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
  pub username: String,
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
  /// User id.
  sub: String,
  iat: i64,
  exp: i64,
}

pub struct AccountService<S> {
  store:      Arc<S>,
  encoding:   EncodingKey,
  decoding:   DecodingKey,
  validation: Validation,
  token_ttl:  Duration,
}

impl<S: UserStore> AccountService<S> {
  /// Tokens are HS256-signed with `secret` and live for `token_ttl`.
  pub fn new(store: Arc<S>, secret: &str, token_ttl: Duration) -> Self {
    Self {
      store,
      encoding: EncodingKey::from_secret(secret.as_bytes()),
      decoding: DecodingKey::from_secret(secret.as_bytes()),
      validation: Validation::new(Algorithm::HS256),
      token_ttl,
    }
  }

  pub async fn register(&self, account: NewAccount) -> Result<User, AccountError> {
    let username = account.username.trim();
    let email = account.email.trim();
    if username.is_empty() {
      return Err(AccountError::Validation("username must not be empty".into()));
    }
    if email.is_empty() || !email.contains('@') {
      return Err(AccountError::Validation("email must be a valid address".into()));
    }
    if account.password.is_empty() {
      return Err(AccountError::Validation("password must not be empty".into()));
    }

    let existing = self
      .store
      .find_user_by_username_or_email(username, email)
      .await
      .map_err(|e| AccountError::Store(Box::new(e)))?;
    if existing.is_some() {
      return Err(AccountError::UserAlreadyExists);
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
      .hash_password(account.password.as_bytes(), &salt)
      .map_err(|e| AccountError::Hashing(e.to_string()))?
      .to_string();

    let user = self
      .store
      .create_user(NewUser {
        user_id: Uuid::new_v4(),
        username: username.to_owned(),
        email: email.to_owned(),
        password_hash,
      })
      .await
      .map_err(|e| AccountError::Store(Box::new(e)))?;
    tracing::info!(user_id = %user.user_id, username = %user.username, "registered user");
    Ok(user)
  }

  /// Check credentials and issue an access token.
  pub async fn login(&self, username: &str, password: &str) -> Result<String, AccountError> {
    let user = self
      .store
      .find_user_by_username(username)
      .await
      .map_err(|e| AccountError::Store(Box::new(e)))?
      .ok_or(AccountError::InvalidCredentials)?;

    let parsed =
      PasswordHash::new(&user.password_hash).map_err(|_| AccountError::InvalidCredentials)?;
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .map_err(|_| AccountError::InvalidCredentials)?;

    self.issue_token(user.user_id)
  }

  pub fn issue_token(&self, user_id: Uuid) -> Result<String, AccountError> {
    let now = Utc::now();
    let claims = Claims {
      sub: user_id.to_string(),
      iat: now.timestamp(),
      exp: (now + self.token_ttl).timestamp(),
    };
    Ok(jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
  }

  /// The user id a token was issued for.
  pub fn verify(&self, token: &str) -> Result<Uuid, AccountError> {
    let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
      .map_err(|_| AccountError::InvalidToken)?;
    data.claims.sub.parse().map_err(|_| AccountError::InvalidToken)
  }
}
