use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Session, sessions, users,
    util::{hash_password, normalize_email, verify_password},
};

use super::{Engine, with_tx};

impl Engine {
    /// Register an admin account.
    pub async fn create_admin(&self, email: &str, password: &str) -> ResultEngine<()> {
        let email = normalize_email(email)?;
        if password.is_empty() {
            return Err(EngineError::InvalidName(
                "password must not be empty".to_string(),
            ));
        }
        let password_hash = hash_password(password)?;

        with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(email.clone())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(email));
            }
            users::ActiveModel {
                email: ActiveValue::Set(email.clone()),
                password_hash: ActiveValue::Set(password_hash),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(%email, "admin account created");
            Ok(())
        })
    }

    /// Check credentials and open a new session.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn sign_in(&self, email: &str, password: &str) -> ResultEngine<Session> {
        let email = normalize_email(email)
            .map_err(|_| EngineError::Unauthorized("invalid credentials".to_string()))?;

        with_tx!(self, |db_tx| {
            let user = users::Entity::find_by_id(email.clone()).one(&db_tx).await?;
            let valid = user
                .as_ref()
                .is_some_and(|user| verify_password(password, &user.password_hash));
            if !valid {
                tracing::warn!(%email, "rejected sign-in");
                return Err(EngineError::Unauthorized("invalid credentials".to_string()));
            }

            let model = sessions::ActiveModel {
                token: ActiveValue::Set(Uuid::new_v4().to_string()),
                email: ActiveValue::Set(email.clone()),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            Ok(Session::from(model))
        })
    }

    /// Drop a session. Unknown tokens are ignored.
    pub async fn sign_out(&self, token: &str) -> ResultEngine<()> {
        sessions::Entity::delete_many()
            .filter(sessions::Column::Token.eq(token.to_string()))
            .exec(&self.database)
            .await?;
        Ok(())
    }

    /// Resolve a bearer token to its session.
    pub async fn session_user(&self, token: &str) -> ResultEngine<Session> {
        sessions::Entity::find_by_id(token.to_string())
            .one(&self.database)
            .await?
            .map(Session::from)
            .ok_or_else(|| EngineError::Unauthorized("unknown session".to_string()))
    }
}
