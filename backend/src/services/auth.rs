//! Authentication flow
//!
//! Login turns credentials into a token; authenticate turns a token back
//! into the acting identity for every protected request.

use crate::auth::{AuthUser, JwtService, PasswordService};
use crate::error::{ApiError, ApiResult};
use crate::repositories::UserStore;
use chirp_shared::types::AuthToken;
use tracing::{debug, info};

pub struct AuthService;

impl AuthService {
    /// Verify credentials and issue an identity token
    ///
    /// An unknown email and a wrong password are indistinguishable to the
    /// caller: same error, same message, and the same hashing work.
    pub async fn login(
        users: &dyn UserStore,
        passwords: &PasswordService,
        jwt: &JwtService,
        email: &str,
        password: &str,
    ) -> ApiResult<AuthToken> {
        let Some(user) = users.find_by_email(email).await? else {
            passwords.verify_dummy_async(password.to_string()).await?;
            debug!(email = %email, "Login rejected: unknown email");
            return Err(ApiError::InvalidCredentials);
        };

        let valid =
            PasswordService::verify_async(password.to_string(), user.password_hash.clone()).await?;
        if !valid {
            debug!(user_id = %user.id, "Login rejected: wrong password");
            return Err(ApiError::InvalidCredentials);
        }

        let access_token = jwt.issue(user.id, &user.email)?;
        info!(user_id = %user.id, "User logged in");

        Ok(AuthToken {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt.token_expiry_secs(),
        })
    }

    /// Resolve a bearer token into the acting identity
    pub fn authenticate(jwt: &JwtService, token: &str) -> ApiResult<AuthUser> {
        let subject = jwt.validate(token)?;
        Ok(AuthUser {
            user_id: subject.user_id,
            email: subject.email,
        })
    }
}
