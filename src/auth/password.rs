use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 6;

/// bcrypt hash, computed off the async reactor.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::internal(format!("Hash task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Hash error: {e}")))
}

pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::internal(format!("Verify task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Password verify error: {e}")))
}
