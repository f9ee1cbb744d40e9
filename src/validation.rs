use crate::auth::password::MIN_PASSWORD_LEN;
use crate::error::AppError;

/// Trimmed value of a required text field.
pub fn required(value: Option<&str>, message: &str) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::validation(message)),
    }
}

/// Trims and drops empty strings so blank form inputs are stored as NULL.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Edit-form variant of [`optional`]: an absent field is left alone, a blank
/// one clears the stored value.
pub fn clearable(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| optional(Some(v)))
}

/// Lower-cased, trimmed email with a basic shape check.
pub fn email(value: &str) -> Result<String, AppError> {
    let normalized = value.trim().to_lowercase();
    let valid = match normalized.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !normalized.contains(char::is_whitespace)
                && !domain.contains('@')
        }
        None => false,
    };
    if valid {
        Ok(normalized)
    } else {
        Err(AppError::validation("El email no es válido"))
    }
}

pub fn password(value: &str) -> Result<(), AppError> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "La contraseña debe tener al menos {MIN_PASSWORD_LEN} caracteres"
        )));
    }
    Ok(())
}

pub fn non_negative(value: f64, message: &str) -> Result<(), AppError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AppError::validation(message))
    }
}
