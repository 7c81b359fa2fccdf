//! Client-side form validation.
//!
//! These checks run before any request is issued; a failure never reaches the
//! network.

use crate::{NewUser, Timestamp, UserRole, ValidationError};
use chrono::NaiveDate;

/// Raw values of the "add user" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSignup {
    pub name: String,
    pub email: String,
    pub confirm_email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Option<String>,
    pub phone: Option<String>,
}

impl UserSignup {
    /// Validate the form and produce the create payload.
    pub fn validate(&self) -> Result<NewUser, ValidationError> {
        let name = required("name", &self.name)?;
        let email = required("email", &self.email)?;
        if !looks_like_email(email) {
            return Err(ValidationError::InvalidValue {
                field: "email".to_string(),
                reason: "must contain a single '@' and a domain".to_string(),
            });
        }
        if !self.confirm_email.trim().is_empty() && self.confirm_email.trim() != email {
            return Err(ValidationError::EmailMismatch);
        }
        let password = required("password", &self.password)?;
        if password.len() < 6 {
            return Err(ValidationError::InvalidValue {
                field: "password".to_string(),
                reason: "must be at least 6 characters".to_string(),
            });
        }
        if self.confirm_password != self.password {
            return Err(ValidationError::PasswordMismatch);
        }
        let role = match self.role.as_deref().map(str::trim) {
            None | Some("") => UserRole::default(),
            Some(raw) => raw
                .parse::<UserRole>()
                .map_err(|e| ValidationError::InvalidValue {
                    field: "role".to_string(),
                    reason: e.to_string(),
                })?,
        };

        Ok(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
            role,
            phone: self
                .phone
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        })
    }
}

/// Trimmed non-empty value or a `RequiredFieldMissing` error.
pub fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::RequiredFieldMissing {
            field: field.to_string(),
        });
    }
    Ok(trimmed)
}

/// Parse a non-negative decimal amount such as a price.
pub fn parse_amount(field: &str, value: &str) -> Result<f64, ValidationError> {
    let raw = required(field, value)?;
    let amount = raw
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidValue {
            field: field.to_string(),
            reason: format!("'{}' is not a number", raw),
        })?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            reason: "must be a non-negative number".to_string(),
        });
    }
    Ok(amount)
}

/// Parse a non-negative whole quantity.
pub fn parse_quantity(field: &str, value: &str) -> Result<i64, ValidationError> {
    let raw = required(field, value)?;
    match raw.parse::<i64>() {
        Ok(n) if n >= 0 => Ok(n),
        _ => Err(ValidationError::InvalidValue {
            field: field.to_string(),
            reason: format!("'{}' is not a whole number >= 0", raw),
        }),
    }
}

/// Parse an optional `YYYY-MM-DD` date as midnight UTC. Blank means absent.
pub fn parse_date(field: &str, value: &str) -> Result<Option<Timestamp>, ValidationError> {
    let raw = value.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidValue {
            field: field.to_string(),
            reason: format!("'{}' is not a YYYY-MM-DD date", raw),
        }
    })?;
    Ok(date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()))
}

fn looks_like_email(value: &str) -> bool {
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup() -> UserSignup {
        UserSignup {
            name: "Jane".to_string(),
            email: "jane@garage.test".to_string(),
            confirm_email: "jane@garage.test".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
            role: Some("mechanic".to_string()),
            phone: Some("  ".to_string()),
        }
    }

    #[test]
    fn valid_signup_produces_payload() {
        let user = signup().validate().unwrap();
        assert_eq!(user.role, UserRole::Mechanic);
        assert!(user.phone.is_none());
    }

    #[test]
    fn password_confirmation_must_match() {
        let mut form = signup();
        form.confirm_password = "secret2".to_string();
        assert_eq!(form.validate(), Err(ValidationError::PasswordMismatch));
    }

    #[test]
    fn email_confirmation_must_match() {
        let mut form = signup();
        form.confirm_email = "other@garage.test".to_string();
        assert_eq!(form.validate(), Err(ValidationError::EmailMismatch));
    }

    #[test]
    fn malformed_email_rejected() {
        let mut form = signup();
        form.email = "jane.garage.test".to_string();
        form.confirm_email.clear();
        assert!(matches!(
            form.validate(),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn parse_amount_rejects_negative_and_text() {
        assert_eq!(parse_amount("price", " 25 "), Ok(25.0));
        assert!(parse_amount("price", "-1").is_err());
        assert!(parse_amount("price", "abc").is_err());
        assert_eq!(
            parse_amount("price", ""),
            Err(ValidationError::RequiredFieldMissing {
                field: "price".to_string()
            })
        );
    }

    #[test]
    fn quantities_and_dates() {
        assert_eq!(parse_quantity("quantity", " 12 ").unwrap(), 12);
        assert!(parse_quantity("quantity", "-1").is_err());
        assert!(parse_quantity("quantity", "1.5").is_err());
        assert_eq!(parse_date("date", "").unwrap(), None);
        let date = parse_date("date", "2024-03-05").unwrap().unwrap();
        assert_eq!(date.format("%d %b %Y").to_string(), "05 Mar 2024");
        assert!(parse_date("date", "05/03/2024").is_err());
    }
}
