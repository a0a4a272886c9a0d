use crate::api::auth::{LoginRequest, RegisterRequest};
use crate::error::{DashError, DashResult};

pub const MAX_SYMBOL_LEN: usize = 10;
pub const MIN_PASSWORD_LEN: usize = 6;

/// Trims and upper-cases a ticker symbol, rejecting anything a backend
/// symbol could not contain.
pub fn validate_ticker_symbol(input: &str) -> DashResult<String> {
    let symbol = input.trim().to_ascii_uppercase();
    if symbol.is_empty() {
        return Err(DashError::Validation("Please enter a ticker symbol.".to_owned()));
    }
    if symbol.len() > MAX_SYMBOL_LEN {
        return Err(DashError::Validation(format!(
            "Ticker symbols are at most {MAX_SYMBOL_LEN} characters."
        )));
    }
    if !symbol
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '^' | '='))
    {
        return Err(DashError::Validation(format!(
            "`{symbol}` is not a valid ticker symbol."
        )));
    }
    Ok(symbol)
}

pub fn validate_login(username: &str, password: &str) -> DashResult<LoginRequest> {
    let username = username.trim();
    if username.is_empty() {
        return Err(DashError::Validation("Username is required.".to_owned()));
    }
    if password.is_empty() {
        return Err(DashError::Validation("Password is required.".to_owned()));
    }
    Ok(LoginRequest {
        username: username.to_owned(),
        password: password.to_owned(),
    })
}

pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
) -> DashResult<RegisterRequest> {
    let login = validate_login(username, password)?;
    let email = email.trim();
    if !looks_like_email(email) {
        return Err(DashError::Validation(
            "Please enter a valid email address.".to_owned(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DashError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters."
        )));
    }
    Ok(RegisterRequest {
        username: login.username,
        email: email.to_owned(),
        password: login.password,
    })
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !email.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::looks_like_email;

    #[test]
    fn email_shape() {
        assert!(looks_like_email("a@b.co"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.co"));
        assert!(!looks_like_email("a@@b.co"));
        assert!(!looks_like_email("a b@c.de"));
    }
}
