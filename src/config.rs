//! Configuration from the environment
//!
//! Variables may also come from a `.env` file

use std::env::var;
use std::net::SocketAddr;

use anyhow::Context;
use anyhow::Result;

use crate::password::generate;

const DEFAULT_ADDRESS: &str = "0.0.0.0:5000";

/// Tokens are valid for an hour by default
const DEFAULT_TOKEN_EXPIRES_IN: i64 = 3600;

/// Runtime configuration of the server
#[derive(Debug)]
pub struct Config {
    /// Address to listen on
    pub address: SocketAddr,

    /// Secret to sign tokens with
    pub jwt_secret: String,

    /// Token lifetime in seconds
    pub token_expires_in: i64,
}

impl Config {
    /// Read the configuration from the environment
    ///
    /// # Errors
    ///
    /// Will return `Err` when `ADDRESS`, `PORT` or `TOKEN_EXPIRES_IN` can not be parsed
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            address: address()?,
            jwt_secret: jwt_secret(),
            token_expires_in: token_expires_in()?,
        })
    }
}

/// Get the value of ENV var, or a default
///
/// Only when:
/// - It is set
/// - It is not empty
pub fn env_var_or_else<F>(var_name: &'static str, or_else: F) -> String
where
    F: FnOnce() -> String,
{
    match var(var_name) {
        Ok(value) if !value.is_empty() => value,
        _ => or_else(),
    }
}

/// Secret for signing tokens, a temporary one when not configured
pub fn jwt_secret() -> String {
    env_var_or_else("JWT_SECRET", || {
        let jwt_secret = generate();
        tracing::info!("`JWT_SECRET` is not set, generating temporary one: {jwt_secret}");
        jwt_secret
    })
}

fn address() -> Result<SocketAddr> {
    let mut address = env_var_or_else("ADDRESS", || DEFAULT_ADDRESS.to_string())
        .parse::<SocketAddr>()
        .context("Invalid `ADDRESS`")?;

    // optional override of just the port
    let port = env_var_or_else("PORT", String::new);

    if !port.is_empty() {
        address.set_port(port.parse::<u16>().context("Invalid `PORT`")?);
    }

    Ok(address)
}

fn token_expires_in() -> Result<i64> {
    let token_expires_in = env_var_or_else("TOKEN_EXPIRES_IN", String::new);

    if token_expires_in.is_empty() {
        return Ok(DEFAULT_TOKEN_EXPIRES_IN);
    }

    match token_expires_in.parse::<i64>() {
        Ok(seconds) if seconds > 0 => Ok(seconds),
        _ => anyhow::bail!("`TOKEN_EXPIRES_IN` must be a positive number of seconds"),
    }
}
