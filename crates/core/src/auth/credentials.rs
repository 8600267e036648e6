use degreed_domain::constants::{CLIENT_ID_KEY, CLIENT_SECRET_KEY};
use degreed_domain::{Credentials, Result};

use crate::ports::SecretProvider;

/// Resolve `client_id` / `client_secret` from `provider`.
///
/// # Errors
/// `Config` when either value is missing or blank; no network is touched.
pub fn load_credentials<P: SecretProvider + ?Sized>(provider: &P) -> Result<Credentials> {
    let client_id = provider.get(CLIENT_ID_KEY)?;
    let client_secret = provider.get(CLIENT_SECRET_KEY)?;
    Credentials::new(client_id, client_secret)
}
