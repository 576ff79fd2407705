//! Registers a node wallet the first time its connection details are seen.

use tracing::info;

use crate::dto::{Wallet, WalletConfiguration, WalletType};
use crate::stores::RecordStore;
use crate::utils::{now_seconds, random_hex};
use crate::Error;

/// Seals a wallet access token with a user secret before it is stored.
pub trait TokenSealer: Send + Sync {
    fn seal(&self, token: &str, secret: &str) -> String;
}

#[derive(Debug, Clone)]
pub struct ConnectRequest {
    pub configuration: WalletConfiguration,
    pub label: String,
    pub kind: WalletType,
    pub secret: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Connected {
    pub wallet: Wallet,
    /// The wallet was already stored under the same node address.
    pub existed: bool,
}

/// Returns the stored wallet connected to the same node address, or creates
/// one. The token is sealed only when both a token and a secret are given.
pub async fn auto_connect_wallet<S>(
    store: &S,
    sealer: &dyn TokenSealer,
    request: ConnectRequest,
) -> Result<Connected, Error>
where
    S: RecordStore + ?Sized,
{
    let ConnectRequest {
        mut configuration,
        label,
        kind,
        secret,
    } = request;

    let existing = store.wallets().await?.into_iter().find(|wallet| {
        wallet
            .configuration
            .as_ref()
            .is_some_and(|stored| stored.address == configuration.address)
    });
    if let Some(wallet) = existing {
        return Ok(Connected {
            wallet,
            existed: true,
        });
    }

    if let Some(secret) = secret.as_deref() {
        configuration.token = configuration
            .token
            .take()
            .map(|token| sealer.seal(&token, secret));
    }

    let now = now_seconds();
    let wallet = Wallet {
        id: random_hex(),
        label,
        kind,
        created_at: now,
        modified_at: now,
        configuration: Some(configuration),
        last_sync: None,
        syncing: false,
    };
    store.add_wallet(wallet.clone()).await?;
    info!(wallet = %wallet.id, kind = ?wallet.kind, "wallet connected");

    Ok(Connected {
        wallet,
        existed: false,
    })
}
