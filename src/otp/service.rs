use super::{code, normalize_email, store_key, valid_email, OtpError};
use crate::{
    credentials::CredentialStore,
    mail::Notifier,
    store::{ConsumeOutcome, OtpStore},
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

const DEFAULT_TTL_SECONDS: u64 = 5 * 60;

#[derive(Clone, Copy, Debug)]
pub struct OtpConfig {
    ttl_seconds: u64,
}

impl OtpConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_ttl_seconds(mut self, seconds: u64) -> Self {
        self.ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    /// Validity window shown to the user, in whole minutes.
    #[must_use]
    pub fn validity_minutes(&self) -> u64 {
        self.ttl_seconds / 60
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Liveness of the service's backing stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OtpHealth {
    pub store: bool,
    pub credentials: bool,
}

impl OtpHealth {
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        self.store && self.credentials
    }
}

pub struct OtpService {
    store: Arc<dyn OtpStore>,
    credentials: Arc<dyn CredentialStore>,
    notifier: Arc<dyn Notifier>,
    config: OtpConfig,
}

impl std::fmt::Debug for OtpService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OtpService {
    #[must_use]
    pub fn new(
        store: Arc<dyn OtpStore>,
        credentials: Arc<dyn CredentialStore>,
        notifier: Arc<dyn Notifier>,
        config: OtpConfig,
    ) -> Self {
        Self {
            store,
            credentials,
            notifier,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &OtpConfig {
        &self.config
    }

    /// Issue a fresh passcode for `recipient` and deliver it.
    ///
    /// Any pending passcode for the same email is replaced. The code is stored
    /// before delivery is attempted and is not rolled back if delivery fails.
    ///
    /// # Errors
    /// `InvalidEmail`/`MissingSecret` for bad input, `StorageUnavailable` if the
    /// store or credential gate fails, `Delivery` if the notifier fails.
    #[instrument(skip(self, secret))]
    pub async fn issue(&self, recipient: &str, secret: &str) -> Result<(), OtpError> {
        let email = checked_email(recipient)?;
        if secret.trim().is_empty() {
            return Err(OtpError::MissingSecret);
        }

        let code = code::generate();
        let key = store_key(&email);

        self.store
            .set(&key, &code, self.config.ttl())
            .await
            .map_err(|err| {
                error!("Failed to store OTP: {err:#}");
                OtpError::StorageUnavailable(err)
            })?;

        self.credentials
            .upsert(&email, secret)
            .await
            .map_err(|err| {
                error!("Failed to upsert credential: {err:#}");
                OtpError::StorageUnavailable(err)
            })?;

        // Local parts are case-sensitive for delivery; only the key is normalized.
        self.notifier
            .send(recipient.trim(), &code, self.config.validity_minutes())
            .await
            .map_err(|err| {
                // The stored code stays valid; the caller may retry issuance.
                error!("Failed to send OTP email: {err:#}");
                OtpError::Delivery(err)
            })?;

        info!("OTP issued");

        Ok(())
    }

    /// Validate and consume the passcode for `email`.
    ///
    /// The credential gate runs first regardless of passcode state. A wrong code
    /// does not consume the pending record.
    ///
    /// # Errors
    /// `InvalidCredential`, `OtpNotFound`, or `InvalidOtp` for client-side
    /// failures; `StorageUnavailable` if a backing store fails.
    #[instrument(skip(self, code, secret))]
    pub async fn validate(&self, email: &str, code: &str, secret: &str) -> Result<(), OtpError> {
        let email = checked_email(email)?;

        let allowed = self
            .credentials
            .matches(&email, secret)
            .await
            .map_err(|err| {
                error!("Failed to check credential: {err:#}");
                OtpError::StorageUnavailable(err)
            })?;
        if !allowed {
            debug!("credential gate rejected request");
            return Err(OtpError::InvalidCredential);
        }

        let key = store_key(&email);

        if !code::is_well_formed(code) {
            // Cannot match any issued code; only tell apart "nothing pending" from "wrong code".
            let pending = self.store.get(&key).await.map_err(|err| {
                error!("Failed to read OTP: {err:#}");
                OtpError::StorageUnavailable(err)
            })?;
            return Err(match pending {
                Some(_) => OtpError::InvalidOtp,
                None => OtpError::OtpNotFound,
            });
        }

        let outcome = self
            .store
            .compare_and_delete(&key, code)
            .await
            .map_err(|err| {
                error!("Failed to consume OTP: {err:#}");
                OtpError::StorageUnavailable(err)
            })?;

        match outcome {
            ConsumeOutcome::Consumed => {
                info!("OTP validated");
                Ok(())
            }
            ConsumeOutcome::Mismatch => {
                warn!("OTP mismatch");
                Err(OtpError::InvalidOtp)
            }
            ConsumeOutcome::Missing => Err(OtpError::OtpNotFound),
        }
    }

    /// Probe the backing stores.
    pub async fn health(&self) -> OtpHealth {
        let store = match self.store.ping().await {
            Ok(()) => true,
            Err(err) => {
                error!("OTP store is unhealthy: {err:#}");
                false
            }
        };

        let credentials = match self.credentials.ping().await {
            Ok(()) => true,
            Err(err) => {
                error!("Credential store is unhealthy: {err:#}");
                false
            }
        };

        OtpHealth { store, credentials }
    }
}

fn checked_email(email: &str) -> Result<String, OtpError> {
    let email = normalize_email(email);
    if valid_email(&email) {
        Ok(email)
    } else {
        Err(OtpError::InvalidEmail)
    }
}
