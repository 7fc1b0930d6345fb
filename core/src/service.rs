use std::sync::Arc;

use chrono::Utc;
use slog::{debug, info, o, warn, Logger};
use tokio::sync::RwLock;

use crate::accounts::{hash_password, validate_registration, verify_password, Credentials, Registration, User};
use crate::analysis::{analyze, ZeroCrossingResult};
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::model::{EcgRecord, Lead};
use crate::storage::Storage;

/// Token-authenticated ECG operations over a shared store.
#[derive(Clone)]
pub struct EcgService {
    storage: Arc<RwLock<Storage>>,
    config: Arc<CoreConfig>,
    logger: Logger,
}

impl EcgService {
    pub fn new(config: CoreConfig, logger: Logger) -> Self {
        Self {
            storage: Arc::new(RwLock::new(Storage::new())),
            config: Arc::new(config),
            logger: logger.new(o!("service" => "ecg")),
        }
    }

    pub async fn register(&self, registration: Registration) -> CoreResult<User> {
        let errors = validate_registration(&registration, &self.config.accounts);
        if !errors.is_empty() {
            return Err(CoreError::Validation(errors));
        }

        let password_hash = hash_password(&registration.password, self.config.accounts.password_hash_rounds);
        let user = self
            .storage
            .write()
            .await
            .add_user(registration, password_hash, Utc::now())?;

        info!(self.logger, "User registered"; "user_id" => user.id, "username" => &user.username);
        Ok(user)
    }

    /// Returns the caller's token, issuing one on the first successful login.
    pub async fn login(&self, credentials: Credentials) -> CoreResult<String> {
        let (username, password) = match (credentials.username, credentials.password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p),
            _ => return Err(CoreError::MissingCredentials),
        };

        let account = self.storage.read().await.credentials(&username);
        let user = match account {
            Some((user, hash)) if verify_password(&password, &hash) => user,
            _ => {
                warn!(self.logger, "Login rejected"; "username" => &username);
                return Err(CoreError::InvalidCredentials);
            }
        };

        let token = self.storage.write().await.token_for(user.id);
        info!(self.logger, "User logged in"; "user_id" => user.id);
        Ok(token)
    }

    pub async fn create_ecg(&self, token: &str, leads: Vec<Lead>) -> CoreResult<EcgRecord> {
        let user = self.authenticate(token).await?;
        validate_leads(&leads)?;

        let record = self.storage.write().await.add_ecg(user.id, leads, Utc::now());
        info!(self.logger, "ECG record created"; "ecg_id" => record.id, "leads" => record.leads.len(), "user_id" => user.id);
        Ok(record)
    }

    pub async fn retrieve_ecg(&self, token: &str, ecg_id: &str) -> CoreResult<EcgRecord> {
        let user = self.authenticate(token).await?;
        let storage = self.storage.read().await;
        let record = storage
            .owned_ecg(ecg_id, &user)
            .map_err(|e| self.log_denied(e, ecg_id, &user))?;
        Ok(record.clone())
    }

    /// Replaces the leads of a record, keeping its id, date and owner.
    pub async fn update_ecg(&self, token: &str, ecg_id: &str, leads: Vec<Lead>) -> CoreResult<EcgRecord> {
        let user = self.authenticate(token).await?;
        self.storage
            .read()
            .await
            .owned_ecg(ecg_id, &user)
            .map_err(|e| self.log_denied(e, ecg_id, &user))?;
        validate_leads(&leads)?;

        let record = self
            .storage
            .write()
            .await
            .replace_leads(ecg_id, &user, leads)
            .map_err(|e| self.log_denied(e, ecg_id, &user))?;
        info!(self.logger, "ECG record updated"; "ecg_id" => record.id, "leads" => record.leads.len());
        Ok(record)
    }

    pub async fn delete_ecg(&self, token: &str, ecg_id: &str) -> CoreResult<()> {
        let user = self.authenticate(token).await?;
        let record = self
            .storage
            .write()
            .await
            .remove_ecg(ecg_id, &user)
            .map_err(|e| self.log_denied(e, ecg_id, &user))?;
        info!(self.logger, "ECG record deleted"; "ecg_id" => record.id);
        Ok(())
    }

    /// Zero-crossing count per lead of a stored record, in lead order.
    pub async fn zero_crossings(&self, token: &str, ecg_id: &str) -> CoreResult<Vec<ZeroCrossingResult>> {
        let user = self.authenticate(token).await?;
        let leads = self
            .storage
            .read()
            .await
            .owned_ecg(ecg_id, &user)
            .map_err(|e| self.log_denied(e, ecg_id, &user))?
            .leads
            .clone();

        let results = analyze(&leads)?;
        debug!(self.logger, "Zero crossings computed"; "ecg_id" => ecg_id, "leads" => results.len());
        Ok(results)
    }

    async fn authenticate(&self, token: &str) -> CoreResult<User> {
        self.storage
            .read()
            .await
            .user_for_token(token)
            .ok_or(CoreError::NotAuthenticated)
    }

    fn log_denied(&self, error: CoreError, ecg_id: &str, user: &User) -> CoreError {
        if error == CoreError::PermissionDenied {
            warn!(self.logger, "ECG access denied"; "ecg_id" => ecg_id, "user_id" => user.id);
        }
        error
    }
}

fn validate_leads(leads: &[Lead]) -> CoreResult<()> {
    for lead in leads {
        lead.decode()?;
    }
    Ok(())
}
