use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::accounts::{Registration, User};
use crate::error::{CoreError, CoreResult, FieldError};
use crate::model::{EcgId, EcgRecord, Lead, UserId};

struct Account {
    user: User,
    password_hash: String,
}

/// In-memory users, tokens and ECG records. Callers share it behind an
/// async `RwLock`.
pub struct Storage {
    accounts: HashMap<UserId, Account>,
    tokens: HashMap<String, UserId>,
    ecgs: BTreeMap<EcgId, EcgRecord>,
    next_user_id: UserId,
    next_ecg_id: EcgId,
}

impl Storage {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
            tokens: HashMap::new(),
            ecgs: BTreeMap::new(),
            next_user_id: 1,
            next_ecg_id: 1,
        }
    }

    pub fn add_user(
        &mut self,
        registration: Registration,
        password_hash: String,
        date_joined: DateTime<Utc>,
    ) -> CoreResult<User> {
        let mut errors = Vec::new();
        if self.accounts.values().any(|a| a.user.username == registration.username) {
            errors.push(FieldError::new("username", "A user with that username already exists."));
        }
        if self.accounts.values().any(|a| a.user.email == registration.email) {
            errors.push(FieldError::new("email", "user model with this email already exists."));
        }
        if !errors.is_empty() {
            return Err(CoreError::Validation(errors));
        }

        let id = self.next_user_id;
        self.next_user_id += 1;

        let user = User {
            id,
            username: registration.username,
            email: registration.email,
            first_name: registration.first_name,
            last_name: registration.last_name,
            second_last_name: registration.second_last_name,
            is_admin: registration.is_admin,
            date_joined,
        };
        self.accounts.insert(
            id,
            Account {
                user: user.clone(),
                password_hash,
            },
        );
        Ok(user)
    }

    /// Returns the user and stored password hash for a username.
    pub fn credentials(&self, username: &str) -> Option<(User, String)> {
        self.accounts
            .values()
            .find(|a| a.user.username == username)
            .map(|a| (a.user.clone(), a.password_hash.clone()))
    }

    /// Returns the user's token, issuing one on first use.
    pub fn token_for(&mut self, user_id: UserId) -> String {
        if let Some((token, _)) = self.tokens.iter().find(|(_, &id)| id == user_id) {
            return token.clone();
        }
        let token = Uuid::new_v4().simple().to_string();
        self.tokens.insert(token.clone(), user_id);
        token
    }

    pub fn user_for_token(&self, token: &str) -> Option<User> {
        self.tokens
            .get(token)
            .and_then(|id| self.accounts.get(id))
            .map(|a| a.user.clone())
    }

    pub fn add_ecg(&mut self, owner: UserId, leads: Vec<Lead>, date: DateTime<Utc>) -> EcgRecord {
        let id = self.next_ecg_id;
        self.next_ecg_id += 1;

        let record = EcgRecord {
            id,
            date,
            leads,
            owner,
        };
        self.ecgs.insert(id, record.clone());
        record
    }

    /// Looks a record up for `user`: unknown ids are not found, records of
    /// other users are denied.
    pub fn owned_ecg(&self, ecg_id: &str, user: &User) -> CoreResult<&EcgRecord> {
        let id = parse_ecg_id(ecg_id)?;
        let record = self
            .ecgs
            .get(&id)
            .ok_or_else(|| CoreError::RecordNotFound(ecg_id.to_string()))?;
        if record.owner != user.id {
            return Err(CoreError::PermissionDenied);
        }
        Ok(record)
    }

    pub fn replace_leads(&mut self, ecg_id: &str, user: &User, leads: Vec<Lead>) -> CoreResult<EcgRecord> {
        let id = self.owned_ecg(ecg_id, user)?.id;
        let record = self
            .ecgs
            .get_mut(&id)
            .ok_or_else(|| CoreError::RecordNotFound(ecg_id.to_string()))?;
        record.leads = leads;
        Ok(record.clone())
    }

    pub fn remove_ecg(&mut self, ecg_id: &str, user: &User) -> CoreResult<EcgRecord> {
        let id = self.owned_ecg(ecg_id, user)?.id;
        self.ecgs
            .remove(&id)
            .ok_or_else(|| CoreError::RecordNotFound(ecg_id.to_string()))
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_ecg_id(ecg_id: &str) -> CoreResult<EcgId> {
    ecg_id
        .trim()
        .parse::<EcgId>()
        .map_err(|_| CoreError::RecordNotFound(ecg_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LeadName;

    fn registration(username: &str, email: &str) -> Registration {
        Registration {
            username: username.to_string(),
            password: "Testpassword1!".to_string(),
            email: email.to_string(),
            first_name: "name".to_string(),
            last_name: "lastname".to_string(),
            ..Default::default()
        }
    }

    fn storage_with_users() -> (Storage, User, User) {
        let mut storage = Storage::new();
        let first = storage
            .add_user(registration("testuser", "email@email.com"), "hash".into(), Utc::now())
            .unwrap();
        let second = storage
            .add_user(registration("testuser2", "email2@email.com"), "hash".into(), Utc::now())
            .unwrap();
        (storage, first, second)
    }

    #[test]
    fn users_get_sequential_ids() {
        let (_, first, second) = storage_with_users();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(!first.is_admin);
    }

    #[test]
    fn duplicate_username_and_email_are_rejected() {
        let (mut storage, _, _) = storage_with_users();
        let err = storage
            .add_user(registration("testuser", "email2@email.com"), "hash".into(), Utc::now())
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::Validation(vec![
                FieldError::new("username", "A user with that username already exists."),
                FieldError::new("email", "user model with this email already exists."),
            ])
        );
    }

    #[test]
    fn token_is_stable_per_user() {
        let (mut storage, first, second) = storage_with_users();
        let token = storage.token_for(first.id);
        assert_eq!(storage.token_for(first.id), token);
        assert_ne!(storage.token_for(second.id), token);
        assert_eq!(storage.user_for_token(&token), Some(first));
        assert_eq!(storage.user_for_token("nope"), None);
    }

    #[test]
    fn lookup_checks_existence_before_ownership() {
        let (mut storage, first, second) = storage_with_users();
        let record = storage.add_ecg(first.id, vec![Lead::new(LeadName::I, "[1]")], Utc::now());
        let id = record.id.to_string();

        assert_eq!(storage.owned_ecg(&id, &first).unwrap(), &record);
        assert_eq!(storage.owned_ecg(&id, &second), Err(CoreError::PermissionDenied));
        assert_eq!(
            storage.owned_ecg("1345", &second),
            Err(CoreError::RecordNotFound("1345".to_string()))
        );
        assert_eq!(
            storage.owned_ecg("abc", &first),
            Err(CoreError::RecordNotFound("abc".to_string()))
        );
    }

    #[test]
    fn replace_and_remove() {
        let (mut storage, first, second) = storage_with_users();
        let record = storage.add_ecg(first.id, vec![], Utc::now());
        let id = record.id.to_string();

        assert_eq!(
            storage.replace_leads(&id, &second, vec![]),
            Err(CoreError::PermissionDenied)
        );
        let updated = storage
            .replace_leads(&id, &first, vec![Lead::new(LeadName::V6, "[2, -2]")])
            .unwrap();
        assert_eq!(updated.date, record.date);
        assert_eq!(updated.leads.len(), 1);

        assert_eq!(storage.remove_ecg(&id, &second), Err(CoreError::PermissionDenied));
        assert_eq!(storage.remove_ecg(&id, &first).unwrap().id, record.id);
        assert!(storage.ecgs.is_empty());
        assert!(matches!(storage.remove_ecg(&id, &first), Err(CoreError::RecordNotFound(_))));
    }
}
