//! Contact lists.

use crate::cache::MarketplaceCache;
use crate::dto::AddContactRequest;
use crate::failure::or_domain_failure;
use chrono::Utc;
use mercato_core::{Contact, DomainFailure, MercatoError, MercatoResult, UserId, ValidateExt};
use mercato_repository::ContactRepository;
use std::sync::Arc;
use tracing::{debug, info};

/// Cached contact lists.
pub struct ContactService {
    contacts: Arc<dyn ContactRepository>,
    cache: Arc<MarketplaceCache>,
}

impl ContactService {
    pub fn new(contacts: Arc<dyn ContactRepository>, cache: Arc<MarketplaceCache>) -> Self {
        Self { contacts, cache }
    }

    /// Lists a user's contacts.
    pub async fn list_contacts(&self, owner_id: UserId, bypass: bool) -> MercatoResult<Vec<Contact>> {
        debug!("Listing contacts of {}", owner_id);

        self.cache
            .contacts
            .get_or_load(&owner_id, bypass, || self.contacts.list_contacts(owner_id))
            .await
    }

    /// Adds a contact to a user's list.
    pub async fn add_contact(&self, owner_id: UserId, request: AddContactRequest) -> MercatoResult<Contact> {
        request.validate_request()?;

        if owner_id == request.contact_id {
            return Err(MercatoError::invalid_field(
                "contact_id",
                "Cannot add yourself as a contact",
            ));
        }

        let contact = Contact {
            owner_id,
            contact_id: request.contact_id,
            note: request.note,
            added_at: Utc::now(),
        };
        let added = self
            .contacts
            .add_contact(&contact)
            .await
            .map_err(|e| or_domain_failure(e, DomainFailure::AddContactFailed))?;

        self.cache.contacts.invalidate(&owner_id).await;

        info!("Contact {} added for {}", added.contact_id, owner_id);
        Ok(added)
    }
}

impl std::fmt::Debug for ContactService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactService").finish_non_exhaustive()
    }
}
