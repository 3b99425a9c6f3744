//! Reqwest-backed resident and pet repositories over the REST endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use super::client::SupabaseClient;
use super::dto::{NewPetRowDto, NewResidentRowDto, PetRowDto, ResidentRowDto};
use super::error_mapping::{RestFailure, map_rest_status, map_rest_transport_error};
use crate::domain::ports::{
    PetRepository, PetRepositoryError, ResidentRepository, ResidentRepositoryError,
};
use crate::domain::{NewPet, Pet, PetScope, Resident, ResidentDraft, SessionId};

const RESIDENTS_PATH: &str = "rest/v1/residents";
const PETS_PATH: &str = "rest/v1/pets";
const NEWEST_FIRST: &str = "created_at.desc";

/// Resident and pet tables behind the shared client.
pub struct SupabaseRegistry {
    client: Arc<SupabaseClient>,
}

impl SupabaseRegistry {
    /// Wrap a shared client.
    pub fn new(client: Arc<SupabaseClient>) -> Self {
        Self { client }
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, RestFailure> {
        let mut url = self
            .client
            .url(path)
            .map_err(|error| RestFailure::Query(format!("invalid URL for {path}: {error}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Vec<T>, RestFailure> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_rest_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_rest_transport_error)?;
        if !status.is_success() {
            return Err(map_rest_status(status, body.as_ref()));
        }
        serde_json::from_slice(body.as_ref())
            .map_err(|error| RestFailure::Decode(format!("invalid row payload: {error}")))
    }

    async fn insert_row<B, T>(&self, path: &str, row: &B) -> Result<T, RestFailure>
    where
        B: serde::Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path, &[])?;
        let request = self
            .client
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(row);
        self.fetch_rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RestFailure::Decode(format!("insert into {path} returned no row")))
    }
}

fn resident_lookup_query(user_id: &SessionId) -> Vec<(&'static str, String)> {
    vec![
        ("select", "*".to_owned()),
        ("user_id", format!("eq.{user_id}")),
        ("limit", "1".to_owned()),
    ]
}

fn pet_list_query(scope: &PetScope) -> Vec<(&'static str, String)> {
    match scope {
        PetScope::All => vec![
            ("select", "*".to_owned()),
            ("order", NEWEST_FIRST.to_owned()),
        ],
        PetScope::OwnedBy(user_id) => vec![
            ("select", "*,residents!inner(user_id)".to_owned()),
            ("residents.user_id", format!("eq.{user_id}")),
            ("order", NEWEST_FIRST.to_owned()),
        ],
    }
}

#[async_trait]
impl ResidentRepository for SupabaseRegistry {
    async fn insert(
        &self,
        user_id: &SessionId,
        draft: &ResidentDraft,
    ) -> Result<Resident, ResidentRepositoryError> {
        let row: ResidentRowDto = self
            .insert_row(RESIDENTS_PATH, &NewResidentRowDto::new(user_id, draft))
            .await?;
        row.into_domain().map_err(ResidentRepositoryError::decode)
    }

    async fn find_by_user(
        &self,
        user_id: &SessionId,
    ) -> Result<Option<Resident>, ResidentRepositoryError> {
        let url = self.url(RESIDENTS_PATH, &resident_lookup_query(user_id))?;
        let rows: Vec<ResidentRowDto> = self
            .fetch_rows(self.client.request(Method::GET, url))
            .await?;
        rows.into_iter()
            .next()
            .map(ResidentRowDto::into_domain)
            .transpose()
            .map_err(ResidentRepositoryError::decode)
    }
}

#[async_trait]
impl PetRepository for SupabaseRegistry {
    async fn insert(&self, pet: &NewPet) -> Result<Pet, PetRepositoryError> {
        let row: PetRowDto = self
            .insert_row(PETS_PATH, &NewPetRowDto::from(pet))
            .await?;
        row.into_domain().map_err(PetRepositoryError::decode)
    }

    async fn list(&self, scope: &PetScope) -> Result<Vec<Pet>, PetRepositoryError> {
        let url = self.url(PETS_PATH, &pet_list_query(scope))?;
        let rows: Vec<PetRowDto> = self
            .fetch_rows(self.client.request(Method::GET, url))
            .await?;
        rows.into_iter()
            .map(PetRowDto::into_domain)
            .collect::<Result<Vec<_>, _>>()
            .map_err(PetRepositoryError::decode)
    }
}

#[cfg(test)]
mod tests {
    //! URL construction coverage; nothing here touches the network.

    use std::time::Duration;

    use super::*;
    use rstest::rstest;

    fn registry() -> SupabaseRegistry {
        let endpoint = Url::parse("https://demo.supabase.co").expect("endpoint");
        let client =
            SupabaseClient::new(endpoint, "anon", Duration::from_secs(5)).expect("client");
        SupabaseRegistry::new(Arc::new(client))
    }

    fn user(id: &str) -> SessionId {
        SessionId::new(id).expect("user id")
    }

    #[rstest]
    fn resident_lookup_filters_by_owner() {
        let url = registry()
            .url(RESIDENTS_PATH, &resident_lookup_query(&user("u1")))
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://demo.supabase.co/rest/v1/residents?select=*&user_id=eq.u1&limit=1"
        );
    }

    #[rstest]
    fn gallery_listing_orders_newest_first() {
        let url = registry()
            .url(PETS_PATH, &pet_list_query(&PetScope::All))
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://demo.supabase.co/rest/v1/pets?select=*&order=created_at.desc"
        );
    }

    #[rstest]
    fn owned_listing_joins_residents() {
        let query = pet_list_query(&PetScope::OwnedBy(user("u1")));
        let url = registry().url(PETS_PATH, &query).expect("url");

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("select".to_owned(), "*,residents!inner(user_id)".to_owned()),
                ("residents.user_id".to_owned(), "eq.u1".to_owned()),
                ("order".to_owned(), "created_at.desc".to_owned()),
            ]
        );
    }

    #[rstest]
    fn identifiers_are_percent_encoded() {
        let url = registry()
            .url(RESIDENTS_PATH, &resident_lookup_query(&user("a&b")))
            .expect("url");
        assert!(url.as_str().contains("user_id=eq.a%26b"));
    }
}
