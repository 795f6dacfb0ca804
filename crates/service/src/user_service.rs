use std::sync::Arc;

use models::path_id::PathId;
use models::user::{body_id, next_id, Collection, Fields, User, UserChanges};
use tracing::debug;

use crate::errors::ServiceError;
use crate::storage::UserStore;

pub const USER_NOT_FOUND: &str = "User not found";
pub const NO_UPDATE_DATA: &str = "No data sent for updation";

/// CRUD over the user collection.
///
/// Every call loads the full collection from the store; mutating calls save
/// the full collection back. No lock is held between the two, so concurrent
/// writers overwrite each other.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// All users in stored order.
    pub async fn list(&self) -> Result<Collection, ServiceError> {
        self.store.load().await
    }

    /// First user whose id equals `id`.
    pub async fn get(&self, id: PathId) -> Result<User, ServiceError> {
        let users = self.store.load().await?;
        users
            .into_iter()
            .find(|u| id.matches(u.id))
            .ok_or_else(|| ServiceError::not_found("User"))
    }

    /// Overwrite the five mutable fields of the matching user.
    ///
    /// A missing body is rejected before the collection is loaded.
    pub async fn update(&self, id: PathId, body: Option<Fields>) -> Result<User, ServiceError> {
        let body = body.ok_or_else(|| ServiceError::BadRequest(NO_UPDATE_DATA.into()))?;
        let changes = UserChanges::from_fields(&body);

        let mut users = self.store.load().await?;
        let user = users
            .iter_mut()
            .find(|u| id.matches(u.id))
            .ok_or_else(|| ServiceError::not_found("User"))?;
        user.apply(changes);
        let updated = user.clone();

        self.store.save(&users).await?;
        debug!(id = updated.id, "user updated");
        Ok(updated)
    }

    /// Remove the first matching user and return it.
    pub async fn delete(&self, id: PathId) -> Result<User, ServiceError> {
        let mut users = self.store.load().await?;
        let index = users
            .iter()
            .position(|u| id.matches(u.id))
            .ok_or_else(|| ServiceError::not_found("User"))?;
        let removed = users.remove(index);

        self.store.save(&users).await?;
        debug!(id = removed.id, remaining = users.len(), "user deleted");
        Ok(removed)
    }

    /// Append a user built from every body field, with the next id.
    ///
    /// No fields are required; a missing body creates a record holding only its
    /// id. An integer `id` in the body is used as given, even if it repeats one.
    pub async fn create(&self, body: Option<Fields>) -> Result<User, ServiceError> {
        let mut users = self.store.load().await?;
        let fields = body.unwrap_or_default();
        let id = match body_id(&fields) {
            Some(id) => id,
            None => next_id(&users)
                .ok_or_else(|| ServiceError::storage("assign id", "last stored id is already i64::MAX"))?,
        };
        let user = User::from_fields(id, fields);
        users.push(user.clone());

        self.store.save(&users).await?;
        debug!(id = user.id, total = users.len(), "user created");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryUserStore;
    use serde_json::{json, Value};

    fn fields(v: Value) -> Fields {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    fn seeded(ids: &[i64]) -> (MemoryUserStore, UserService) {
        let users = ids
            .iter()
            .map(|&id| {
                User::from_fields(
                    id,
                    fields(json!({
                        "first_name": format!("First{id}"),
                        "last_name": format!("Last{id}"),
                        "email": format!("user{id}@example.com"),
                        "gender": "Female",
                        "job_title": "Engineer",
                        "ip_address": "10.0.0.1"
                    })),
                )
            })
            .collect();
        let store = MemoryUserStore::new(users);
        let service = UserService::new(Arc::new(store.clone()));
        (store, service)
    }

    #[tokio::test]
    async fn list_returns_all_users_in_order() -> Result<(), anyhow::Error> {
        let (_, service) = seeded(&[3, 1, 2]);
        let ids: Vec<i64> = service.list().await?.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        Ok(())
    }

    #[tokio::test]
    async fn get_finds_exact_record_or_not_found() -> Result<(), anyhow::Error> {
        let (store, service) = seeded(&[1, 2, 3]);
        let user = service.get(PathId::parse("2")).await?;
        assert_eq!(user, store.snapshot().await[1]);

        assert!(matches!(service.get(PathId::parse("999999")).await, Err(ServiceError::NotFound(m)) if m == USER_NOT_FOUND));
        assert!(matches!(service.get(PathId::parse("abc")).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn create_uses_last_element_plus_one() -> Result<(), anyhow::Error> {
        let (store, service) = seeded(&[1, 2, 5]);
        let created = service.create(Some(fields(json!({"first_name": "A"})))).await?;
        assert_eq!(created.id, 6);

        let users = store.snapshot().await;
        assert_eq!(users.len(), 4);
        assert_eq!(users.last(), Some(&created));
        assert_eq!(created.first_name, Some(json!("A")));
        Ok(())
    }

    #[tokio::test]
    async fn create_follows_position_not_max_id() -> Result<(), anyhow::Error> {
        let (store, service) = seeded(&[7, 3]);
        let created = service.create(Some(fields(json!({"first_name": "B"})))).await?;
        assert_eq!(created.id, 4);
        assert_eq!(store.snapshot().await.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn create_on_empty_collection_starts_at_one() -> Result<(), anyhow::Error> {
        let (store, service) = seeded(&[]);
        let created = service.create(None).await?;
        assert_eq!(created.id, 1);
        assert_eq!(store.snapshot().await, vec![User::from_fields(1, Fields::new())]);
        Ok(())
    }

    #[tokio::test]
    async fn create_after_the_largest_id_is_a_storage_error() -> Result<(), anyhow::Error> {
        let (store, service) = seeded(&[i64::MAX]);
        assert!(matches!(service.create(None).await, Err(ServiceError::Storage(_))));
        assert_eq!(store.snapshot().await.len(), 1);

        // an explicit id still goes through
        let created = service.create(Some(fields(json!({"id": 1, "first_name": "A"})))).await?;
        assert_eq!(created.id, 1);
        Ok(())
    }

    #[tokio::test]
    async fn create_uses_an_integer_body_id() -> Result<(), anyhow::Error> {
        let (store, service) = seeded(&[1, 2]);
        let created = service.create(Some(fields(json!({"id": 40, "first_name": "A"})))).await?;
        assert_eq!(created.id, 40);
        assert_eq!(store.snapshot().await.last().map(|u| u.id), Some(40));

        let created = service.create(Some(fields(json!({"id": "x"})))).await?;
        assert_eq!(created.id, 41);
        assert!(created.extra.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn update_keeps_json_types_and_explicit_nulls() -> Result<(), anyhow::Error> {
        let (store, service) = seeded(&[1]);
        service
            .update(PathId::parse("1"), Some(fields(json!({"first_name": 7, "email": null}))))
            .await?;
        let users = store.snapshot().await;
        let user = &users[0];
        assert_eq!(user.first_name, Some(json!(7)));
        assert_eq!(user.email, Some(Value::Null));
        assert_eq!(user.last_name, None);
        Ok(())
    }

    #[tokio::test]
    async fn update_overwrites_five_fields_only() -> Result<(), anyhow::Error> {
        let (store, service) = seeded(&[1, 2]);
        let body = fields(json!({
            "id": 42,
            "first_name": "New",
            "last_name": "Name",
            "email": "new@example.com",
            "gender": "Male",
            "job_title": "Manager",
            "ip_address": "ignored"
        }));
        let updated = service.update(PathId::parse("2"), Some(body)).await?;

        let users = store.snapshot().await;
        assert_eq!(users[1], updated);
        assert_eq!(updated.id, 2);
        assert_eq!(updated.first_name, Some(json!("New")));
        assert_eq!(updated.last_name, Some(json!("Name")));
        assert_eq!(updated.email, Some(json!("new@example.com")));
        assert_eq!(updated.gender, Some(json!("Male")));
        assert_eq!(updated.job_title, Some(json!("Manager")));
        assert_eq!(updated.extra.get("ip_address"), Some(&json!("10.0.0.1")));
        assert_eq!(users[0].first_name, Some(json!("First1")));
        Ok(())
    }

    #[tokio::test]
    async fn update_with_partial_body_clears_missing_fields() -> Result<(), anyhow::Error> {
        let (_, service) = seeded(&[1]);
        let updated = service.update(PathId::parse("1"), Some(fields(json!({"email": "x@y.z"})))).await?;
        assert_eq!(updated.email, Some(json!("x@y.z")));
        assert_eq!(updated.first_name, None);
        assert_eq!(updated.job_title, None);
        Ok(())
    }

    #[tokio::test]
    async fn update_without_body_is_rejected_before_loading() -> Result<(), anyhow::Error> {
        let (store, service) = seeded(&[1]);
        let before = store.snapshot().await;
        store.set_failing(true);
        assert!(matches!(service.update(PathId::parse("1"), None).await, Err(ServiceError::BadRequest(m)) if m == NO_UPDATE_DATA));
        store.set_failing(false);
        assert_eq!(store.snapshot().await, before);
        Ok(())
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let (_, service) = seeded(&[1]);
        let res = service.update(PathId::parse("2"), Some(Fields::new())).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_record() -> Result<(), anyhow::Error> {
        let (store, service) = seeded(&[1, 2, 3]);
        let removed = service.delete(PathId::parse("2")).await?;
        assert_eq!(removed.id, 2);

        let ids: Vec<i64> = store.snapshot().await.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(matches!(service.delete(PathId::parse("2")).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn delete_only_takes_the_first_duplicate() -> Result<(), anyhow::Error> {
        let (store, service) = seeded(&[4, 4]);
        service.delete(PathId::parse("4")).await?;
        assert_eq!(store.snapshot().await.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn storage_failures_surface_as_storage_errors() {
        let (store, service) = seeded(&[1]);
        store.set_failing(true);
        assert!(matches!(service.list().await, Err(ServiceError::Storage(_))));
        assert!(matches!(service.get(PathId::parse("1")).await, Err(ServiceError::Storage(_))));
        assert!(matches!(service.create(None).await, Err(ServiceError::Storage(_))));
        assert!(matches!(service.delete(PathId::parse("1")).await, Err(ServiceError::Storage(_))));
        assert!(matches!(
            service.update(PathId::parse("1"), Some(Fields::new())).await,
            Err(ServiceError::Storage(_))
        ));
    }
}
