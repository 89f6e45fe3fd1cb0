//! Queries over the `entities` table.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::{entity, ConsoleEntity};

/// Insert a new entity for a wallet-auth subject
pub async fn insert_entity<C: ConnectionTrait>(
    db: &C,
    privy_did: &str,
) -> Result<entity::Model, DbErr> {
    let mut model = entity::ActiveModel::new();
    model.privy_did = Set(privy_did.to_string());
    model.insert(db).await
}

pub async fn find_entity_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<entity::Model>, DbErr> {
    ConsoleEntity::find_by_id(id).one(db).await
}

pub async fn find_entity_by_privy_did<C: ConnectionTrait>(
    db: &C,
    privy_did: &str,
) -> Result<Option<entity::Model>, DbErr> {
    ConsoleEntity::find()
        .filter(entity::Column::PrivyDid.eq(privy_did))
        .one(db)
        .await
}

/// Look up the entity for a wallet-auth subject, creating it on first sight.
/// Losing an insert race to another request returns the winner's row.
pub async fn find_or_create_entity_by_privy_did<C: ConnectionTrait>(
    db: &C,
    privy_did: &str,
) -> Result<entity::Model, DbErr> {
    if let Some(found) = find_entity_by_privy_did(db, privy_did).await? {
        return Ok(found);
    }

    match insert_entity(db, privy_did).await {
        Ok(created) => {
            tracing::info!("Created entity {} for {}", created.id, privy_did);
            Ok(created)
        }
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            tracing::debug!("Entity for {} was created concurrently, reloading", privy_did);
            find_entity_by_privy_did(db, privy_did).await?.ok_or(err)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::temp_database;

    #[tokio::test]
    async fn test_insert_and_find_entity() {
        let (_dir, db) = temp_database().await;

        let created = insert_entity(&db, "did:privy:alice").await.unwrap();
        assert_eq!(created.privy_did, "did:privy:alice");
        assert_eq!(created.created_at, created.updated_at);

        let found = find_entity_by_id(&db, created.id).await.unwrap();
        assert_eq!(found, Some(created));

        assert!(find_entity_by_id(&db, Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_or_create_is_stable() {
        let (_dir, db) = temp_database().await;

        let first = find_or_create_entity_by_privy_did(&db, "did:privy:bob").await.unwrap();
        let second = find_or_create_entity_by_privy_did(&db, "did:privy:bob").await.unwrap();
        assert_eq!(first.id, second.id);

        let other = find_or_create_entity_by_privy_did(&db, "did:privy:carol").await.unwrap();
        assert_ne!(first.id, other.id);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_find_or_create_yields_one_entity() {
        let (_dir, db) = temp_database().await;

        let mut handles = Vec::new();
        for _ in 0..16 {
            let db = db.clone();
            handles.push(tokio::spawn(async move {
                find_or_create_entity_by_privy_did(&db, "did:privy:race").await
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        ids.dedup();
        assert_eq!(ids.len(), 1);

        let stored = find_entity_by_privy_did(&db, "did:privy:race").await.unwrap();
        assert_eq!(stored.map(|e| e.id), Some(ids[0]));
    }

    #[tokio::test]
    async fn test_privy_did_is_unique() {
        let (_dir, db) = temp_database().await;

        insert_entity(&db, "did:privy:dave").await.unwrap();
        assert!(insert_entity(&db, "did:privy:dave").await.is_err());
    }
}
