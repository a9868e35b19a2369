use cellar_api::{
    db,
    models::bottle::{BottlePatch, NewBottle},
    services::bottle_service::{BottleError, BottleService},
};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;

async fn service() -> BottleService {
    // One connection: every `sqlite::memory:` connection is its own database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db::run_migrations(&pool).await.unwrap();
    BottleService::new(Arc::new(pool))
}

fn named(product: &str) -> NewBottle {
    NewBottle {
        product: Some(product.into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn create_without_product_persists_nothing() {
    let svc = service().await;

    let err = svc
        .create(
            "alice",
            NewBottle {
                vintage: Some(2015),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, BottleError::Validation(_)));
    assert!(svc.list("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn create_assigns_owner_id_and_timestamp() {
    let svc = service().await;

    let bottle = svc.create("alice", named("Barolo 2015")).await.unwrap();

    assert_eq!(bottle.product, "Barolo 2015");
    assert_eq!(bottle.owner_id, "alice");
    assert_eq!(bottle.count, None);
    assert_eq!(svc.list("alice").await.unwrap(), vec![bottle]);
}

#[tokio::test]
async fn create_keeps_every_supplied_field() {
    let svc = service().await;

    let bottle = svc
        .create(
            "alice",
            NewBottle {
                product: Some("Chablis".into()),
                vintage: Some(2019),
                varietal: Some("Chardonnay".into()),
                count: Some(6),
                price: Some(32.0),
                cost_per_bottle: Some(28.5),
                total_cost: Some(171.0),
                size: Some("750ml".into()),
                country_code: Some("FR".into()),
                status: Some("in-cellar".into()),
            },
        )
        .await
        .unwrap();

    assert_eq!(bottle.vintage, Some(2019));
    assert_eq!(bottle.varietal.as_deref(), Some("Chardonnay"));
    assert_eq!(bottle.cost_per_bottle, Some(28.5));
    assert_eq!(bottle.size.as_deref(), Some("750ml"));
    assert_eq!(bottle.country_code.as_deref(), Some("FR"));
}

#[tokio::test]
async fn list_is_scoped_to_owner_and_newest_first() {
    let svc = service().await;

    let first = svc.create("alice", named("t1")).await.unwrap();
    let second = svc.create("alice", named("t2")).await.unwrap();
    svc.create("bob", named("not yours")).await.unwrap();
    let third = svc.create("alice", named("t3")).await.unwrap();

    let ids: Vec<_> = svc.list("alice").await.unwrap().into_iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);

    let bob = svc.list("bob").await.unwrap();
    assert_eq!(bob.len(), 1);
    assert_eq!(bob[0].product, "not yours");
}

#[tokio::test]
async fn list_for_unknown_owner_is_empty() {
    let svc = service().await;
    assert!(svc.list("nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn partial_update_only_touches_supplied_fields() {
    let svc = service().await;
    let bottle = svc
        .create(
            "alice",
            NewBottle {
                product: Some("Rioja".into()),
                count: Some(12),
                price: Some(20.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let patch = BottlePatch {
        price: Some(Some(25.0)),
        ..Default::default()
    };
    let updated = svc.update(&bottle.id.to_string(), "alice", patch).await.unwrap();

    assert_eq!(updated.count, Some(12));
    assert_eq!(updated.price, Some(25.0));
    assert_eq!(updated.product, "Rioja");
    assert_eq!(updated.created_at, bottle.created_at);
}

#[tokio::test]
async fn update_writes_zero_and_clears_null() {
    let svc = service().await;
    let bottle = svc
        .create(
            "alice",
            NewBottle {
                product: Some("Barolo".into()),
                varietal: Some("Nebbiolo".into()),
                count: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let patch = BottlePatch {
        count: Some(Some(0)),
        varietal: Some(None),
        ..Default::default()
    };
    let updated = svc.update(&bottle.id.to_string(), "alice", patch).await.unwrap();

    assert_eq!(updated.count, Some(0));
    assert_eq!(updated.varietal, None);
}

#[tokio::test]
async fn empty_patch_returns_stored_record() {
    let svc = service().await;
    let bottle = svc.create("alice", named("Barolo")).await.unwrap();

    let same = svc
        .update(&bottle.id.to_string(), "alice", BottlePatch::default())
        .await
        .unwrap();

    assert_eq!(same, bottle);
}

#[tokio::test]
async fn update_by_other_user_is_rejected_and_leaves_record() {
    let svc = service().await;
    let bottle = svc.create("alice", named("Barolo")).await.unwrap();

    let patch = BottlePatch {
        product: Some(Some("Stolen".into())),
        ..Default::default()
    };
    let err = svc.update(&bottle.id.to_string(), "bob", patch).await.unwrap_err();

    assert!(matches!(err, BottleError::NotOwner { .. }));
    assert_eq!(svc.list("alice").await.unwrap()[0].product, "Barolo");
}

#[tokio::test]
async fn update_of_unknown_or_malformed_id_is_not_found() {
    let svc = service().await;
    let patch = BottlePatch {
        price: Some(Some(1.0)),
        ..Default::default()
    };

    let unknown = svc
        .update(&uuid::Uuid::new_v4().to_string(), "alice", patch.clone())
        .await
        .unwrap_err();
    let malformed = svc.update("not-a-uuid", "alice", patch).await.unwrap_err();

    assert!(matches!(unknown, BottleError::NotFound(_)));
    assert!(matches!(malformed, BottleError::NotFound(_)));
}

#[tokio::test]
async fn invalid_patch_is_rejected_before_lookup() {
    let svc = service().await;
    let patch = BottlePatch {
        product: Some(Some(String::new())),
        ..Default::default()
    };

    let err = svc
        .update(&uuid::Uuid::new_v4().to_string(), "alice", patch)
        .await
        .unwrap_err();

    assert!(matches!(err, BottleError::Validation(_)));
}

#[tokio::test]
async fn delete_removes_bottle_and_returns_it() {
    let svc = service().await;
    let keep = svc.create("alice", named("Keep")).await.unwrap();
    let drop = svc.create("alice", named("Drop")).await.unwrap();

    let deleted = svc.delete(&drop.id.to_string(), "alice").await.unwrap();

    assert_eq!(deleted, drop);
    assert_eq!(svc.list("alice").await.unwrap(), vec![keep]);
}

#[tokio::test]
async fn delete_checks_existence_then_ownership() {
    let svc = service().await;
    let bottle = svc.create("alice", named("Barolo")).await.unwrap();

    let missing = svc
        .delete(&uuid::Uuid::new_v4().to_string(), "alice")
        .await
        .unwrap_err();
    let foreign = svc.delete(&bottle.id.to_string(), "bob").await.unwrap_err();

    assert!(matches!(missing, BottleError::NotFound(_)));
    assert!(matches!(foreign, BottleError::NotOwner { .. }));
    assert_eq!(svc.list("alice").await.unwrap().len(), 1);
}

#[tokio::test]
async fn second_delete_is_not_found() {
    let svc = service().await;
    let bottle = svc.create("alice", named("Barolo")).await.unwrap();
    let id = bottle.id.to_string();

    svc.delete(&id, "alice").await.unwrap();
    assert!(matches!(
        svc.delete(&id, "alice").await.unwrap_err(),
        BottleError::NotFound(_)
    ));
}
