//! Property 7 (idempotent projection upsert): repeated
//! `upsert_projection` calls against the same natural key update the same
//! row rather than create a duplicate, following `bom_service_test.rs`'s
//! `MockDatabase` idiom (`DatabaseBackend::Postgres`, which SeaORM serves
//! insert/update through a single `RETURNING` query rather than a
//! separate exec-then-select round trip).

use std::sync::Arc;

use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase};
use uuid::Uuid;

use mrp_portal::entities::user_projection;
use mrp_portal::models::RiskType;
use mrp_portal::projections::{ProjectionStore, SeaOrmProjectionStore};

#[tokio::test]
async fn repeated_upsert_updates_the_same_row_instead_of_inserting_a_duplicate() {
    let row_id = Uuid::new_v4();
    let first_write = Utc::now();
    let second_write = Utc::now();

    let inserted_row = user_projection::Model {
        id: row_id,
        so_number: "SO1".to_string(),
        part_number: "P1".to_string(),
        risk_type: "HighRisk".to_string(),
        quantity: dec!(5),
        updated_at: first_write,
        updated_by: "buyer1".to_string(),
    };
    let updated_row = user_projection::Model {
        id: row_id,
        so_number: "SO1".to_string(),
        part_number: "P1".to_string(),
        risk_type: "HighRisk".to_string(),
        quantity: dec!(8),
        updated_at: second_write,
        updated_by: "buyer2".to_string(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![
            vec![] as Vec<user_projection::Model>,      // first find: no existing row
            vec![inserted_row.clone()],                 // first insert, RETURNING
            vec![inserted_row.clone()],                 // second find: row from first call
            vec![updated_row.clone()],                  // second update, RETURNING
        ])
        .into_connection();

    let store = SeaOrmProjectionStore::new(Arc::new(db));

    let first = store
        .upsert_projection("SO1", "P1", RiskType::HighRisk, dec!(5), "buyer1")
        .await
        .unwrap();
    assert_eq!(first.quantity, dec!(5));

    let second = store
        .upsert_projection("SO1", "P1", RiskType::HighRisk, dec!(8), "buyer2")
        .await
        .unwrap();
    assert_eq!(second.quantity, dec!(8));
    assert_eq!(second.so_number, "SO1");
    assert_eq!(second.part_number, "P1");
    assert_eq!(second.risk_type, RiskType::HighRisk);
}

#[tokio::test]
async fn upsert_rejects_negative_quantity_without_touching_the_database() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let store = SeaOrmProjectionStore::new(Arc::new(db));

    let result = store
        .upsert_projection("SO1", "P1", RiskType::HighRisk, dec!(-1), "buyer1")
        .await;

    assert!(result.is_err());
}
