use crate::db::connect_memory;
use crate::{rating, role};
use anyhow::Result;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set, TransactionTrait};

fn rating_am(order: i16) -> rating::ActiveModel {
    rating::ActiveModel {
        moodys_rating: Set("Aaa".into()),
        sand_p_rating: Set("AAA".into()),
        fitch_rating: Set("AAA".into()),
        order_number: Set(Some(order)),
        version: Set(1),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_transaction_commit() -> Result<()> {
    let db = connect_memory().await?;
    let txn = db.begin().await?;
    let created = rating_am(1).insert(&txn).await?;
    txn.commit().await?;

    assert!(rating::Entity::find_by_id(created.id).one(&db).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_transaction_rollback() -> Result<()> {
    let db = connect_memory().await?;
    let txn = db.begin().await?;
    rating_am(2).insert(&txn).await?;
    txn.rollback().await?;

    assert_eq!(rating::Entity::find().count(&db).await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_unique_violation_discards_transaction() -> Result<()> {
    let db = connect_memory().await?;

    let result = async {
        let txn = db.begin().await?;
        role::ActiveModel { name: Set("Trader".into()), ..Default::default() }.insert(&txn).await?;
        role::ActiveModel { name: Set("Trader".into()), ..Default::default() }.insert(&txn).await?;
        txn.commit().await?;
        Ok::<(), anyhow::Error>(())
    }
    .await;
    assert!(result.is_err());

    assert!(role::find_by_name(&db, "Trader").await?.is_none());
    Ok(())
}
