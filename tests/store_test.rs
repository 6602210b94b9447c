// tests/store_test.rs

use shopcart_service::shared::api_error::AppError;
use shopcart_service::shopcarts::shopcart_store::{MemoryShopCartStore, ShopCartStore};
use shopcart_service::shopcarts::shopcart_structs::{ItemKey, ShopCartItem};

fn item(customer_id: i32, product_id: i32, name: &str, quantity: i32, price: f64) -> ShopCartItem {
    ShopCartItem {
        customer_id,
        product_id,
        name: name.to_string(),
        quantity,
        price,
    }
}

#[actix_web::test]
async fn created_items_come_back_deep_equal() {
    let store = MemoryShopCartStore::default();
    let wrench = item(7, 3, "wrench", 2, 9.99);

    store.create(&wrench).await.unwrap();
    let found = store.find_by_key(wrench.key()).await.unwrap();

    assert_eq!(found, Some(wrench));
}

#[actix_web::test]
async fn creating_a_duplicate_key_is_a_conflict() {
    let store = MemoryShopCartStore::default();
    store.create(&item(7, 3, "wrench", 2, 9.99)).await.unwrap();

    let err = store
        .create(&item(7, 3, "hammer", 1, 4.50))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // The first row survived untouched.
    let found = store
        .find_by_key(ItemKey {
            customer_id: 7,
            product_id: 3,
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.name, "wrench");
}

#[actix_web::test]
async fn update_replaces_the_mutable_fields() {
    let store = MemoryShopCartStore::default();
    store.create(&item(7, 3, "wrench", 2, 9.99)).await.unwrap();

    store
        .update(&item(7, 3, "torque wrench", 5, 24.99))
        .await
        .unwrap();

    let found = store
        .find_by_key(ItemKey {
            customer_id: 7,
            product_id: 3,
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.name, "torque wrench");
    assert_eq!(found.quantity, 5);
    assert_eq!(found.price, 24.99);
}

#[actix_web::test]
async fn updating_an_absent_key_is_not_found() {
    let store = MemoryShopCartStore::default();

    let err = store.update(&item(7, 3, "ghost", 1, 1.0)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // No implicit create happened.
    assert_eq!(store.list_all().await.unwrap().len(), 0);
}

#[actix_web::test]
async fn delete_reports_whether_the_row_existed() {
    let store = MemoryShopCartStore::default();
    store.create(&item(7, 3, "wrench", 2, 9.99)).await.unwrap();
    let key = ItemKey {
        customer_id: 7,
        product_id: 3,
    };

    assert!(store.delete(key).await.unwrap());
    assert!(!store.delete(key).await.unwrap());
    assert_eq!(store.find_by_key(key).await.unwrap(), None);
}

#[actix_web::test]
async fn find_by_customer_only_sees_that_cart() {
    let store = MemoryShopCartStore::default();
    store.create(&item(7, 1, "soap", 1, 2.50)).await.unwrap();
    store.create(&item(7, 2, "towel", 2, 8.00)).await.unwrap();
    store.create(&item(9, 1, "soap", 4, 2.50)).await.unwrap();

    let cart = store.find_by_customer(7).await.unwrap();
    assert_eq!(cart.len(), 2);
    assert!(cart.iter().all(|i| i.customer_id == 7));

    assert!(store.find_by_customer(8).await.unwrap().is_empty());
}

#[actix_web::test]
async fn list_all_returns_every_created_item() {
    let store = MemoryShopCartStore::default();
    let expected = vec![
        item(1, 1, "soap", 1, 2.50),
        item(1, 2, "towel", 2, 8.00),
        item(2, 1, "soap", 3, 2.50),
        item(3, 5, "mug", 1, 6.00),
    ];
    for entry in &expected {
        store.create(entry).await.unwrap();
    }

    let all = store.list_all().await.unwrap();
    assert_eq!(all.len(), expected.len());
    for entry in &expected {
        assert!(all.contains(entry));
    }
}

#[actix_web::test]
async fn field_filters_return_exact_matches_only() {
    let store = MemoryShopCartStore::default();
    store.create(&item(1, 1, "soap", 1, 2.50)).await.unwrap();
    store.create(&item(1, 2, "towel", 2, 8.00)).await.unwrap();
    store.create(&item(2, 1, "soap", 2, 2.50)).await.unwrap();
    store.create(&item(3, 2, "towel", 5, 8.00)).await.unwrap();

    let by_price = store.find_by_price(2.50).await.unwrap();
    assert_eq!(by_price.len(), 2);
    assert!(by_price.iter().all(|i| i.price == 2.50));

    let by_quantity = store.find_by_quantity(2).await.unwrap();
    assert_eq!(by_quantity.len(), 2);
    assert!(by_quantity.iter().all(|i| i.quantity == 2));

    let by_product = store.find_by_product_id(2).await.unwrap();
    assert_eq!(by_product.len(), 2);
    assert!(by_product.iter().all(|i| i.product_id == 2));

    assert!(store.find_by_price(99.0).await.unwrap().is_empty());
}
