// src/shopcarts/shopcart_router.rs

use std::str::FromStr;

use actix_web::http::header;
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse, Responder};
use serde_json;
use tracing::info;

// Imports the structs defined in the `shopcart_structs` module in this folder
use super::shopcart_structs::{ItemKey, ShopCartItem, ShopCartQuery};

// Imports the AppState from the crate root
use crate::shared::api_error::AppError;
use crate::shared::shared_structs::ServiceInfo;
use crate::AppState;

/// Root route. Serves a small discovery payload so callers can find the
/// collection without hardcoding its URL.
#[get("/")]
pub async fn index(req: HttpRequest) -> impl Responder {
    HttpResponse::Ok().json(ServiceInfo {
        name: "ShopCart REST API Service".to_string(),
        version: "1.0".to_string(),
        paths: req
            .url_for_static("list_shopcarts")
            .map(|url| url.to_string())
            .unwrap_or_else(|_| "/shopcarts".to_string()),
    })
}

/// Route to list every item in the table, or the exact-match subset selected
/// by one of the `price`, `quantity` and `product_id` query parameters.
///
/// When several parameters are present only the first one in that priority
/// order is applied. Values arrive as strings and must parse into the
/// field's type, otherwise the request is a 400.
#[get("/shopcarts")]
pub async fn list_shopcarts(
    data: web::Data<AppState>,
    query: web::Query<ShopCartQuery>,
) -> Result<HttpResponse, AppError> {
    info!("Request to list shopcart items");

    let items = if let Some(price) = &query.price {
        data.store.find_by_price(parse_filter(price, "price")?).await?
    } else if let Some(quantity) = &query.quantity {
        data.store
            .find_by_quantity(parse_filter(quantity, "quantity")?)
            .await?
    } else if let Some(product_id) = &query.product_id {
        data.store
            .find_by_product_id(parse_filter(product_id, "product_id")?)
            .await?
    } else {
        data.store.list_all().await?
    };

    Ok(HttpResponse::Ok().json(items))
}

/// Route to create a shopcart.
///
/// The body must carry a complete item so the payload shape is validated,
/// but nothing is persisted: a cart only exists as its items, and an empty
/// cart is no rows at all. The response still points at the customer's
/// resource so the caller can add items next.
#[post("/shopcarts")]
pub async fn create_shopcart(req: HttpRequest, item: web::Json<ShopCartItem>) -> HttpResponse {
    info!(
        "Request to create a shopcart for customer '{}'",
        item.customer_id
    );

    HttpResponse::Created()
        .insert_header((header::LOCATION, customer_url(&req, item.customer_id)))
        .json(serde_json::json!({ "customer_id": item.customer_id }))
}

/// Route to add an item to a customer's cart.
///
/// The customer_id in the body must agree with the path, and the composite
/// key must not be taken yet. Duplicates are rejected here, before the
/// store is asked to insert anything.
#[post("/shopcarts/{customer_id}/items")]
pub async fn create_item(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    item: web::Json<ShopCartItem>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();
    let item = item.into_inner();
    info!(
        "Request to add an item to the shopcart of customer '{}'",
        customer_id
    );

    if item.customer_id != customer_id {
        return Err(AppError::Validation(format!(
            "customer_id '{}' in the body does not match '{}' in the path",
            item.customer_id, customer_id
        )));
    }
    if data.store.find_by_key(item.key()).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "Item with {} already exists",
            item.key()
        )));
    }

    data.store.create(&item).await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, item_url(&req, item.key())))
        .json(item))
}

/// Route to read one customer's cart. A customer with no items has no cart,
/// so the empty case is a 404 rather than an empty list.
#[get("/shopcarts/{customer_id}")]
pub async fn get_shopcart(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();
    info!("Request to list the shopcart of customer '{}'", customer_id);

    let items = customer_items_or_404(&data, customer_id).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// Alias of the cart read under the items collection path.
#[get("/shopcarts/{customer_id}/items")]
pub async fn list_items(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();
    info!(
        "Request to list the items in the shopcart of customer '{}'",
        customer_id
    );

    let items = customer_items_or_404(&data, customer_id).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// Route to read a single item by its composite key.
#[get("/shopcarts/{customer_id}/items/{product_id}")]
pub async fn get_item(
    data: web::Data<AppState>,
    path: web::Path<(i32, i32)>,
) -> Result<HttpResponse, AppError> {
    let (customer_id, product_id) = path.into_inner();
    let key = ItemKey {
        customer_id,
        product_id,
    };
    info!("Request to read the item for {}", key);

    match data.store.find_by_key(key).await? {
        Some(item) => Ok(HttpResponse::Ok().json(item)),
        None => Err(AppError::NotFound(format!(
            "Item with {} was not found",
            key
        ))),
    }
}

/// Route to replace the mutable fields of an existing item.
///
/// The path owns the identity: whatever key fields the body claims are
/// overwritten before saving. Updating an absent key is a 404, never an
/// implicit create.
#[put("/shopcarts/{customer_id}/items/{product_id}")]
pub async fn update_item(
    data: web::Data<AppState>,
    path: web::Path<(i32, i32)>,
    body: web::Json<ShopCartItem>,
) -> Result<HttpResponse, AppError> {
    let (customer_id, product_id) = path.into_inner();
    let key = ItemKey {
        customer_id,
        product_id,
    };
    info!("Request to update the item for {}", key);

    if data.store.find_by_key(key).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Item with {} was not found",
            key
        )));
    }

    let mut item = body.into_inner();
    item.customer_id = customer_id;
    item.product_id = product_id;
    data.store.update(&item).await?;

    Ok(HttpResponse::Ok().json(item))
}

/// Route to drop a customer's entire cart. Deleting a cart that is already
/// empty succeeds too; there is nothing to report as missing.
#[delete("/shopcarts/{customer_id}")]
pub async fn delete_shopcart(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();
    info!(
        "Request to delete the shopcart of customer '{}'",
        customer_id
    );

    for item in data.store.find_by_customer(customer_id).await? {
        data.store.delete(item.key()).await?;
    }

    Ok(HttpResponse::NoContent().finish())
}

/// Route to remove a single item by its composite key.
#[delete("/shopcarts/{customer_id}/items/{product_id}")]
pub async fn delete_item(
    data: web::Data<AppState>,
    path: web::Path<(i32, i32)>,
) -> Result<HttpResponse, AppError> {
    let (customer_id, product_id) = path.into_inner();
    let key = ItemKey {
        customer_id,
        product_id,
    };
    info!("Request to delete the item for {}", key);

    if data.store.delete(key).await? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::NotFound(format!(
            "Item with {} was not found",
            key
        )))
    }
}

/// Route to check out a whole cart.
#[put("/shopcarts/{customer_id}/checkout")]
pub async fn checkout_shopcart(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    check_content_type(&req)?;
    let customer_id = path.into_inner();
    info!(
        "Request to checkout the shopcart of customer '{}'",
        customer_id
    );

    // TODO: hand the cart to the order service once one exists. Until then
    // checking out only clears the cart.
    for item in data.store.find_by_customer(customer_id).await? {
        data.store.delete(item.key()).await?;
    }

    Ok(HttpResponse::Ok().finish())
}

/// Route to check out a single item. The item must exist; checking out an
/// absent item is a 404, unlike the whole-cart form.
#[put("/shopcarts/{customer_id}/items/{product_id}/checkout")]
pub async fn checkout_item(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<(i32, i32)>,
) -> Result<HttpResponse, AppError> {
    check_content_type(&req)?;
    let (customer_id, product_id) = path.into_inner();
    let key = ItemKey {
        customer_id,
        product_id,
    };
    info!("Request to checkout the item for {}", key);

    if data.store.delete(key).await? {
        Ok(HttpResponse::Ok().finish())
    } else {
        Err(AppError::NotFound(format!(
            "Item with {} was not found",
            key
        )))
    }
}

/// Registers every route plus the fallbacks that turn an unmapped verb on a
/// known path into a 405 and an unknown path into a structured 404.
///
/// The fallbacks must come after the real services: a resource whose method
/// guard rejects the request falls through to the next registered match.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(list_shopcarts)
        .service(create_shopcart)
        .service(get_shopcart)
        .service(delete_shopcart)
        .service(checkout_shopcart)
        .service(list_items)
        .service(create_item)
        .service(get_item)
        .service(update_item)
        .service(delete_item)
        .service(checkout_item);

    for path in [
        "/",
        "/shopcarts",
        "/shopcarts/{customer_id}",
        "/shopcarts/{customer_id}/checkout",
        "/shopcarts/{customer_id}/items",
        "/shopcarts/{customer_id}/items/{product_id}",
        "/shopcarts/{customer_id}/items/{product_id}/checkout",
    ] {
        cfg.service(web::resource(path).route(web::route().to(method_not_allowed)));
    }

    cfg.default_service(web::route().to(not_found));
}

// Shared lookup for the two cart-read routes.
async fn customer_items_or_404(
    data: &AppState,
    customer_id: i32,
) -> Result<Vec<ShopCartItem>, AppError> {
    let items = data.store.find_by_customer(customer_id).await?;
    if items.is_empty() {
        return Err(AppError::NotFound(format!(
            "Shopcart for customer '{}' was not found",
            customer_id
        )));
    }
    Ok(items)
}

/// Rejects bodyless POST/PUT requests that do not declare a JSON payload.
/// Routes with a JSON extractor get the same check from the extractor
/// itself; this is for routes that take no body.
fn check_content_type(req: &HttpRequest) -> Result<(), AppError> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    if content_type.starts_with("application/json") {
        return Ok(());
    }
    Err(AppError::UnsupportedMediaType(
        "Content-Type must be application/json".to_string(),
    ))
}

fn parse_filter<T: FromStr>(raw: &str, field: &str) -> Result<T, AppError> {
    raw.parse().map_err(|_| {
        AppError::Validation(format!("Filter value '{}' is not valid for '{}'", raw, field))
    })
}

// Location targets are generated from the named routes; the format! fallback
// only fires if a route is renamed without updating the name here.
fn customer_url(req: &HttpRequest, customer_id: i32) -> String {
    req.url_for("get_shopcart", [customer_id.to_string()])
        .map(|url| url.to_string())
        .unwrap_or_else(|_| format!("/shopcarts/{}", customer_id))
}

fn item_url(req: &HttpRequest, key: ItemKey) -> String {
    req.url_for(
        "get_item",
        [key.customer_id.to_string(), key.product_id.to_string()],
    )
    .map(|url| url.to_string())
    .unwrap_or_else(|_| format!("/shopcarts/{}/items/{}", key.customer_id, key.product_id))
}

async fn method_not_allowed(req: HttpRequest) -> Result<HttpResponse, AppError> {
    Err(AppError::MethodNotAllowed(format!(
        "Method {} is not allowed on {}",
        req.method(),
        req.path()
    )))
}

async fn not_found(req: HttpRequest) -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound(format!(
        "The requested URL {} was not found on the server",
        req.path()
    )))
}
