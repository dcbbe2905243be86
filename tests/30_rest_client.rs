mod common;

use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use reqwest::Method;
use rust_decimal::Decimal;

use uaifood_admin::cep::CepClient;
use uaifood_admin::client::{
    ApiClient, ClientError, ItemsQuery, OrderFilters, OrdersQuery, OrdersScope, UsersQuery, GENERIC_FAILURE,
};
use uaifood_admin::models::{ItemFilters, OrderEdit, OrderStatus, PaymentMethod, Role, UpdateUserPayload, UsersFilter};

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn client_orders_go_to_own_listing_with_user_id() -> Result<()> {
    let backend = common::Backend { last_page: 4, ..Default::default() };
    let server = common::fake_backend(backend.clone()).await?;
    let api = ApiClient::new(&server.base_url, TIMEOUT)?.with_token(Some("tok".into()));

    let query = OrdersQuery {
        scope: OrdersScope::Mine(42),
        page: 2,
        limit: 5,
        filters: OrderFilters {
            search_name: "  ".into(),
            date_from: NaiveDate::from_ymd_opt(2025, 11, 1),
            date_to: None,
            status: vec![OrderStatus::Pending, OrderStatus::Completed],
            payment_method: vec![PaymentMethod::Pix],
        },
    };
    let page = api.fetch_orders(&query).await?;

    assert_eq!(page.meta.current_page, 2);
    assert_eq!(page.meta.last_page, 4);
    assert_eq!(page.data[0].total(), Decimal::new(2500, 2));

    let requests = backend.requests();
    let request = requests.last().expect("backend saw the request");
    assert_eq!(request.path, "/orders/my");
    assert_eq!(request.get("userId"), ["42"]);
    assert_eq!(request.get("status"), ["PENDING", "COMPLETED"]);
    assert_eq!(request.get("paymentMethod"), ["PIX"]);
    assert_eq!(request.get("dateFrom"), ["2025-11-01"]);
    assert!(request.get("searchName").is_empty(), "blank search is omitted");
    assert!(request.get("dateTo").is_empty());
    assert_eq!(request.authorization.as_deref(), Some("Bearer tok"));
    Ok(())
}

#[tokio::test]
async fn admin_orders_go_to_full_listing() -> Result<()> {
    let backend = common::Backend { last_page: 1, ..Default::default() };
    let server = common::fake_backend(backend.clone()).await?;
    let api = ApiClient::new(&server.base_url, TIMEOUT)?;

    let query = OrdersQuery {
        scope: OrdersScope::All,
        page: 1,
        limit: 10,
        filters: OrderFilters { search_name: "Manu".into(), ..Default::default() },
    };
    api.fetch_orders(&query).await?;

    let request = backend.requests().pop().expect("backend saw the request");
    assert_eq!(request.path, "/orders");
    assert!(request.get("userId").is_empty());
    assert_eq!(request.get("searchName"), ["Manu"]);
    assert!(request.authorization.is_none());
    Ok(())
}

#[tokio::test]
async fn users_and_items_forward_their_filters() -> Result<()> {
    let backend = common::Backend { last_page: 2, ..Default::default() };
    let server = common::fake_backend(backend.clone()).await?;
    let api = ApiClient::new(&server.base_url, TIMEOUT)?;

    let users = api
        .fetch_users(&UsersQuery {
            page: 1,
            limit: 20,
            filter: UsersFilter { query: Some("manu".into()) },
        })
        .await?;
    assert_eq!(users.data[0].name, "Manu");

    let items = api
        .fetch_items(&ItemsQuery {
            page: 1,
            limit: 10,
            filters: ItemFilters { category_id: Some(3), description: None },
        })
        .await?;
    assert!(items.is_empty());

    let requests = backend.requests();
    assert_eq!(requests[0].path, "/users");
    assert_eq!(requests[0].get("query"), ["manu"]);
    assert_eq!(requests[1].path, "/items");
    assert_eq!(requests[1].get("categoryId"), ["3"]);
    assert!(requests[1].get("description").is_empty());
    Ok(())
}

#[tokio::test]
async fn mutations_hit_the_record_path() -> Result<()> {
    let backend = common::Backend::default();
    let server = common::fake_backend(backend.clone()).await?;
    let api = ApiClient::new(&server.base_url, TIMEOUT)?;

    api.update_order(&OrderEdit { id: 9, status: Some(OrderStatus::Cancelled), ..Default::default() })
        .await?;
    api.delete_order(9).await?;

    let requests = backend.requests();
    assert_eq!((requests[0].method.clone(), requests[0].path.as_str()), (Method::PUT, "/orders/9"));
    assert_eq!((requests[1].method.clone(), requests[1].path.as_str()), (Method::DELETE, "/orders/9"));
    Ok(())
}

#[tokio::test]
async fn own_record_is_read_and_edited_by_id() -> Result<()> {
    let backend = common::Backend::default();
    let server = common::fake_backend(backend.clone()).await?;
    let api = ApiClient::new(&server.base_url, TIMEOUT)?.with_token(Some("tok".into()));

    let user = api.fetch_user(7).await?;
    assert_eq!(user.id, 7);
    assert_eq!(user.role, Role::Client);

    let payload = UpdateUserPayload {
        id: user.id,
        phone: Some("(34) 99999-0000".into()),
        ..Default::default()
    };
    api.update_user(&payload).await?;

    let requests = backend.requests();
    assert_eq!((requests[0].method.clone(), requests[0].path.as_str()), (Method::GET, "/users/7"));
    assert_eq!((requests[1].method.clone(), requests[1].path.as_str()), (Method::PUT, "/users/7"));
    assert_eq!(requests[1].authorization.as_deref(), Some("Bearer tok"));
    Ok(())
}

#[tokio::test]
async fn failures_collapse_to_a_notice() -> Result<()> {
    let server = common::fake_backend(common::Backend::default()).await?;
    let api = ApiClient::new(&server.base_url, TIMEOUT)?;

    // Unknown path: the fake answers 404 with a message of its own.
    let err = api.delete_user(1).await.unwrap_err();
    assert_eq!(err.notice(), "Not found");

    // Nothing listens on port 9.
    let offline = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1))?;
    let err = offline.delete_user(1).await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
    assert_eq!(err.notice(), GENERIC_FAILURE);
    Ok(())
}

#[tokio::test]
async fn cep_lookup_fills_address_or_reports_not_found() -> Result<()> {
    let server = common::fake_backend(common::Backend::default()).await?;
    let cep = CepClient::new(&server.base_url, TIMEOUT)?;

    let address = cep.lookup("38400-000").await?.into_address("100");
    assert_eq!(address.city, "Uberlândia");
    assert_eq!(address.state, "MG");
    assert_eq!(address.zip_code, "38400-000");

    let err = cep.lookup("99999-999").await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
    Ok(())
}
