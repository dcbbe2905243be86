mod common;

use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;

use uaifood_admin::cli::utils::fetch_within_bounds;
use uaifood_admin::client::{ApiClient, OrderFilters, OrdersQuery, OrdersScope};
use uaifood_admin::pagination::Paginator;
use uaifood_admin::query::QueryTracker;

const TIMEOUT: Duration = Duration::from_secs(5);

fn query(page: u32) -> OrdersQuery {
    OrdersQuery {
        scope: OrdersScope::All,
        page,
        limit: 10,
        filters: OrderFilters::default(),
    }
}

#[tokio::test]
async fn out_of_range_page_is_never_requested() -> Result<()> {
    let backend = common::Backend { last_page: 3, ..Default::default() };
    let server = common::fake_backend(backend.clone()).await?;
    let api = ApiClient::new(&server.base_url, TIMEOUT)?;

    let mut paginator = Paginator::default();
    let page = fetch_within_bounds(&mut paginator, 50, |page| {
        let api = &api;
        async move { api.fetch_orders(&query(page)).await }
    })
    .await?;

    assert_eq!(page.meta.current_page, 3);
    let pages: Vec<String> = backend
        .requests()
        .iter()
        .flat_map(|r| r.get("page").into_iter().map(str::to_string).collect::<Vec<_>>())
        .collect();
    assert_eq!(pages, ["1", "3"]);
    Ok(())
}

#[tokio::test]
async fn slow_superseded_fetch_does_not_overwrite_newer_result() -> Result<()> {
    let backend = common::Backend {
        last_page: 5,
        slow_page: Some((1, Duration::from_millis(300))),
        ..Default::default()
    };
    let server = common::fake_backend(backend).await?;
    let api = ApiClient::new(&server.base_url, TIMEOUT)?;

    let mut tracker = QueryTracker::new();
    let (tx, mut rx) = mpsc::unbounded_channel();

    for page in [1, 2] {
        let key = query(page);
        let ticket = tracker.begin(key.clone()).expect("new key starts a fetch");
        let api = api.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let _ = tx.send((ticket, api.fetch_orders(&key).await));
        });
    }
    drop(tx);

    let mut applied = Vec::new();
    while let Some((ticket, result)) = rx.recv().await {
        let page = result?;
        let id = page.data[0].id;
        if tracker.resolve(ticket, page) {
            applied.push(id);
        }
    }

    // Page 2 answered first; page 1 arrived late and was dropped.
    assert_eq!(applied, [2]);
    assert_eq!(tracker.data().map(|p| p.meta.current_page), Some(2));
    Ok(())
}
