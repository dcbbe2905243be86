use async_trait::async_trait;
use clap::Subcommand;

use crate::cli::config::load_cli_config;
use crate::cli::utils::{fetch_within_bounds, money, output_notice, output_page, require_access};
use crate::cli::watch::{watch_search, Listing};
use crate::cli::OutputFormat;
use crate::client::{ApiClient, ClientError, ItemsQuery};
use crate::config::config;
use crate::models::{Item, ItemFilters, Role};
use crate::pagination::{Page, Paginator};

const ADMINS: &[Role] = &[Role::Admin];

#[derive(Subcommand)]
pub enum ItemsCommands {
    #[command(about = "List one page of menu items")]
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, help = "Page size: 5, 10, 20 or 50")]
        limit: Option<u32>,
        #[arg(long, help = "Only items in this category")]
        category: Option<i64>,
        #[arg(long, help = "Description contains")]
        description: Option<String>,
    },

    #[command(about = "Interactive listing; type a description search on stdin (/help for commands)")]
    Watch {
        #[arg(long, help = "Page size: 5, 10, 20 or 50")]
        limit: Option<u32>,
    },
}

pub async fn handle(cmd: ItemsCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let cli_config = load_cli_config()?;
    require_access(&cli_config, Some(ADMINS)).await?;
    let api = cli_config.api_client()?;

    match cmd {
        ItemsCommands::List { page, limit, category, description } => {
            let mut paginator = Paginator::new(limit.unwrap_or(config().filter.default_page_size));
            let base = ItemsQuery {
                page: 1,
                limit: paginator.page_size(),
                filters: ItemFilters { category_id: category, description },
            };

            let result = fetch_within_bounds(&mut paginator, page, |page| {
                let query = ItemsQuery { page, ..base.clone() };
                let api = &api;
                async move { api.fetch_items(&query).await }
            })
            .await;

            let page = result.unwrap_or_else(|e| {
                let _ = output_notice(&output_format, &e);
                Page::empty()
            });
            output_page(&output_format, &page, ItemsListing::EMPTY_MESSAGE, item_row)
        }
        ItemsCommands::Watch { limit } => {
            let limit = limit.unwrap_or(config().filter.default_page_size);
            watch_search(
                ItemsListing,
                api,
                limit,
                config().filter.items_debounce(),
                output_format,
                |filters: &mut ItemFilters, text| filters.description = Some(text),
            )
            .await
        }
    }
}

pub struct ItemsListing;

#[async_trait]
impl Listing for ItemsListing {
    type Filters = ItemFilters;
    type Key = ItemsQuery;
    type Record = Item;

    const EMPTY_MESSAGE: &'static str = "Nenhum item encontrado.";

    fn key(&self, filters: &ItemFilters, page: u32, limit: u32) -> ItemsQuery {
        ItemsQuery {
            page,
            limit,
            filters: filters.clone(),
        }
    }

    async fn fetch(&self, api: &ApiClient, key: &ItemsQuery) -> Result<Page<Item>, ClientError> {
        api.fetch_items(key).await
    }

    fn row(item: &Item) -> String {
        item_row(item)
    }
}

fn item_row(item: &Item) -> String {
    format!(
        "#{:<6} {:<32} {:<16} {:>12}",
        item.id,
        item.description,
        item.category_name(),
        money(item.unit_price)
    )
}
