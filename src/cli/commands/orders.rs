use async_trait::async_trait;
use chrono::NaiveDate;
use clap::Subcommand;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::auth::Identity;
use crate::cli::config::load_cli_config;
use crate::cli::utils::{fetch_within_bounds, money, output_error, output_notice, output_page, output_success, require_access};
use crate::cli::watch::{parse_paging, read_input, Input, Listing, ListingView, PagingCommand, PAGING_HELP};
use crate::cli::OutputFormat;
use crate::client::{ApiClient, ClientError, OrderFilters, OrdersQuery, OrdersScope};
use crate::config::config;
use crate::debounce::Debouncer;
use crate::gate::{ACCESS_DENIED_MESSAGE, ACCESS_DENIED_TITLE};
use crate::models::{Order, OrderEdit, OrderStatus, PaymentMethod, Role};
use crate::pagination::{Page, Paginator};

const VIEWERS: &[Role] = &[Role::Admin, Role::Client];
const EDITORS: &[Role] = &[Role::Admin];

#[derive(Subcommand)]
pub enum OrdersCommands {
    #[command(about = "List one page of orders (admins see all, clients their own)")]
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, help = "Page size: 5, 10, 20 or 50")]
        limit: Option<u32>,
        #[arg(long, help = "Client name contains")]
        search: Option<String>,
        #[arg(long, help = "Created on or after (YYYY-MM-DD)")]
        from: Option<NaiveDate>,
        #[arg(long, help = "Created on or before (YYYY-MM-DD)")]
        to: Option<NaiveDate>,
        #[arg(long, value_delimiter = ',', help = "PENDING, IN_PROGRESS, COMPLETED, CANCELLED")]
        status: Vec<String>,
        #[arg(long, value_delimiter = ',', help = "CASH, DEBIT, CREDIT, PIX")]
        payment: Vec<String>,
    },

    #[command(about = "Interactive listing; type filters on stdin (/help for commands)")]
    Watch {
        #[arg(long, help = "Page size: 5, 10, 20 or 50")]
        limit: Option<u32>,
    },

    #[command(about = "Change the status of an order (ADMIN)")]
    SetStatus {
        id: i64,
        #[arg(help = "PENDING, IN_PROGRESS, COMPLETED or CANCELLED")]
        status: String,
    },

    #[command(about = "Delete an order (ADMIN)")]
    Delete { id: i64 },
}

pub async fn handle(cmd: OrdersCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let cli_config = load_cli_config()?;
    let api = cli_config.api_client()?;

    match cmd {
        OrdersCommands::List { page, limit, search, from, to, status, payment } => {
            let identity = require_access(&cli_config, Some(VIEWERS)).await?;
            let filters = OrderFilters {
                search_name: search.unwrap_or_default(),
                date_from: from,
                date_to: to,
                status: status.into_iter().map(parse_status).collect(),
                payment_method: payment.into_iter().map(parse_payment).collect(),
            };
            let mut paginator = Paginator::new(limit.unwrap_or(config().filter.default_page_size));
            let base = OrdersQuery {
                scope: OrdersScope::for_identity(&identity),
                page: 1,
                limit: paginator.page_size(),
                filters,
            };

            let result = fetch_within_bounds(&mut paginator, page, |page| {
                let query = OrdersQuery { page, ..base.clone() };
                let api = &api;
                async move { api.fetch_orders(&query).await }
            })
            .await;

            let page = result.unwrap_or_else(|e| {
                let _ = output_notice(&output_format, &e);
                Page::empty()
            });
            output_page(&output_format, &page, "Nenhum pedido encontrado.", order_row)
        }
        OrdersCommands::Watch { limit } => {
            let identity = require_access(&cli_config, Some(VIEWERS)).await?;
            let limit = limit.unwrap_or(config().filter.default_page_size);
            watch(api, identity, limit, output_format).await
        }
        OrdersCommands::SetStatus { id, status } => {
            require_access(&cli_config, Some(EDITORS)).await?;
            let status = parse_status(status);
            match set_status(&api, id, status.clone()).await {
                Ok(()) => output_success(
                    &output_format,
                    &format!("Pedido #{} agora está {}", id, status.label()),
                    Some(json!({ "id": id, "status": status })),
                ),
                Err(e) => {
                    output_notice(&output_format, &e)?;
                    Err(e.into())
                }
            }
        }
        OrdersCommands::Delete { id } => {
            require_access(&cli_config, Some(EDITORS)).await?;
            match api.delete_order(id).await {
                Ok(()) => output_success(&output_format, &format!("Pedido #{} excluído", id), Some(json!({ "id": id }))),
                Err(e) => {
                    output_notice(&output_format, &e)?;
                    Err(e.into())
                }
            }
        }
    }
}

fn parse_status(raw: String) -> OrderStatus {
    OrderStatus::from(raw.trim().to_ascii_uppercase())
}

fn parse_payment(raw: String) -> PaymentMethod {
    PaymentMethod::from(raw.trim().to_ascii_uppercase())
}

async fn set_status(api: &ApiClient, id: i64, status: OrderStatus) -> Result<(), ClientError> {
    let edit = OrderEdit {
        id,
        status: Some(status),
        ..Default::default()
    };
    api.update_order(&edit).await
}

fn order_row(order: &Order) -> String {
    format!(
        "#{:<6} {:<24} {:<12} {:<18} {:>12}  {}",
        order.id,
        order.client.name,
        order.status.label(),
        order.payment_method.label(),
        money(order.total()),
        order.created_at_display()
    )
}

/// Orders as seen by the caller's role
pub struct OrdersListing {
    scope: OrdersScope,
}

#[async_trait]
impl Listing for OrdersListing {
    type Filters = OrderFilters;
    type Key = OrdersQuery;
    type Record = Order;

    const EMPTY_MESSAGE: &'static str = "Nenhum pedido encontrado.";

    fn key(&self, filters: &OrderFilters, page: u32, limit: u32) -> OrdersQuery {
        OrdersQuery {
            scope: self.scope,
            page,
            limit,
            filters: filters.clone(),
        }
    }

    async fn fetch(&self, api: &ApiClient, key: &OrdersQuery) -> Result<Page<Order>, ClientError> {
        api.fetch_orders(key).await
    }

    fn row(order: &Order) -> String {
        order_row(order)
    }
}

/// One line typed into `orders watch`
#[derive(Debug, Clone, PartialEq, Eq)]
enum WatchCommand {
    Search(String),
    Status(Vec<OrderStatus>),
    Payment(Vec<PaymentMethod>),
    From(Option<NaiveDate>),
    To(Option<NaiveDate>),
    Clear,
    Paging(PagingCommand),
    SetStatus(i64, OrderStatus),
    Delete(i64),
    Help,
    Quit,
    Invalid(String),
}

const WATCH_HELP: &str = "\
Type text to search by client name (empty line clears it). Commands:
  /status A,B   /payment A,B   /from YYYY-MM-DD   /to YYYY-MM-DD   /clear
  /set ID STATUS   /delete ID";

fn parse_watch_command(line: &str) -> WatchCommand {
    let (name, args) = match read_input(line) {
        Input::Text(text) => return WatchCommand::Search(text.to_string()),
        Input::Command(name, args) => (name, args),
    };

    let list = |args: &[&str]| -> Vec<String> {
        args.join(",")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    };
    let date = |args: &[&str]| -> Result<Option<NaiveDate>, WatchCommand> {
        match args.first() {
            None => Ok(None),
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| WatchCommand::Invalid(format!("invalid date '{}'", raw))),
        }
    };

    if let Some(paging) = parse_paging(name, &args) {
        return paging.map(WatchCommand::Paging).unwrap_or_else(WatchCommand::Invalid);
    }

    match name {
        "status" => WatchCommand::Status(list(&args).into_iter().map(parse_status).collect()),
        "payment" => WatchCommand::Payment(list(&args).into_iter().map(parse_payment).collect()),
        "from" => date(&args).map(WatchCommand::From).unwrap_or_else(|e| e),
        "to" => date(&args).map(WatchCommand::To).unwrap_or_else(|e| e),
        "clear" => WatchCommand::Clear,
        "set" => match (args.first().and_then(|id| id.parse().ok()), args.get(1)) {
            (Some(id), Some(status)) => WatchCommand::SetStatus(id, parse_status(status.to_string())),
            _ => WatchCommand::Invalid("usage: /set ID STATUS".into()),
        },
        "delete" => match args.first().and_then(|id| id.parse().ok()) {
            Some(id) => WatchCommand::Delete(id),
            None => WatchCommand::Invalid("usage: /delete ID".into()),
        },
        "help" => WatchCommand::Help,
        "quit" | "exit" => WatchCommand::Quit,
        other => WatchCommand::Invalid(format!("unknown command '/{}'", other)),
    }
}

async fn watch(api: ApiClient, identity: Identity, limit: u32, output_format: OutputFormat) -> anyhow::Result<()> {
    let listing = OrdersListing {
        scope: OrdersScope::for_identity(&identity),
    };
    let (mut view, mut fetched) = ListingView::new(listing, api, limit);
    let debouncer = Debouncer::new(OrderFilters::default(), config().filter.orders_debounce());
    let mut settled = debouncer.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let denied = format!("{}: {}", ACCESS_DENIED_TITLE, ACCESS_DENIED_MESSAGE);

    if output_format == OutputFormat::Text {
        println!("{}\n{}", WATCH_HELP, PAGING_HELP);
    }
    view.refresh();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };

                match parse_watch_command(&line) {
                    WatchCommand::Quit => break,
                    WatchCommand::Search(text) => debouncer.update(|f| f.search_name = text),
                    WatchCommand::Status(status) => debouncer.update(|f| f.status = status),
                    WatchCommand::Payment(methods) => debouncer.update(|f| f.payment_method = methods),
                    WatchCommand::From(date) => debouncer.update(|f| f.date_from = date),
                    WatchCommand::To(date) => debouncer.update(|f| f.date_to = date),
                    WatchCommand::Clear => debouncer.set(OrderFilters::default()),
                    WatchCommand::Paging(command) => view.page(command),
                    WatchCommand::SetStatus(..) | WatchCommand::Delete(_) if identity.role != Role::Admin => {
                        output_error(&output_format, &denied, None)?;
                    }
                    WatchCommand::SetStatus(id, status) => match set_status(view.api(), id, status).await {
                        Ok(()) => view.invalidate(),
                        Err(e) => output_notice(&output_format, &e)?,
                    },
                    WatchCommand::Delete(id) => match view.api().delete_order(id).await {
                        Ok(()) => view.invalidate(),
                        Err(e) => output_notice(&output_format, &e)?,
                    },
                    WatchCommand::Help => println!("{}\n{}", WATCH_HELP, PAGING_HELP),
                    WatchCommand::Invalid(message) => output_error(&output_format, &message, None)?,
                }
            }
            changed = settled.changed() => {
                if changed.is_err() {
                    break;
                }
                let filters = settled.borrow_and_update().clone();
                view.set_filters(filters);
            }
            Some(done) = fetched.recv() => view.apply(done, &output_format)?,
        }
    }

    Ok(())
}
