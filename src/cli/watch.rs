//! Interactive listings: stdin drives filters and paging, fetches run in the
//! background and only the newest answer is rendered.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::cli::utils::{output_error, output_notice, output_page};
use crate::cli::OutputFormat;
use crate::client::{ApiClient, ClientError};
use crate::debounce::Debouncer;
use crate::pagination::{Page, Paginator};
use crate::query::{QueryTracker, Ticket};

/// One paginated, filterable listing of the dashboard
#[async_trait]
pub trait Listing: Send + Sync + 'static {
    type Filters: Clone + Default + PartialEq + Send + Sync + 'static;
    type Key: Clone + PartialEq + Debug + Send + Sync + 'static;
    type Record: Serialize + Send + 'static;

    const EMPTY_MESSAGE: &'static str;

    fn key(&self, filters: &Self::Filters, page: u32, limit: u32) -> Self::Key;

    async fn fetch(&self, api: &ApiClient, key: &Self::Key) -> Result<Page<Self::Record>, ClientError>;

    fn row(record: &Self::Record) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingCommand {
    Next,
    Previous,
    Page(u32),
    Size(u32),
}

/// A typed line: free text, or `/name args...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input<'a> {
    Text(&'a str),
    Command(&'a str, Vec<&'a str>),
}

pub fn read_input(line: &str) -> Input<'_> {
    let line = line.trim();
    match line.strip_prefix('/') {
        Some(command) => {
            let mut parts = command.split_whitespace();
            let name = parts.next().unwrap_or_default();
            Input::Command(name, parts.collect())
        }
        None => Input::Text(line),
    }
}

/// `None` when `name` is not a paging command
pub fn parse_paging(name: &str, args: &[&str]) -> Option<Result<PagingCommand, String>> {
    let number = || args.first().and_then(|raw| raw.parse::<u32>().ok());

    match name {
        "next" => Some(Ok(PagingCommand::Next)),
        "prev" => Some(Ok(PagingCommand::Previous)),
        "page" => Some(number().map(PagingCommand::Page).ok_or_else(|| "usage: /page N".to_string())),
        "size" => Some(number().map(PagingCommand::Size).ok_or_else(|| "usage: /size N".to_string())),
        _ => None,
    }
}

pub const PAGING_HELP: &str = "  /next   /prev   /page N   /size N   /help   /quit";

type Fetched<T> = (Ticket, Result<Page<T>, ClientError>);

/// Page, filters and in-flight fetches of one listing
pub struct ListingView<L: Listing> {
    listing: Arc<L>,
    api: ApiClient,
    paginator: Paginator,
    filters: L::Filters,
    tracker: QueryTracker<L::Key, Page<L::Record>>,
    results: mpsc::UnboundedSender<Fetched<L::Record>>,
}

impl<L: Listing> ListingView<L> {
    pub fn new(listing: L, api: ApiClient, page_size: u32) -> (Self, mpsc::UnboundedReceiver<Fetched<L::Record>>) {
        let (results, fetched) = mpsc::unbounded_channel();
        let view = Self {
            listing: Arc::new(listing),
            api,
            paginator: Paginator::new(page_size),
            filters: L::Filters::default(),
            tracker: QueryTracker::new(),
            results,
        };
        (view, fetched)
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn key(&self) -> L::Key {
        self.listing
            .key(&self.filters, self.paginator.page(), self.paginator.page_size())
    }

    /// Fetch the current key unless the tracker already has it covered
    pub fn refresh(&mut self) {
        self.start(self.key());
    }

    fn start(&mut self, key: L::Key) {
        let Some(ticket) = self.tracker.begin(key.clone()) else {
            return;
        };

        let listing = self.listing.clone();
        let api = self.api.clone();
        let results = self.results.clone();
        tokio::spawn(async move {
            let result = listing.fetch(&api, &key).await;
            let _ = results.send((ticket, result));
        });
    }

    /// New filters start over from the first page
    pub fn set_filters(&mut self, filters: L::Filters) {
        self.filters = filters;
        self.paginator.go_to(1);
        self.refresh();
    }

    pub fn page(&mut self, command: PagingCommand) {
        match command {
            PagingCommand::Next => {
                self.paginator.next();
            }
            PagingCommand::Previous => {
                self.paginator.previous();
            }
            PagingCommand::Page(page) => {
                self.paginator.go_to(page);
            }
            PagingCommand::Size(size) => self.paginator.set_page_size(size),
        }
        self.refresh();
    }

    /// Refetch after a mutation; if a fetch is in flight the refetch waits for it
    pub fn invalidate(&mut self) {
        self.tracker.invalidate();
        if let Some(key) = self.tracker.refetch_key().cloned() {
            self.start(key);
        }
    }

    /// Apply a finished fetch: drop it if superseded, otherwise render it and
    /// issue whatever follow-up fetch the new bounds or an invalidation need.
    pub fn apply(&mut self, fetched: Fetched<L::Record>, output_format: &OutputFormat) -> anyhow::Result<()> {
        let requested = self.paginator.page();
        match self.settle(fetched) {
            Arrival::Superseded => return Ok(()),
            Arrival::Failed(e) => output_notice(output_format, &e)?,
            Arrival::Loaded => {}
        }

        if let Some(page) = self.tracker.data() {
            output_page(output_format, page, L::EMPTY_MESSAGE, L::row)?;
        }

        if self.paginator.page() != requested {
            // The result set shrank under the selected page.
            self.refresh();
        } else if let Some(key) = self.tracker.refetch_key().cloned() {
            self.start(key);
        }
        Ok(())
    }

    /// Hand the result to the tracker and adopt its bounds. A failure is
    /// stored as an empty page but only reported if it is still current.
    fn settle(&mut self, (ticket, result): Fetched<L::Record>) -> Arrival {
        let (page, failure) = match result {
            Ok(page) => (page, None),
            Err(e) => (Page::empty(), Some(e)),
        };
        let meta = page.meta;
        if !self.tracker.resolve(ticket, page) {
            return Arrival::Superseded;
        }

        self.paginator.sync(&meta);
        match failure {
            Some(e) => Arrival::Failed(e),
            None => Arrival::Loaded,
        }
    }
}

#[derive(Debug)]
enum Arrival {
    Superseded,
    Loaded,
    Failed(ClientError),
}

/// Watch loop for listings filtered by a single search box
pub async fn watch_search<L, F>(
    listing: L,
    api: ApiClient,
    page_size: u32,
    quiet: Duration,
    output_format: OutputFormat,
    set_text: F,
) -> anyhow::Result<()>
where
    L: Listing,
    F: Fn(&mut L::Filters, String),
{
    let (mut view, mut fetched) = ListingView::new(listing, api, page_size);
    let debouncer = Debouncer::new(L::Filters::default(), quiet);
    let mut settled = debouncer.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if output_format == OutputFormat::Text {
        println!("Type text to search (empty line clears it). Commands:\n{}", PAGING_HELP);
    }
    view.refresh();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };

                match read_input(&line) {
                    Input::Text(text) => {
                        let text = text.to_string();
                        debouncer.update(|filters| set_text(filters, text));
                    }
                    Input::Command("quit" | "exit", _) => break,
                    Input::Command("help", _) => println!("{}", PAGING_HELP),
                    Input::Command(name, args) => match parse_paging(name, &args) {
                        Some(Ok(command)) => view.page(command),
                        Some(Err(usage)) => output_error(&output_format, &usage, None)?,
                        None => output_error(&output_format, &format!("unknown command '/{}'", name), None)?,
                    },
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
