//! Fetch state shared by the server-paged pages.
//!
//! Tracks the requested page, drops replies that a newer request superseded
//! and refetches when the partner changes or an assignment is created.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use portal_business::AuthSession;
use portal_business::modal::{CallbackId, ModalController};
use portal_business::portal::{
    ApiResult, AssignedProduct, AssignedProductsPage, PartnerUser, ServerPagination, UsersPage,
};
use portal_business::table::PaginationState;

use crate::tasks::Inbox;

/// A page of rows as the backend returns it.
pub trait PagedResponse: Send + 'static {
    type Row;

    fn into_parts(self) -> (Vec<Self::Row>, Option<ServerPagination>);
}

impl PagedResponse for UsersPage {
    type Row = PartnerUser;

    fn into_parts(self) -> (Vec<PartnerUser>, Option<ServerPagination>) {
        (self.users, self.pagination)
    }
}

impl PagedResponse for AssignedProductsPage {
    type Row = AssignedProduct;

    fn into_parts(self) -> (Vec<AssignedProduct>, Option<ServerPagination>) {
        (self.assessments, self.pagination)
    }
}

/// Why [`PagedFetch::sync`] scheduled a reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reload {
    PartnerChanged,
    AssignmentCreated,
}

pub struct PagedFetch<P> {
    what: &'static str,
    page_size: usize,
    page: u32,
    pagination: PaginationState,
    collection_key: u64,
    generation: u64,
    partner_id: Option<String>,
    error: Option<String>,
    stale: bool,
    inbox: Inbox<(u64, ApiResult<P>)>,
    refresh: Arc<AtomicBool>,
    callback: Option<CallbackId>,
}

impl<P: PagedResponse> PagedFetch<P> {
    /// Subscribes to new assignments on `modal`.
    pub fn new(what: &'static str, page_size: usize, modal: &mut ModalController) -> Self {
        let refresh = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&refresh);
        let callback = modal.register(move || {
            flag.store(true, Ordering::Relaxed);
            Ok(())
        });

        Self {
            what,
            page_size,
            page: 1,
            pagination: PaginationState::local(0, page_size, 1),
            collection_key: 0,
            generation: 0,
            partner_id: None,
            error: None,
            stale: true,
            inbox: Inbox::new(),
            refresh,
            callback: Some(callback),
        }
    }

    pub fn detach(&mut self, modal: &mut ModalController) {
        if let Some(id) = self.callback.take() {
            modal.unregister(id);
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn pagination(&self) -> PaginationState {
        self.pagination
    }

    /// Changes whenever the table should drop its sort and page.
    pub fn collection_key(&self) -> u64 {
        self.collection_key
    }

    pub fn partner_id(&self) -> Option<&str> {
        self.partner_id.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.inbox.is_busy()
    }

    /// Back to page 1 of a new collection.
    pub fn restart(&mut self) {
        self.page = 1;
        self.collection_key += 1;
        self.stale = true;
    }

    /// Page picked in the pager.
    pub fn request_page(&mut self, page: u32) {
        if page != self.page {
            self.page = page;
            self.stale = true;
        }
    }

    /// Follows the session's partner and pending assignment callbacks.
    pub fn sync(&mut self, session: &AuthSession) -> Option<Reload> {
        let partner_id = session.current_partner().map(|partner| partner.id.clone());
        if partner_id != self.partner_id {
            self.partner_id = partner_id;
            self.restart();
            return Some(Reload::PartnerChanged);
        }
        if self.refresh.swap(false, Ordering::Relaxed) {
            log::info!("Assignment created, refreshing {}", self.what);
            self.stale = true;
            return Some(Reload::AssignmentCreated);
        }
        None
    }

    /// Rows of the newest reply, if one arrived. A failed fetch yields no
    /// rows and records the error.
    pub fn poll(&mut self) -> Option<Vec<P::Row>> {
        let mut latest = None;
        for (generation, reply) in self.inbox.drain() {
            if generation != self.generation {
                log::debug!(
                    "Dropping {} reply {generation}, now at {}",
                    self.what,
                    self.generation
                );
                continue;
            }
            latest = Some(self.accept(reply));
        }
        latest
    }

    fn accept(&mut self, reply: ApiResult<P>) -> Vec<P::Row> {
        match reply {
            Ok(response) => {
                let (rows, pagination) = response.into_parts();
                let count = rows.len();
                self.pagination = match pagination {
                    Some(pagination) => pagination.to_state(self.page_size),
                    None => PaginationState::local(count, count.max(1), 1),
                };
                self.error = None;
                rows
            }
            Err(err) => {
                log::warn!("Fetching {} failed: {err}", self.what);
                self.error = Some(err.user_message());
                self.pagination = PaginationState::local(0, self.page_size, 1);
                Vec::new()
            }
        }
    }

    /// Issues `request(partner_id, page)` when the shown page is out of date.
    pub fn fetch_if_stale<F, Fut>(&mut self, ctx: &egui::Context, request: F)
    where
        F: FnOnce(String, u32) -> Fut,
        Fut: Future<Output = ApiResult<P>> + Send + 'static,
    {
        if !self.stale {
            return;
        }
        self.stale = false;
        let Some(partner_id) = self.partner_id.clone() else {
            return;
        };
        self.generation += 1;
        let generation = self.generation;
        log::info!(
            "Fetching {} page {} for partner {partner_id}",
            self.what,
            self.page
        );
        let future = request(partner_id, self.page);
        self.inbox
            .spawn(ctx, async move { (generation, future.await) });
    }
}
