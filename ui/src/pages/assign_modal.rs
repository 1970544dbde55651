//! "Assign Assessment" modal: find or create the user by phone number and
//! assign one of the partner's products.

use egui::{Align2, Button, Color32, ComboBox, Context, TextEdit, Vec2, Window};
use portal_business::lookup::{COUNTRY_PREFIX, LookupStatus, PHONE_DIGITS, PhoneLookup};
use portal_business::modal::ModalController;
use portal_business::portal::{ApiResult, NewUser, PartnerPortalApi, PartnerUser, Product};
use portal_business::AuthSession;

use crate::tasks::Inbox;

pub const ASSIGN_WINDOW_TITLE: &str = "Assign Assessment";
pub const PRODUCT_PLACEHOLDER: &str = "Select an assessment";
pub const SUBMIT_LABEL: &str = "Assign";
pub const CANCEL_LABEL: &str = "Cancel";

#[derive(Debug)]
enum AssignMsg {
    Products {
        partner_id: String,
        result: ApiResult<Vec<Product>>,
    },
    Lookup {
        generation: u64,
        result: ApiResult<Option<PartnerUser>>,
    },
    Assigned(ApiResult<()>),
}

/// Who receives the assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Assignee {
    Existing { user_id: String },
    New(NewUser),
}

async fn submit_assignment(
    api: PartnerPortalApi,
    partner_id: String,
    product_id: String,
    assignee: Assignee,
) -> ApiResult<()> {
    let user_id = match assignee {
        Assignee::Existing { user_id } => user_id,
        Assignee::New(user) => {
            let created = api.create_user(&user).await?;
            log::info!("Created user {} for assignment", created.id);
            created.id
        }
    };
    api.assign_product(&partner_id, &product_id, &user_id).await
}

#[derive(Debug, Default)]
pub struct AssignModal {
    lookup: PhoneLookup,
    phone_input: String,
    name: String,
    email: String,
    products: Vec<Product>,
    products_for: Option<String>,
    product: Option<usize>,
    error: Option<String>,
    submitting: bool,
    inbox: Inbox<AssignMsg>,
}

impl AssignModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self) -> &PhoneLookup {
        &self.lookup
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Clears the form; loaded products are kept.
    pub fn reset(&mut self) {
        self.lookup.reset();
        self.phone_input.clear();
        self.name.clear();
        self.email.clear();
        self.product = None;
        self.error = None;
        self.submitting = false;
    }

    fn poll(&mut self, modal: &mut ModalController) {
        for msg in self.inbox.drain() {
            match msg {
                AssignMsg::Products { partner_id, result } => {
                    if self.products_for.as_deref() != Some(partner_id.as_str()) {
                        continue;
                    }
                    match result {
                        Ok(products) => self.products = products,
                        Err(err) => {
                            log::warn!("Loading products for {partner_id} failed: {err}");
                            self.error = Some(err.user_message());
                        }
                    }
                }
                AssignMsg::Lookup { generation, result } => {
                    self.lookup.resolve(generation, result);
                }
                AssignMsg::Assigned(Ok(())) => {
                    log::info!("Assessment assigned");
                    modal.close_assign();
                    let failed = modal.trigger();
                    if failed > 0 {
                        log::warn!("{failed} assignment listeners failed");
                    }
                    self.reset();
                }
                AssignMsg::Assigned(Err(err)) => {
                    log::warn!("Assigning assessment failed: {err}");
                    self.error = Some(err.user_message());
                    self.submitting = false;
                }
            }
        }
    }

    fn load_products(&mut self, ctx: &Context, api: &PartnerPortalApi, partner_id: &str) {
        self.products_for = Some(partner_id.to_owned());
        self.products.clear();
        self.product = None;
        let api = api.clone();
        let partner_id = partner_id.to_owned();
        self.inbox.spawn(ctx, async move {
            let result = api.available_products(&partner_id).await;
            AssignMsg::Products { partner_id, result }
        });
    }

    fn assignee(&self, partner_id: &str) -> Option<Assignee> {
        match self.lookup.status() {
            LookupStatus::Existing(user) => Some(Assignee::Existing {
                user_id: user.id.clone(),
            }),
            LookupStatus::NotFound if !self.name.trim().is_empty() => {
                let email = self.email.trim();
                Some(Assignee::New(NewUser {
                    name: self.name.trim().to_owned(),
                    phone: self.lookup.full_phone(),
                    email: (!email.is_empty()).then(|| email.to_owned()),
                    partner_id: partner_id.to_owned(),
                }))
            }
            _ => None,
        }
    }

    /// Shows the modal while the controller has it open.
    pub fn show(
        &mut self,
        ctx: &Context,
        api: &PartnerPortalApi,
        session: &AuthSession,
        modal: &mut ModalController,
    ) {
        self.poll(modal);
        if !modal.is_assign_open() {
            return;
        }
        let Some(partner) = session.current_partner() else {
            log::warn!("Assign modal opened without a partner");
            modal.close_assign();
            return;
        };
        if self.products_for.as_deref() != Some(partner.id.as_str()) {
            self.load_products(ctx, api, &partner.id);
        }

        let mut open = true;
        let mut cancel = false;
        let mut submit = false;
        Window::new(ASSIGN_WINDOW_TITLE)
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(format!("Phone +{COUNTRY_PREFIX}"));
                    let response = ui.add(
                        TextEdit::singleline(&mut self.phone_input)
                            .hint_text(format!("{PHONE_DIGITS}-digit number"))
                            .char_limit(PHONE_DIGITS),
                    );
                    if response.changed()
                        && let Some(request) = self.lookup.set_input(&self.phone_input)
                    {
                        let api = api.clone();
                        self.inbox.spawn(ui.ctx(), async move {
                            let result = api.search_user(&request.phone).await;
                            AssignMsg::Lookup {
                                generation: request.generation,
                                result,
                            }
                        });
                    }
                });

                match self.lookup.status() {
                    LookupStatus::Idle if !self.lookup.input().is_empty() => {
                        ui.weak(format!("Enter all {PHONE_DIGITS} digits"));
                    }
                    LookupStatus::Idle => {}
                    LookupStatus::Searching => {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label("Looking up user...");
                        });
                    }
                    LookupStatus::Existing(user) => {
                        ui.label(format!("Existing user: {}", user.name));
                    }
                    LookupStatus::NotFound => {
                        ui.label("New user");
                        ui.horizontal(|ui| {
                            ui.label("Name");
                            ui.text_edit_singleline(&mut self.name);
                        });
                        ui.horizontal(|ui| {
                            ui.label("Email");
                            ui.add(TextEdit::singleline(&mut self.email).hint_text("optional"));
                        });
                    }
                }

                ui.add_space(6.0);
                let selected = self
                    .product
                    .and_then(|index| self.products.get(index))
                    .map_or(PRODUCT_PLACEHOLDER, |product| product.name.as_str());
                ComboBox::from_id_salt("assign_product")
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        for (index, product) in self.products.iter().enumerate() {
                            ui.selectable_value(&mut self.product, Some(index), product.name.as_str());
                        }
                    });

                if let Some(error) = &self.error {
                    ui.colored_label(Color32::RED, error);
                }

                ui.add_space(6.0);
                let ready = !self.submitting
                    && self.product.is_some()
                    && self.assignee(&partner.id).is_some();
                ui.horizontal(|ui| {
                    submit = ui.add_enabled(ready, Button::new(SUBMIT_LABEL)).clicked();
                    cancel = ui.button(CANCEL_LABEL).clicked();
                    if self.submitting {
                        ui.spinner();
                    }
                });
            });

        if submit {
            self.submit(ctx, api, &partner.id);
        }
        if cancel || !open {
            modal.close_assign();
            self.reset();
        }
    }

    fn submit(&mut self, ctx: &Context, api: &PartnerPortalApi, partner_id: &str) {
        let product = self.product.and_then(|index| self.products.get(index));
        let (Some(product), Some(assignee)) = (product, self.assignee(partner_id)) else {
            return;
        };
        log::info!("Assigning product {} ({assignee:?})", product.id);
        let future = submit_assignment(
            api.clone(),
            partner_id.to_owned(),
            product.id.clone(),
            assignee,
        );
        self.submitting = true;
        self.error = None;
        self.inbox
            .spawn(ctx, async move { AssignMsg::Assigned(future.await) });
    }
}
