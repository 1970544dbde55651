//! Notes windows: everything written about a user, and the notes on a
//! single assignment.

use egui::{Button, Color32, Context, ScrollArea, TextEdit, Ui, Window};
use portal_business::notes::{self, NoteGroup};
use portal_business::portal::{
    ApiResult, AssignedProduct, NewNote, Note, PartnerPortalApi, PartnerUser, UserNotesResponse,
};
use portal_business::AuthSession;

use crate::tasks::Inbox;

const NOTES_WINDOW_WIDTH: f32 = 440.0;
const NOTES_LIST_HEIGHT: f32 = 320.0;

#[derive(Debug)]
enum UserNotesMsg {
    Loaded(ApiResult<UserNotesResponse>),
    Saved(ApiResult<()>),
}

/// All notes for one user, grouped by assessment, with a box for adding a
/// general note.
#[derive(Debug)]
pub struct UserNotesPanel {
    user_id: String,
    user_name: String,
    groups: Vec<NoteGroup>,
    draft: String,
    error: Option<String>,
    stale: bool,
    inbox: Inbox<UserNotesMsg>,
}

impl UserNotesPanel {
    pub fn new(user: &PartnerUser) -> Self {
        Self {
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            groups: Vec::new(),
            draft: String::new(),
            error: None,
            stale: true,
            inbox: Inbox::new(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn groups(&self) -> &[NoteGroup] {
        &self.groups
    }

    fn poll(&mut self) {
        for msg in self.inbox.drain() {
            match msg {
                UserNotesMsg::Loaded(Ok(response)) => {
                    self.groups = notes::group(notes::flatten(&response));
                    self.error = None;
                }
                UserNotesMsg::Loaded(Err(err)) => {
                    log::warn!("Loading notes for {} failed: {err}", self.user_id);
                    self.error = Some(err.user_message());
                }
                UserNotesMsg::Saved(Ok(())) => {
                    self.draft.clear();
                    self.stale = true;
                }
                UserNotesMsg::Saved(Err(err)) => {
                    log::warn!("Saving note for {} failed: {err}", self.user_id);
                    self.error = Some(err.user_message());
                }
            }
        }
    }

    fn load(&mut self, ctx: &Context, api: &PartnerPortalApi, partner_id: &str) {
        let api = api.clone();
        let partner_id = partner_id.to_owned();
        let user_id = self.user_id.clone();
        self.stale = false;
        self.inbox.spawn(ctx, async move {
            UserNotesMsg::Loaded(api.user_assessment_notes(&partner_id, &user_id).await)
        });
    }

    fn save(&mut self, ctx: &Context, api: &PartnerPortalApi, note: NewNote) {
        let api = api.clone();
        self.inbox.spawn(ctx, async move {
            UserNotesMsg::Saved(api.create_assessment_note(&note).await)
        });
    }

    /// Shows the window. Returns `false` once the user closed it.
    pub fn show(&mut self, ctx: &Context, api: &PartnerPortalApi, session: &AuthSession) -> bool {
        self.poll();
        let Some(partner) = session.current_partner() else {
            return false;
        };
        if self.stale {
            self.load(ctx, api, &partner.id);
        }

        let mut open = true;
        let mut submit = None;
        Window::new(format!("Notes - {}", self.user_name))
            .open(&mut open)
            .collapsible(false)
            .default_width(NOTES_WINDOW_WIDTH)
            .show(ctx, |ui| {
                if let Some(error) = &self.error {
                    ui.colored_label(Color32::RED, error);
                }

                ui.add(
                    TextEdit::multiline(&mut self.draft)
                        .hint_text("Write a note about this user")
                        .desired_rows(3),
                );
                let can_save = !self.draft.trim().is_empty() && !self.inbox.is_busy();
                if ui.add_enabled(can_save, Button::new("Add Note")).clicked() {
                    submit = Some(NewNote {
                        partner_id: partner.id.clone(),
                        user_id: self.user_id.clone(),
                        user_product_id: None,
                        content: self.draft.trim().to_owned(),
                        created_by: session.user_name().to_owned(),
                    });
                }
                ui.separator();

                if self.inbox.is_busy() {
                    ui.spinner();
                }
                ScrollArea::vertical()
                    .max_height(NOTES_LIST_HEIGHT)
                    .show(ui, |ui| render_groups(ui, &self.groups));
            });

        if let Some(note) = submit {
            self.save(ctx, api, note);
        }
        open
    }
}

fn render_groups(ui: &mut Ui, groups: &[NoteGroup]) {
    if groups.is_empty() {
        ui.weak("No notes yet");
        return;
    }
    for group in groups {
        ui.strong(group.heading());
        for note in &group.notes {
            ui.group(|ui| note_body(ui, note));
        }
        ui.add_space(6.0);
    }
}

fn note_body(ui: &mut Ui, note: &Note) {
    ui.label(&note.content);
    ui.horizontal(|ui| {
        if let Some(created) = note.created_at {
            ui.weak(created.format("%Y-%m-%d %H:%M").to_string());
        }
        if note.was_updated() {
            ui.weak("(edited)");
        }
    });
}

#[derive(Debug)]
enum AssessmentNotesMsg {
    Loaded(ApiResult<Vec<Note>>),
    Changed(ApiResult<()>),
}

/// Note being rewritten in place.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EditDraft {
    note_id: String,
    content: String,
}

#[derive(Debug)]
enum NoteCommand {
    Create(NewNote),
    Update(EditDraft),
    Delete(String),
}

/// Notes filed on one assignment: list, add, edit and delete.
#[derive(Debug)]
pub struct AssessmentNotesWindow {
    user_id: String,
    user_product_id: String,
    title: String,
    notes: Vec<Note>,
    draft: String,
    editing: Option<EditDraft>,
    error: Option<String>,
    stale: bool,
    inbox: Inbox<AssessmentNotesMsg>,
}

impl AssessmentNotesWindow {
    pub fn new(assignment: &AssignedProduct) -> Self {
        Self {
            user_id: assignment.user_id.clone(),
            user_product_id: assignment.notes_key().to_owned(),
            title: format!(
                "{} - {}",
                assignment.display_assessment(),
                assignment.display_user()
            ),
            notes: Vec::new(),
            draft: String::new(),
            editing: None,
            error: None,
            stale: true,
            inbox: Inbox::new(),
        }
    }

    pub fn user_product_id(&self) -> &str {
        &self.user_product_id
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    fn poll(&mut self) {
        for msg in self.inbox.drain() {
            match msg {
                AssessmentNotesMsg::Loaded(Ok(mut notes)) => {
                    notes.sort_by_key(|note| std::cmp::Reverse(note.created_at));
                    self.notes = notes;
                    self.error = None;
                }
                AssessmentNotesMsg::Changed(Ok(())) => {
                    self.draft.clear();
                    self.editing = None;
                    self.stale = true;
                }
                AssessmentNotesMsg::Loaded(Err(err)) | AssessmentNotesMsg::Changed(Err(err)) => {
                    log::warn!("Assessment notes for {} failed: {err}", self.user_product_id);
                    self.error = Some(err.user_message());
                }
            }
        }
    }

    fn load(&mut self, ctx: &Context, api: &PartnerPortalApi, partner_id: &str) {
        let api = api.clone();
        let partner_id = partner_id.to_owned();
        let user_product_id = self.user_product_id.clone();
        self.stale = false;
        self.inbox.spawn(ctx, async move {
            AssessmentNotesMsg::Loaded(api.assessment_notes(&partner_id, &user_product_id).await)
        });
    }

    fn run(&mut self, ctx: &Context, api: &PartnerPortalApi, session: &AuthSession, command: NoteCommand) {
        let Some(partner) = session.current_partner() else {
            return;
        };
        let api = api.clone();
        let partner_id = partner.id.clone();
        let user_name = session.user_name().to_owned();
        self.inbox.spawn(ctx, async move {
            let result = match command {
                NoteCommand::Create(note) => api.create_assessment_note(&note).await,
                NoteCommand::Update(edit) => {
                    api.update_assessment_note(&edit.note_id, &partner_id, &edit.content, &user_name)
                        .await
                }
                NoteCommand::Delete(note_id) => {
                    api.delete_assessment_note(&note_id, &partner_id).await
                }
            };
            AssessmentNotesMsg::Changed(result)
        });
    }

    /// Shows the window. Returns `false` once the user closed it.
    pub fn show(&mut self, ctx: &Context, api: &PartnerPortalApi, session: &AuthSession) -> bool {
        self.poll();
        let Some(partner) = session.current_partner() else {
            return false;
        };
        if self.stale {
            self.load(ctx, api, &partner.id);
        }

        let mut open = true;
        let mut command = None;
        let busy = self.inbox.is_busy();
        Window::new(format!("Notes - {}", self.title))
            .open(&mut open)
            .collapsible(false)
            .default_width(NOTES_WINDOW_WIDTH)
            .show(ctx, |ui| {
                if let Some(error) = &self.error {
                    ui.colored_label(Color32::RED, error);
                }

                ui.add(
                    TextEdit::multiline(&mut self.draft)
                        .hint_text("Add a note to this assessment")
                        .desired_rows(3),
                );
                let can_add = !self.draft.trim().is_empty() && !busy;
                if ui.add_enabled(can_add, Button::new("Add Note")).clicked() {
                    command = Some(NoteCommand::Create(NewNote {
                        partner_id: partner.id.clone(),
                        user_id: self.user_id.clone(),
                        user_product_id: Some(self.user_product_id.clone()),
                        content: self.draft.trim().to_owned(),
                        created_by: session.user_name().to_owned(),
                    }));
                }
                ui.separator();

                if busy {
                    ui.spinner();
                }
                ScrollArea::vertical()
                    .max_height(NOTES_LIST_HEIGHT)
                    .show(ui, |ui| {
                        if self.notes.is_empty() {
                            ui.weak("No notes yet");
                        }
                        for note in &self.notes {
                            if let Some(next) =
                                render_editable_note(ui, note, &mut self.editing, busy)
                            {
                                command = Some(next);
                            }
                        }
                    });
            });

        if let Some(command) = command {
            self.run(ctx, api, session, command);
        }
        open
    }
}

fn render_editable_note(
    ui: &mut Ui,
    note: &Note,
    editing: &mut Option<EditDraft>,
    busy: bool,
) -> Option<NoteCommand> {
    let mut command = None;
    let mut cancel = false;

    match editing.as_mut().filter(|edit| edit.note_id == note.id) {
        Some(edit) => {
            ui.group(|ui| {
                ui.add(TextEdit::multiline(&mut edit.content).desired_rows(2));
                ui.horizontal(|ui| {
                    let can_save = !edit.content.trim().is_empty() && !busy;
                    if ui.add_enabled(can_save, Button::new("Save")).clicked() {
                        command = Some(NoteCommand::Update(EditDraft {
                            note_id: edit.note_id.clone(),
                            content: edit.content.trim().to_owned(),
                        }));
                    }
                    cancel = ui.button("Cancel").clicked();
                });
            });
        }
        None => {
            let mut start_edit = false;
            ui.group(|ui| {
                note_body(ui, note);
                ui.horizontal(|ui| {
                    start_edit = ui.add_enabled(!busy, Button::new("Edit")).clicked();
                    if ui.add_enabled(!busy, Button::new("Delete")).clicked() {
                        command = Some(NoteCommand::Delete(note.id.clone()));
                    }
                });
            });
            if start_edit {
                *editing = Some(EditDraft {
                    note_id: note.id.clone(),
                    content: note.content.clone(),
                });
            }
        }
    }

    if cancel {
        *editing = None;
    }
    command
}
