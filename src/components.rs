// In many cases, we need to do a let binding to satisfy the borrow checker
// and for some reason, clippy identifies those as unnecessary. Maybe there
// are and clippy knows more than me, maybe not.
#![allow(clippy::let_and_return)]

use super::{
    config::{HTMX_SRC, RELOAD_EVENT},
    errors::FAILURE_NOTICE,
    models::{self, display_stamp, Importance, NoteDraft, NoteId, Status},
    query::{QueryState, SortDirection, SortKey},
};
use ammonia::{clean, clean_text};
use std::fmt::Write;

const STYLE: &str = r#"
    body { font-family: sans-serif; margin: 2rem; }
    .controls { display: flex; flex-wrap: wrap; gap: 1rem; align-items: center; margin-bottom: 1rem; }
    .note { border-left: 6px solid #ccc; padding: 0.5rem 1rem; margin: 0.5rem 0; background: #fafafa; }
    .note.high { border-color: #d9534f; }
    .note.medium { border-color: #f0ad4e; }
    .note.low { border-color: #5cb85c; }
    .time { color: #777; font-size: 0.8rem; }
    .status.active { color: #0275d8; }
    .status.completed { color: #5cb85c; }
    .status.cancelled { color: #999; text-decoration: line-through; }
    .modal { position: fixed; inset: 0; display: flex; align-items: center; justify-content: center; background: rgba(0, 0, 0, 0.4); }
    .modal-content { background: white; padding: 1.5rem; border-radius: 4px; min-width: 20rem; }
    .close { float: right; cursor: pointer; }
"#;

pub trait Component {
    /// Render the component to a HTML string. By convention, the
    /// implementation should sanitize all string properties at render-time
    fn render(&self) -> String;
}

/// Path segment for a note id inside an `hx-*` url.
fn id_segment(id: &NoteId) -> String {
    urlencoding::encode(id.as_str()).into_owned()
}

fn selected(on: bool) -> &'static str {
    if on {
        "selected"
    } else {
        ""
    }
}

pub struct Page<'a> {
    pub title: &'a str,
    pub children: Box<dyn Component + 'a>,
}

impl Component for Page<'_> {
    fn render(&self) -> String {
        format!(
            r#"
            <html>
                <head>
                    <meta name="viewport" content="width=device-width, initial-scale=1.0"></meta>
                    <title>{title}</title>
                    <style>
                        {STYLE}
                    </style>
                </head>
                <body>
                    {body_html}
                    <script src="{HTMX_SRC}"></script>
                    <script>
                        document.body.addEventListener("htmx:responseError", (e) => {{
                            alert(e.detail.xhr.responseText || "{FAILURE_NOTICE}");
                        }});
                        document.body.addEventListener("htmx:sendError", () => {{
                            alert("{FAILURE_NOTICE}");
                        }});
                    </script>
                </body>
            </html>
            "#,
            title = clean(self.title),
            body_html = self.children.render()
        )
    }
}

/// The whole widget: list controls, the list container, and an empty slot
/// the editor and confirmation modals are swapped into.
pub struct NotesHome<'a> {
    pub query: &'a QueryState,
}
impl Component for NotesHome<'_> {
    fn render(&self) -> String {
        let controls = Controls { query: self.query }.render();
        format!(
            r##"
            <main>
                <h1>Notes</h1>
                <button id="add-note" hx-get="/notes/new" hx-target="#modal">Add note</button>
                {controls}
                <div
                    id="notes-list"
                    hx-get="/notes"
                    hx-include="#controls"
                    hx-trigger="load, {RELOAD_EVENT} from:body"
                >
                    Loading your notes...
                </div>
                <div id="modal"></div>
            </main>
            "##
        )
    }
}

pub struct Controls<'a> {
    pub query: &'a QueryState,
}
impl Component for Controls<'_> {
    fn render(&self) -> String {
        let query = self.query;
        let sort_options =
            SortKey::ALL.iter().fold(String::new(), |mut acc, key| {
                let _ = write!(
                    acc,
                    r#"<option {sel} value="{value}">{name}</option>"#,
                    sel = selected(*key == query.sort_key),
                    value = key.get_form_value(),
                    name = key.get_display_name(),
                );
                acc
            });
        let asc_selected = selected(query.sort_direction == SortDirection::Asc);
        let desc_selected =
            selected(query.sort_direction == SortDirection::Desc);
        let any_selected = selected(query.importance.is_none());
        let importance_options =
            Importance::ALL.iter().fold(String::new(), |mut acc, i| {
                let _ = write!(
                    acc,
                    r#"<option {sel} value="{rank}">{name}</option>"#,
                    sel = selected(query.importance == Some(*i)),
                    rank = i.rank(),
                    name = i.get_display_name(),
                );
                acc
            });
        let status_boxes =
            Status::ALL.iter().fold(String::new(), |mut acc, s| {
                let checked = if query.statuses.contains(s) {
                    "checked"
                } else {
                    ""
                };
                let _ = write!(
                    acc,
                    r#"
                    <label>
                        <input type="checkbox" name="status_{class}" {checked} />
                        {name}
                    </label>
                    "#,
                    class = s.css_class(),
                    name = s.get_display_name(),
                );
                acc
            });
        let search = clean_text(&query.search);
        format!(
            r##"
            <form
                id="controls"
                class="controls"
                hx-get="/notes"
                hx-target="#notes-list"
                hx-trigger="change"
                onsubmit="return false"
            >
                <label>
                    Sort by
                    <select id="sort-by" name="sort_by">{sort_options}</select>
                </label>
                <select id="sort-direction" name="sort_direction">
                    <option {asc_selected} value="asc">Ascending</option>
                    <option {desc_selected} value="desc">Descending</option>
                </select>
                <label>
                    Importance
                    <select id="filter-importance" name="importance">
                        <option {any_selected} value="0">All</option>
                        {importance_options}
                    </select>
                </label>
                <fieldset>
                    {status_boxes}
                </fieldset>
                <input
                    id="search"
                    name="search"
                    type="search"
                    placeholder="Search notes"
                    value="{search}"
                    hx-get="/notes"
                    hx-include="#controls"
                    hx-target="#notes-list"
                    hx-trigger="input changed delay:200ms, search"
                />
            </form>
            "##
        )
    }
}

pub struct NoteRow<'a> {
    pub note: &'a models::Note,
}
impl Component for NoteRow<'_> {
    fn render(&self) -> String {
        let note = self.note;
        let id = id_segment(&note.id);
        let importance_class = note.importance.css_class();
        let status_class = note.status.css_class();
        let status_name = note.status.get_display_name();
        let text = clean_text(&note.text);
        let time = clean_text(&display_stamp(&note.time));
        format!(
            r##"
            <div class="note {importance_class}">
                <div>{text}</div>
                <div class="time">Created: {time}</div>
                <div class="status {status_class}">{status_name}</div>
                <button hx-get="/notes/{id}/edit" hx-target="#modal">Edit</button>
                <button hx-get="/notes/{id}/delete" hx-target="#modal">Delete</button>
            </div>
            "##
        )
    }
}

pub struct NoteList<'a> {
    pub notes: &'a [models::Note],
}
impl Component for NoteList<'_> {
    fn render(&self) -> String {
        if self.notes.is_empty() {
            return "<p>No notes to show</p>".into();
        }
        self.notes.iter().fold(String::new(), |mut acc, note| {
            acc.push_str(&NoteRow { note }.render());
            acc
        })
    }
}

/// Backdrop plus dialog box. Clicking the backdrop itself closes it.
struct Modal<'a> {
    children: Box<dyn Component + 'a>,
}
impl Component for Modal<'_> {
    fn render(&self) -> String {
        let children = self.children.render();
        format!(
            r##"
            <div
                id="modal-backdrop"
                class="modal"
                hx-get="/modal/close"
                hx-target="#modal"
                hx-trigger="click[target.id=='modal-backdrop']"
            >
                <div class="modal-content">
                    <span class="close" hx-get="/modal/close" hx-target="#modal">&times;</span>
                    {children}
                </div>
            </div>
            "##
        )
    }
}

/// Create or edit form. With `id` set, saving updates that note.
pub struct NoteEditor<'a> {
    pub id: Option<&'a NoteId>,
    pub draft: &'a NoteDraft,
}
impl Component for NoteEditor<'_> {
    fn render(&self) -> String {
        let (title, id_input) = match self.id {
            Some(id) => (
                "Edit note",
                format!(
                    r#"<input type="hidden" name="id" value="{}" />"#,
                    clean_text(id.as_str())
                ),
            ),
            None => ("New note", "".to_string()),
        };
        let text = clean_text(&self.draft.text);
        let importance_options =
            Importance::ALL.iter().fold(String::new(), |mut acc, i| {
                let _ = write!(
                    acc,
                    r#"<option {sel} value="{rank}">{name}</option>"#,
                    sel = selected(*i == self.draft.importance),
                    rank = i.rank(),
                    name = i.get_display_name(),
                );
                acc
            });
        let status_options =
            Status::ALL.iter().fold(String::new(), |mut acc, s| {
                let _ = write!(
                    acc,
                    r#"<option {sel} value="{rank}">{name}</option>"#,
                    sel = selected(*s == self.draft.status),
                    rank = s.rank(),
                    name = s.get_display_name(),
                );
                acc
            });
        let form = format!(
            r##"
            <h2 id="modal-title">{title}</h2>
            <form hx-post="/notes" hx-target="#modal">
                {id_input}
                <textarea id="note-text" name="text" rows="4">{text}</textarea>
                <label>
                    Importance
                    <select id="note-importance" name="importance">{importance_options}</select>
                </label>
                <label>
                    Status
                    <select id="note-status" name="status">{status_options}</select>
                </label>
                <button id="save-note">Save</button>
                <button
                    id="cancel-note"
                    type="button"
                    hx-get="/modal/close"
                    hx-target="#modal"
                >Cancel</button>
            </form>
            "##
        );
        let result = Modal {
            children: Box::new(Html(form)),
        }
        .render();

        result
    }
}

pub struct ConfirmDelete<'a> {
    pub note: &'a models::Note,
}
impl Component for ConfirmDelete<'_> {
    fn render(&self) -> String {
        let id = id_segment(&self.note.id);
        let text = clean_text(&self.note.text);
        let prompt = format!(
            r##"
            <p>Delete this note?</p>
            <blockquote>{text}</blockquote>
            <button id="confirm-yes" hx-delete="/notes/{id}" hx-target="#modal">Yes</button>
            <button id="confirm-no" hx-get="/modal/close" hx-target="#modal">No</button>
            "##
        );
        let result = Modal {
            children: Box::new(Html(prompt)),
        }
        .render();

        result
    }
}

/// Already-rendered markup.
struct Html(String);
impl Component for Html {
    fn render(&self) -> String {
        self.0.clone()
    }
}
