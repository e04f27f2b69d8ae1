//! Element locators for the Kanban board.
//!
//! Semantic queries ("column by index", "card by position", "checkbox in
//! modal") are compiled to JavaScript expressions evaluated in the page.
//! The live application exposes no test ids, so the structural contract is
//! encoded here and only here:
//!
//! - columns are `section[data-dragscroll]` elements containing an `h2`
//!   heading (name plus optional "(count)" suffix);
//! - cards are `article.group` with an `h3` title and a `p.text-xs`
//!   subtask summary;
//! - the card modal is a `div[data-no-dragscroll]` overlay whose next
//!   sibling is the content container, ready once it holds an `h4`;
//! - modal subtasks are `label[for]` elements wrapping a checkbox and a
//!   text span;
//! - the status dropdown is the `div[tabindex="1"]` in the modal holding a
//!   disabled input; its options are visible `div.p-4` elements;
//! - the options menu is the `div[tabindex="1"]` with an `svg` and no
//!   disabled input; "Delete Task" is a `p.text-red`, confirmed by a red
//!   "Delete" button.
//!
//! Interactive locators resolve to a viewport center point (after scrolling
//! the element into view) so the click can be dispatched as a trusted CDP
//! input event rather than `el.click()`.

/// Shared helpers prepended to every compiled expression.
const PRELUDE: &str = r#"
const columns = Array.from(document.querySelectorAll("section[data-dragscroll]"))
    .filter((s) => s.querySelector("h2"));
const isVisible = (el) => {
    const r = el.getBoundingClientRect();
    return r.width > 0 && r.height > 0 && getComputedStyle(el).visibility !== "hidden";
};
const center = (el) => {
    if (!el) return { found: false };
    el.scrollIntoView({ block: "center", inline: "center" });
    const r = el.getBoundingClientRect();
    if (r.width <= 0 || r.height <= 0) return { found: false };
    return { found: true, x: r.x + r.width / 2, y: r.y + r.height / 2 };
};
const modalContainer = () => {
    const overlay = document.querySelector("div[data-no-dragscroll]");
    return overlay ? overlay.nextElementSibling : null;
};
const subtaskLabels = (container) =>
    Array.from(container.querySelectorAll("label[for]"))
        .filter((l) => l.querySelector("input[type=checkbox]"));
const subtaskByText = (container, target) =>
    subtaskLabels(container).find((l) => {
        const span = l.querySelector("span");
        return (span ? span.textContent : l.textContent).trim() === target;
    });
"#;

/// Wrap a body in an IIFE with the shared prelude
fn wrap(body: &str) -> String {
    format!("(() => {{\n{PRELUDE}\n{body}\n}})()")
}

/// Embed a Rust string as a JS string literal
fn js_str(s: &str) -> String {
    format!("{s:?}")
}

/// Snapshot the whole board as JSON (columns, cards, subtask summaries)
#[must_use]
pub fn board_snapshot() -> String {
    wrap(r#"return {
    columns: columns.map((col) => ({
        heading: (col.querySelector("h2").textContent || "").trim(),
        cards: Array.from(col.querySelectorAll("article.group")).map((card) => {
            const title = card.querySelector("h3");
            const sub = card.querySelector("p.text-xs");
            const r = card.getBoundingClientRect();
            return {
                title: title ? title.textContent.trim() : "",
                subtask_text: sub ? sub.textContent.trim() : "",
                visible: r.width > 0 && r.height > 0,
            };
        }),
    })),
};"#)
}

/// Snapshot the open modal's checkbox rows; `present` is false when no
/// modal is attached. (Locators return sentinel objects rather than null
/// so the CDP value channel always carries JSON.)
#[must_use]
pub fn modal_snapshot() -> String {
    wrap(r#"const container = modalContainer();
if (!container) return { present: false, subtasks: [] };
return {
    present: true,
    subtasks: subtaskLabels(container).map((l) => {
        const box = l.querySelector("input[type=checkbox]");
        const span = l.querySelector("span");
        const cls = box.getAttribute("class") || "";
        const r = box.getBoundingClientRect();
        return {
            label: (span ? span.textContent : l.textContent).trim(),
            checked: box.checked,
            visible: r.width > 0 && r.height > 0 && !cls.includes("hidden"),
            label_classes: span ? (span.getAttribute("class") || "") : "",
            text_decoration: span ? getComputedStyle(span).textDecorationLine : "",
        };
    }),
};"#)
}

/// Column headings are attached (board has rendered)
#[must_use]
pub fn board_ready() -> String {
    wrap("return columns.length > 0;")
}

/// At least one card is attached anywhere on the board
#[must_use]
pub fn cards_present() -> String {
    wrap(r#"return document.querySelectorAll("section[data-dragscroll] article.group").length > 0;"#)
}

/// Overlay and content marker are both attached
#[must_use]
pub fn modal_open() -> String {
    wrap(r#"const overlay = document.querySelector("div[data-no-dragscroll]");
if (!overlay) return false;
const container = overlay.nextElementSibling;
return !!(container && container.querySelector("h4"));"#)
}

/// Overlay has detached (or collapsed to zero size)
#[must_use]
pub fn modal_closed() -> String {
    wrap(r#"const overlay = document.querySelector("div[data-no-dragscroll]");
if (!overlay) return true;
const r = overlay.getBoundingClientRect();
return r.width === 0 || r.height === 0;"#)
}

/// Center of the card at (column index, card index), both in document order
#[must_use]
pub fn card_center(column_index: usize, card_index: usize) -> String {
    wrap(&format!(
        "const col = columns[{column_index}];\n\
         if (!col) return {{ found: false }};\n\
         return center(col.querySelectorAll(\"article.group\")[{card_index}]);"
    ))
}

/// A point just inside the overlay's top-left corner, for dismissal clicks
#[must_use]
pub fn overlay_point(dx: u32, dy: u32) -> String {
    wrap(&format!(
        "const overlay = document.querySelector(\"div[data-no-dragscroll]\");\n\
         if (!overlay) return {{ found: false }};\n\
         const r = overlay.getBoundingClientRect();\n\
         return {{ found: true, x: r.x + {dx}, y: r.y + {dy} }};"
    ))
}

/// Center of the checkbox label whose text matches.
///
/// The toggle target is addressed by label text, the same key
/// [`subtask_checked`] reads back, so checked rows ahead of it never
/// shift the target.
#[must_use]
pub fn subtask_label_center(label: &str) -> String {
    wrap(&format!(
        "const container = modalContainer();\n\
         if (!container) return {{ found: false }};\n\
         return center(subtaskByText(container, {}.trim()));",
        js_str(label)
    ))
}

/// Center of the "Current Status" dropdown trigger inside the modal
#[must_use]
pub fn status_dropdown_center() -> String {
    wrap(r#"const container = modalContainer();
if (!container) return { found: false };
const dropdown = Array.from(container.querySelectorAll('div[tabindex="1"]'))
    .find((d) => d.querySelector("input[disabled]"));
return center(dropdown);"#)
}

/// Some dropdown option has become visible (options render via focus CSS)
#[must_use]
pub fn status_options_visible() -> String {
    wrap(r#"return Array.from(document.querySelectorAll("div.p-4"))
    .some((opt) => isVisible(opt) && opt.offsetParent !== null);"#)
}

/// Center of the dropdown option whose text equals the column name
/// (case-insensitive, whitespace-trimmed)
#[must_use]
pub fn status_option_center(column_name: &str) -> String {
    wrap(&format!(
        "const target = {}.trim().toLowerCase();\n\
         const opt = Array.from(document.querySelectorAll(\"div.p-4\"))\n\
             .find((o) => isVisible(o) && o.offsetParent !== null\n\
                 && o.textContent.trim().toLowerCase() === target);\n\
         return center(opt);",
        js_str(column_name)
    ))
}

/// Center of the three-dots options trigger inside the modal
#[must_use]
pub fn menu_button_center() -> String {
    wrap(r#"const container = modalContainer();
if (!container) return { found: false };
const button = Array.from(container.querySelectorAll('div[tabindex="1"]'))
    .find((d) => d.querySelector("svg") && !d.querySelector("input[disabled]") && isVisible(d));
return center(button);"#)
}

/// Center of the "Delete Task" menu option
#[must_use]
pub fn delete_option_center() -> String {
    wrap(r#"const option = Array.from(document.querySelectorAll("p.text-red"))
    .find((p) => /delete\s*task/i.test(p.textContent || "") && isVisible(p));
return center(option);"#)
}

/// The "Delete this task" confirmation dialog has rendered
#[must_use]
pub fn confirm_dialog_visible() -> String {
    wrap(r#"return /delete this task/i.test(document.body ? document.body.textContent : "");"#)
}

/// Center of the confirming "Delete" button; falls back to the red button
/// when the text match fails
#[must_use]
pub fn confirm_delete_center() -> String {
    wrap(r#"const buttons = Array.from(document.querySelectorAll("button"));
const byText = buttons.find((b) => (b.textContent || "").trim().toLowerCase() === "delete" && isVisible(b));
if (byText) return center(byText);
const red = buttons.find((b) => (b.getAttribute("class") || "").includes("bg-red") && isVisible(b));
return center(red);"#)
}

/// The checkbox whose label text matches has latched to checked
#[must_use]
pub fn subtask_checked(label: &str) -> String {
    wrap(&format!(
        "const container = modalContainer();\n\
         if (!container) return false;\n\
         const label = subtaskByText(container, {}.trim());\n\
         if (!label) return false;\n\
         return label.querySelector(\"input[type=checkbox]\").checked;",
        js_str(label)
    ))
}
