//! Fixture of the protected branches settings page.
//!
//! Models the form as it behaves in a browser: the selects open hidden
//! dropdowns, an option click records the choice and closes its dropdown,
//! and "Protect" appends a row to the list.

#![allow(dead_code, clippy::expect_used)]

use pagebind::{ElementName, FixtureDom, NodeId, Selector, SelectorConvention};

/// Attribute a select stores its chosen option in
pub const CHOSEN: &str = "data-chosen";

/// Push access a new row gets when none was chosen
pub const DEFAULT_PUSH_ACCESS: &str = "Masters";

/// Push access options offered by the form
pub const PUSH_OPTIONS: &[&str] = &["No one", "Developers + Masters", "Masters"];

/// Node ids of the interesting parts of the page
#[derive(Debug, Clone, Copy)]
pub struct SettingsPage {
    pub branch_select: NodeId,
    pub branch_dropdown: NodeId,
    pub push_select: NodeId,
    pub push_dropdown: NodeId,
    pub protect_button: NodeId,
    pub list: NodeId,
}

/// Tag `id` so that `name` resolves to it under `convention`
pub fn mark(dom: &mut FixtureDom, id: NodeId, convention: &SelectorConvention, name: &str) {
    let name = ElementName::new(name).expect("fixture element names are valid");
    match convention.derive(&name) {
        Selector::Attribute { name, value } => dom.set_attribute(id, &name, &value),
        Selector::Class(class) => dom.add_class(id, &class),
        Selector::Text(_) => panic!("conventions never derive text selectors"),
    }
}

fn dropdown(
    dom: &mut FixtureDom,
    convention: &SelectorConvention,
    select_name: &str,
    dropdown_name: &str,
    label: &str,
    options: &[&str],
) -> (NodeId, NodeId) {
    let body = dom.root();
    let wrapper = dom.append(body, "div");
    let select = dom.element(wrapper, "button", &[], label);
    mark(dom, select, convention, select_name);

    let menu = dom.element(wrapper, "div", &[("class", "dropdown-menu")], "");
    mark(dom, menu, convention, dropdown_name);
    dom.set_visible(menu, false);
    dom.on_click(select, move |dom, _| dom.set_visible(menu, true));

    for option in options {
        let item = dom.element(menu, "a", &[("href", "#")], option);
        let value = (*option).to_string();
        dom.on_click(item, move |dom, _| {
            dom.set_attribute(select, CHOSEN, &value);
            dom.set_visible(menu, false);
        });
    }

    (select, menu)
}

/// Append a row to the protected branches list
pub fn add_row(
    dom: &mut FixtureDom,
    convention: &SelectorConvention,
    list: NodeId,
    branch: &str,
    push_access: &str,
) -> NodeId {
    let row = dom.element(list, "tr", &[("class", "js-protected-branch-edit-form")], "");
    let name = dom.element(row, "span", &[("class", "ref-name")], branch);
    mark(dom, name, convention, "protected_branch_name");
    let push = dom.element(row, "span", &[], push_access);
    mark(dom, push, convention, "allowed_to_push");
    row
}

/// Build the page with `branches` in the branch dropdown and `existing` rows in the list
pub fn settings_page(
    convention: &SelectorConvention,
    branches: &[&str],
    existing: &[(&str, &str)],
) -> (FixtureDom, SettingsPage) {
    let mut dom = FixtureDom::new();

    let (branch_select, branch_dropdown) = dropdown(
        &mut dom,
        convention,
        "protected_branch_select",
        "protected_branch_dropdown",
        "Select branch",
        branches,
    );
    let (push_select, push_dropdown) = dropdown(
        &mut dom,
        convention,
        "allowed_to_push_select",
        "allowed_to_push_dropdown",
        "Select",
        PUSH_OPTIONS,
    );

    let body = dom.root();
    let protect_button = dom.element(body, "button", &[("type", "submit")], "Protect");

    let list = dom.element(body, "table", &[], "");
    mark(&mut dom, list, convention, "protected_branches_list");
    for (branch, push_access) in existing {
        let _ = add_row(&mut dom, convention, list, branch, push_access);
    }

    let row_convention = convention.clone();
    dom.on_click(protect_button, move |dom, _| {
        let Some(branch) = dom.attribute(branch_select, CHOSEN).map(str::to_string) else {
            return;
        };
        let push_access = dom
            .attribute(push_select, CHOSEN)
            .unwrap_or(DEFAULT_PUSH_ACCESS)
            .to_string();
        let _ = add_row(dom, &row_convention, list, &branch, &push_access);
    });

    let page = SettingsPage {
        branch_select,
        branch_dropdown,
        push_select,
        push_dropdown,
        protect_button,
        list,
    };
    (dom, page)
}
