use gtk4::prelude::*;
use gtk4 as gtk;

use crate::controller::sidebar::{format_total, Panel, PanelUpdate, PanelView, TotalView};

const REFRESH_LABEL: &str = "🔄 Refresh";

#[derive(Clone)]
pub struct Sidebar {
    root: gtk::Box,
    reminders: gtk::Box,
    expenses: gtk::Box,
    memories: gtk::Box,
    contacts: gtk::Box,
    total_row: gtk::Label,
    pub refresh_btn: gtk::Button,
}

fn section(root: &gtk::Box, panel: Panel) -> gtk::Box {
    let title = gtk::Label::new(Some(panel.title()));
    title.add_css_class("heading");
    title.set_halign(gtk::Align::Start);
    title.set_margin_top(8);
    root.append(&title);

    let list = gtk::Box::new(gtk::Orientation::Vertical, 4);
    root.append(&list);
    list
}

impl Sidebar {
    pub fn new() -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 6);
        root.set_margin_top(8);
        root.set_margin_bottom(8);
        root.set_margin_start(8);
        root.set_margin_end(8);
        root.set_width_request(260);

        let refresh_btn = gtk::Button::with_label(REFRESH_LABEL);
        refresh_btn.add_css_class("refresh-btn");
        root.append(&refresh_btn);

        let total_row = gtk::Label::new(None);
        total_row.set_halign(gtk::Align::Start);
        total_row.add_css_class("expense-total");
        total_row.set_visible(false);

        // Sections appear in refresh order; the total sits under expenses.
        let [reminders, expenses, memories, contacts] = Panel::ALL.map(|panel| {
            let list = section(&root, panel);
            if panel == Panel::Expenses {
                root.append(&total_row);
            }
            list
        });

        Self { root, reminders, expenses, memories, contacts, total_row, refresh_btn }
    }

    pub fn widget(&self) -> gtk::Widget {
        let scroller = gtk::ScrolledWindow::builder()
            .hscrollbar_policy(gtk::PolicyType::Never)
            .vexpand(true)
            .build();
        scroller.set_child(Some(&self.root));
        scroller.upcast()
    }

    fn list(&self, panel: Panel) -> &gtk::Box {
        match panel {
            Panel::Reminders => &self.reminders,
            Panel::Expenses => &self.expenses,
            Panel::Memories => &self.memories,
            Panel::Contacts => &self.contacts,
        }
    }

    pub fn apply(&self, update: &PanelUpdate) {
        let list = self.list(update.panel);
        while let Some(child) = list.first_child() {
            list.remove(&child);
        }
        match &update.view {
            PanelView::Placeholder(text) => {
                let lbl = gtk::Label::new(Some(*text));
                lbl.add_css_class("dim-label");
                lbl.add_css_class("caption");
                lbl.set_halign(gtk::Align::Start);
                list.append(&lbl);
            }
            PanelView::Rows(rows) => {
                for row in rows {
                    let item = gtk::Box::new(gtk::Orientation::Vertical, 2);
                    item.add_css_class("item");
                    if let Some(title) = &row.title {
                        let lbl = gtk::Label::new(Some(title));
                        lbl.add_css_class("heading");
                        lbl.set_halign(gtk::Align::Start);
                        lbl.set_wrap(true);
                        item.append(&lbl);
                    }
                    let detail = gtk::Label::new(Some(&row.detail));
                    detail.add_css_class("caption");
                    detail.set_halign(gtk::Align::Start);
                    detail.set_wrap(true);
                    item.append(&detail);
                    list.append(&item);
                }
            }
        }
        match update.total {
            TotalView::Show(total) => {
                self.total_row.set_label(&format!("Total: ₹{}", format_total(total)));
                self.total_row.set_visible(true);
            }
            TotalView::Hide => self.total_row.set_visible(false),
            TotalView::Keep => {}
        }
    }

    pub fn set_loading(&self, loading: bool) {
        self.refresh_btn.set_label(if loading { "⏳ Loading..." } else { REFRESH_LABEL });
        self.refresh_btn.set_sensitive(!loading);
    }
}
