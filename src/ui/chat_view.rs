use gtk4::prelude::*;
use gtk4 as gtk;

use crate::controller::chat::{ChatMessage, Sender};

/// Transcript plus the input row. Owns no state beyond its widgets.
#[derive(Clone)]
pub struct ChatView {
    root: gtk::Box,
    messages_box: gtk::Box,
    scroller: gtk::ScrolledWindow,
    pub entry: gtk::Entry,
    pub send_btn: gtk::Button,
    pub mic_btn: gtk::Button,
}

impl ChatView {
    pub fn new() -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 6);
        root.set_margin_top(8);
        root.set_margin_bottom(8);
        root.set_margin_start(8);
        root.set_margin_end(8);

        let scroller = gtk::ScrolledWindow::builder()
            .vexpand(true)
            .hexpand(true)
            .build();
        let messages_box = gtk::Box::new(gtk::Orientation::Vertical, 6);
        scroller.set_child(Some(&messages_box));
        root.append(&scroller);

        // Input row
        let input_row = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        let entry = gtk::Entry::new();
        entry.set_hexpand(true);
        entry.set_placeholder_text(Some("Ask me anything…"));
        let mic_btn = gtk::Button::with_label("🎙️");
        mic_btn.set_tooltip_text(Some("Listen for voice command"));
        let send_btn = gtk::Button::with_label("Send");
        send_btn.add_css_class("suggested-action");
        input_row.append(&entry);
        input_row.append(&mic_btn);
        input_row.append(&send_btn);
        root.append(&input_row);

        Self { root, messages_box, scroller, entry, send_btn, mic_btn }
    }

    pub fn widget(&self) -> gtk::Widget {
        self.root.clone().upcast()
    }

    pub fn append(&self, message: &ChatMessage) {
        let lbl = gtk::Label::new(Some(&message.text));
        lbl.set_wrap(true);
        lbl.set_selectable(true);
        lbl.set_xalign(0.0);
        lbl.add_css_class("message");
        match message.sender {
            Sender::User => {
                lbl.set_halign(gtk::Align::End);
                lbl.add_css_class("user-message");
            }
            Sender::Assistant => {
                lbl.set_halign(gtk::Align::Start);
                lbl.add_css_class("assistant-message");
            }
        }
        self.messages_box.append(&lbl);

        // The new row has no allocation yet; scroll once layout has run.
        let scroller = self.scroller.clone();
        glib::idle_add_local_once(move || {
            let adj = scroller.vadjustment();
            adj.set_value(adj.upper());
        });
    }

    pub fn set_listening(&self, listening: bool) {
        if listening {
            self.mic_btn.add_css_class("listening");
            self.mic_btn.set_tooltip_text(Some("Listening... (click to stop)"));
        } else {
            self.mic_btn.remove_css_class("listening");
            self.mic_btn.set_tooltip_text(Some("Listen for voice command"));
        }
    }
}
