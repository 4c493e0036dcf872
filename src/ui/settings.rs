use adw::prelude::*;
use gtk4 as gtk;
use std::rc::Rc;

use crate::controller::chat::Sender;
use crate::controller::settings::{self, SaveNameOutcome};
use crate::ui::main_window::Session;

/// Header button opening the name / reset popover. The popover closes itself
/// on clicks outside it.
pub fn settings_button(session: &Rc<Session>) -> gtk::MenuButton {
    let content = gtk::Box::new(gtk::Orientation::Vertical, 8);
    content.set_margin_top(8);
    content.set_margin_bottom(8);
    content.set_margin_start(8);
    content.set_margin_end(8);

    let label = gtk::Label::new(Some("Your name"));
    label.add_css_class("heading");
    label.set_halign(gtk::Align::Start);
    content.append(&label);

    let name_entry = gtk::Entry::new();
    name_entry.set_placeholder_text(Some("What should I call you?"));
    content.append(&name_entry);

    let save_btn = gtk::Button::with_label("Save");
    save_btn.add_css_class("suggested-action");
    content.append(&save_btn);

    content.append(&gtk::Separator::new(gtk::Orientation::Horizontal));

    let reset_btn = gtk::Button::with_label("🗑️ Reset all data");
    reset_btn.add_css_class("destructive-action");
    content.append(&reset_btn);

    let popover = gtk::Popover::new();
    popover.set_child(Some(&content));

    let button = gtk::MenuButton::new();
    button.set_icon_name("emblem-system-symbolic");
    button.set_tooltip_text(Some("Settings"));
    button.set_popover(Some(&popover));

    {
        let name_entry = name_entry.clone();
        popover.connect_show(move |_| {
            name_entry.grab_focus();
        });
    }

    let on_save = {
        let session = session.clone();
        let popover = popover.clone();
        let name_entry = name_entry.clone();
        move || save_name(&session, &popover, name_entry.text().trim())
    };
    let on_save: Rc<dyn Fn()> = Rc::new(on_save);
    {
        let on_save = on_save.clone();
        save_btn.connect_clicked(move |_| (on_save)());
    }
    {
        let on_save = on_save.clone();
        name_entry.connect_activate(move |_| (on_save)());
    }

    {
        let session = session.clone();
        let popover = popover.clone();
        reset_btn.connect_clicked(move |_| {
            popover.popdown();
            confirm_reset(&session);
        });
    }

    button
}

fn save_name(session: &Rc<Session>, popover: &gtk::Popover, name: &str) {
    if name.is_empty() {
        session.toast(settings::NAME_REQUIRED);
        return;
    }
    let client = session.client.clone();
    let name = name.to_string();
    let rx = crate::utils::run_async_to_main(async move { settings::save_name(&client, &name).await });
    let session = session.clone();
    let popover = popover.clone();
    rx.attach(None, move |outcome| {
        match outcome {
            SaveNameOutcome::Saved(name) => {
                session.set_greeting(Some(&name));
                popover.popdown();
                session.say(Sender::Assistant, &SaveNameOutcome::welcome(&name));
            }
            SaveNameOutcome::Rejected(reason) => session.toast(&reason),
        }
        glib::ControlFlow::Break
    });
}

fn confirm_reset(session: &Rc<Session>) {
    let dialog = adw::MessageDialog::new(
        Some(&session.window),
        Some("Reset all data?"),
        Some(settings::RESET_CONFIRM),
    );
    dialog.add_responses(&[("cancel", "Cancel"), ("reset", "Reset")]);
    dialog.set_response_appearance("reset", adw::ResponseAppearance::Destructive);
    dialog.set_default_response(Some("cancel"));
    dialog.set_close_response("cancel");

    let session = session.clone();
    dialog.connect_response(None, move |_, response| {
        if response != "reset" {
            session.say(Sender::Assistant, settings::RESET_CANCELLED);
            return;
        }
        let client = session.client.clone();
        let rx = crate::utils::run_async_to_main(async move { settings::reset_all(&client).await });
        let session = session.clone();
        rx.attach(None, move |outcome| {
            session.say(Sender::Assistant, &outcome.message);
            if outcome.refresh {
                session.refresh_sidebar(false);
            }
            glib::ControlFlow::Break
        });
    });
    dialog.present();
}
