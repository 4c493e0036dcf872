use adw::prelude::*;
use adw::Application;
use gtk4 as gtk;
use std::time::Duration;

use crate::api::client::AssistantClient;
use crate::api::AssistantBackend;
use crate::app::{AppConfig, DEFAULT_BASE_URL};

pub fn show_connect_window(app: &Application, config: AppConfig) {
    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("Smart Assistant")
        .default_width(420)
        .default_height(220)
        .resizable(false)
        .build();

    let toast_overlay = adw::ToastOverlay::new();

    // Root container
    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_margin_top(24);
    root.set_margin_bottom(24);
    root.set_margin_start(24);
    root.set_margin_end(24);

    let title = gtk::Label::new(Some("Connect to your assistant"));
    title.add_css_class("title-2");
    title.set_halign(gtk::Align::Start);
    root.append(&title);

    let server_entry = gtk::Entry::new();
    server_entry.set_placeholder_text(Some("Server URL (e.g. http://localhost:5000)"));
    server_entry.set_text(DEFAULT_BASE_URL);
    server_entry.set_hexpand(true);
    root.append(&server_entry);

    // Status label (small, muted)
    let status = gtk::Label::new(None);
    status.add_css_class("dim-label");
    status.set_halign(gtk::Align::Start);
    root.append(&status);

    let connect_btn = gtk::Button::with_label("Connect");
    connect_btn.add_css_class("suggested-action");
    connect_btn.set_halign(gtk::Align::End);
    root.append(&connect_btn);

    toast_overlay.set_child(Some(&root));
    let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    container.append(&adw::HeaderBar::new());
    container.append(&toast_overlay);
    window.set_content(Some(&container));

    let on_connect = {
        let app = app.clone();
        let window = window.clone();
        let overlay = toast_overlay.clone();
        let server_entry = server_entry.clone();
        move || {
            let url = crate::utils::normalize_url(&server_entry.text());
            if url.is_empty() {
                overlay.add_toast(adw::Toast::new("Please enter the assistant server URL."));
                return;
            }
            let client = match AssistantClient::new(&url, Duration::from_secs(5)) {
                Ok(client) => client,
                Err(e) => {
                    overlay.add_toast(adw::Toast::new(&format!("Invalid server URL: {e}")));
                    return;
                }
            };

            status.set_label("Connecting…");

            // get-name is cheap and always answers on a running assistant.
            let rx = crate::utils::run_async_to_main(async move {
                match client.get_name().await {
                    Ok(_) => "Connected",
                    Err(e) => {
                        log::warn!("assistant check failed: {e}");
                        "Saved (server unreachable)"
                    }
                }
            });

            let status_label = status.clone();
            let app2 = app.clone();
            let window2 = window.clone();
            let overlay2 = overlay.clone();
            let mut config = config.clone();
            rx.attach(None, move |message| {
                log::info!("server check: {url} - {message}");
                status_label.set_label(message);
                config.base_url = url.clone();
                if let Err(e) = config.save() {
                    overlay2.add_toast(adw::Toast::new(&format!("Failed to save settings: {}", e)));
                }
                crate::ui::main_window::show_main_window(&app2, config.clone());
                window2.close();
                glib::ControlFlow::Break
            });
        }
    };

    use std::rc::Rc;
    let on_connect: Rc<dyn Fn()> = Rc::new(on_connect);
    {
        let on_connect = on_connect.clone();
        connect_btn.connect_clicked(move |_| (on_connect)());
    }
    {
        let on_connect = on_connect.clone();
        server_entry.connect_activate(move |_| (on_connect)());
    }

    window.present();
}
