use adw::prelude::*;
use adw::Application;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::api::client::AssistantClient;
use crate::app::AppConfig;
use crate::controller::chat::{self, Sender, Transcript};
use crate::controller::settings;
use crate::controller::sidebar::{self, PanelUpdate};
use crate::controller::theme::Theme;
use crate::controller::voice::{CaptureSlot, VoiceController, VoiceEffect, VoiceEvent};
use crate::speech::{Capture, Recognizer, Synthesizer};
use crate::storage::Preferences;
use crate::ui::chat_view::ChatView;
use crate::ui::sidebar::Sidebar;

const STYLE: &str = r#"
.message { padding: 6px 10px; border-radius: 10px; }
.user-message { background: alpha(@accent_bg_color, 0.25); }
.assistant-message { background: alpha(@card_bg_color, 0.9); }
.listening { background: @error_bg_color; color: @error_fg_color; }
.item { padding: 4px 0; }
.expense-total { font-weight: bold; }
"#;

enum SidebarMsg {
    Update(PanelUpdate),
    Done,
}

/// Per-window state. Lives on the GTK main thread for as long as the window.
pub struct Session {
    pub(crate) client: AssistantClient,
    pub(crate) window: adw::ApplicationWindow,
    pub(crate) overlay: adw::ToastOverlay,
    greeting: gtk4::Label,
    chat: ChatView,
    sidebar: Sidebar,
    voice_btn: gtk4::Button,
    theme_btn: gtk4::Button,
    transcript: RefCell<Transcript>,
    voice: RefCell<VoiceController>,
    recognizer: Option<Recognizer>,
    synthesizer: RefCell<Option<Synthesizer>>,
    capture: RefCell<CaptureSlot<Capture>>,
    prefs: Option<Preferences>,
    theme: Cell<Theme>,
}

impl Session {
    pub(crate) fn toast(&self, text: &str) {
        self.overlay.add_toast(adw::Toast::new(text));
    }

    /// Appends to the transcript; assistant lines are also spoken in voice mode.
    pub(crate) fn say(&self, sender: Sender, text: &str) {
        let message = self.transcript.borrow_mut().push(sender, text).clone();
        self.chat.append(&message);
        if sender == Sender::Assistant && self.voice.borrow().speaks_replies() {
            match self.synthesizer.borrow_mut().as_mut() {
                Some(synth) => {
                    if let Err(e) = synth.speak(text) {
                        log::warn!("{e}");
                    }
                }
                None => log::warn!("text-to-speech not available"),
            }
        }
    }

    fn send(self: &Rc<Self>, input: &str) {
        let Some(message) = self.transcript.borrow_mut().submit(input) else {
            return;
        };
        if let Some(last) = self.transcript.borrow().messages().last() {
            self.chat.append(last);
        }
        self.chat.entry.set_text("");
        self.chat.entry.grab_focus();

        let client = self.client.clone();
        let rx = crate::utils::run_async_to_main(async move { chat::exchange(&client, &message).await });
        let session = self.clone();
        rx.attach(None, move |outcome| {
            session.say(Sender::Assistant, &outcome.reply);
            if let Some(delay) = outcome.refresh_after {
                session.schedule_refresh(delay);
            }
            glib::ControlFlow::Break
        });
    }

    fn schedule_refresh(self: &Rc<Self>, delay: Duration) {
        let session = self.clone();
        glib::timeout_add_local_once(delay, move || session.refresh_sidebar(false));
    }

    /// `show_progress` puts the refresh button into its loading state until
    /// all four panels are in.
    pub(crate) fn refresh_sidebar(self: &Rc<Self>, show_progress: bool) {
        if show_progress {
            self.sidebar.set_loading(true);
        }
        let client = self.client.clone();
        let (tx, rx) = crate::utils::glib_channel::<SidebarMsg>();
        crate::utils::spawn_async(async move {
            let panel_tx = tx.clone();
            sidebar::refresh_sidebar(&client, move |update| {
                let _ = panel_tx.send(SidebarMsg::Update(update));
            })
            .await;
            let _ = tx.send(SidebarMsg::Done);
        });

        let view = self.sidebar.clone();
        rx.attach(None, move |msg| match msg {
            SidebarMsg::Update(update) => {
                view.apply(&update);
                glib::ControlFlow::Continue
            }
            SidebarMsg::Done => {
                if show_progress {
                    view.set_loading(false);
                }
                glib::ControlFlow::Break
            }
        });
    }

    fn voice_event(self: &Rc<Self>, event: VoiceEvent) {
        let effects = self.voice.borrow_mut().handle(event);
        for effect in effects {
            match effect {
                VoiceEffect::Notice(text) => self.say(Sender::Assistant, text),
                VoiceEffect::ClearInput => self.chat.entry.set_text(""),
                VoiceEffect::StartCapture => self.start_capture(),
                VoiceEffect::StopCapture => {
                    if let Some(capture) = self.capture.borrow_mut().current_mut() {
                        capture.stop();
                    }
                }
                VoiceEffect::Submit(text) => self.send(&text),
            }
        }
        self.sync_voice_widgets();
    }

    fn start_capture(self: &Rc<Self>) {
        let Some(recognizer) = &self.recognizer else {
            return;
        };
        let (tx, rx) = crate::utils::glib_channel::<VoiceEvent>();
        match recognizer.start(move |event| {
            let _ = tx.send(event);
        }) {
            Ok(capture) => {
                let generation = self.capture.borrow_mut().install(capture);
                let session = self.clone();
                rx.attach(None, move |event| {
                    let ended = event == VoiceEvent::Ended;
                    if !session.capture.borrow().owns(generation) {
                        log::debug!("dropping {event:?} from a replaced capture");
                    } else {
                        if ended {
                            session.capture.borrow_mut().release(generation);
                        }
                        session.voice_event(event);
                    }
                    if ended { glib::ControlFlow::Break } else { glib::ControlFlow::Continue }
                });
            }
            Err(e) => {
                self.voice_event(VoiceEvent::Failed(e.to_string()));
                self.voice_event(VoiceEvent::Ended);
            }
        }
    }

    fn sync_voice_widgets(&self) {
        let voice = self.voice.borrow();
        if voice.enabled() {
            self.voice_btn.add_css_class("suggested-action");
            self.voice_btn.set_label("🎤 Voice: ON");
        } else {
            self.voice_btn.remove_css_class("suggested-action");
            self.voice_btn.set_label("🎤 Voice: OFF");
        }
        self.chat.set_listening(voice.listening());
    }

    fn apply_theme(&self, theme: Theme) {
        let scheme = match theme {
            Theme::Dark => adw::ColorScheme::ForceDark,
            Theme::Light => adw::ColorScheme::ForceLight,
        };
        adw::StyleManager::default().set_color_scheme(scheme);
        let (label, tooltip) = theme.toggle_button();
        self.theme_btn.set_label(label);
        self.theme_btn.set_tooltip_text(Some(tooltip));
        self.theme.set(theme);
    }

    fn toggle_theme(&self) {
        let current = self.theme.get();
        let next = match &self.prefs {
            Some(prefs) => current.toggle(prefs).unwrap_or_else(|e| {
                log::warn!("could not save theme: {e}");
                current.toggled()
            }),
            None => current.toggled(),
        };
        self.apply_theme(next);
    }

    fn load_greeting(self: &Rc<Self>) {
        let client = self.client.clone();
        let rx = crate::utils::run_async_to_main(async move { settings::load_name(&client).await });
        let session = self.clone();
        rx.attach(None, move |name| {
            session.set_greeting(name.as_deref());
            glib::ControlFlow::Break
        });
    }

    pub(crate) fn set_greeting(&self, name: Option<&str>) {
        self.greeting
            .set_label(&settings::greeting(crate::utils::local_hour(), name));
    }
}

fn install_style() {
    let provider = gtk4::CssProvider::new();
    provider.load_from_data(STYLE);
    if let Some(display) = gtk4::gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

pub fn show_main_window(app: &Application, config: AppConfig) {
    let client = match AssistantClient::new(
        &config.base_url,
        Duration::from_secs(config.request_timeout_secs),
    ) {
        Ok(client) => client,
        Err(e) => {
            log::error!("invalid base url {:?}: {e}", config.base_url);
            crate::ui::connect::show_connect_window(app, config);
            return;
        }
    };
    install_style();

    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("Smart Assistant")
        .default_width(960)
        .default_height(640)
        .build();

    let overlay = adw::ToastOverlay::new();

    let split = adw::Flap::builder()
        .reveal_flap(true)
        .locked(true)
        .modal(false)
        .build();

    let sidebar = Sidebar::new();
    split.set_flap(Some(&sidebar.widget()));

    let chat = ChatView::new();
    let content = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    let greeting = gtk4::Label::new(None);
    greeting.add_css_class("title-3");
    greeting.set_halign(gtk4::Align::Start);
    greeting.set_margin_top(12);
    greeting.set_margin_start(12);
    content.append(&greeting);
    content.append(&chat.widget());
    split.set_content(Some(&content));

    overlay.set_child(Some(&split));

    let container = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    let title = gtk4::Label::new(Some("Smart Assistant"));
    header.set_title_widget(Some(&title));

    let voice_btn = gtk4::Button::with_label("🎤 Voice: OFF");
    header.pack_start(&voice_btn);
    let theme_btn = gtk4::Button::new();
    container.append(&header);
    container.append(&overlay);
    window.set_content(Some(&container));

    let prefs = match Preferences::open_default() {
        Ok(prefs) => Some(prefs),
        Err(e) => {
            log::warn!("preferences unavailable, theme will not persist: {e}");
            None
        }
    };
    let recognizer = Recognizer::from_config(config.speech.recognizer.as_deref());
    let synthesizer = Synthesizer::from_config(config.speech.synthesizer.as_deref());

    let session = Rc::new(Session {
        client,
        window: window.clone(),
        overlay,
        greeting,
        chat: chat.clone(),
        sidebar: sidebar.clone(),
        voice_btn: voice_btn.clone(),
        theme_btn: theme_btn.clone(),
        transcript: RefCell::new(Transcript::default()),
        voice: RefCell::new(VoiceController::new(recognizer.is_some())),
        recognizer,
        synthesizer: RefCell::new(synthesizer),
        capture: RefCell::new(CaptureSlot::default()),
        theme: Cell::new(Theme::default()),
        prefs,
    });

    header.pack_end(&crate::ui::settings::settings_button(&session));
    header.pack_end(&theme_btn);

    let theme = session.prefs.as_ref().map(Theme::restore).unwrap_or_default();
    session.apply_theme(theme);
    session.set_greeting(None);

    {
        let session = session.clone();
        chat.send_btn.connect_clicked(move |_| {
            let text = session.chat.entry.text();
            session.send(&text);
        });
    }
    {
        let session = session.clone();
        chat.entry.connect_activate(move |entry| {
            let text = entry.text();
            session.send(&text);
        });
    }
    {
        let session = session.clone();
        chat.mic_btn.connect_clicked(move |_| session.voice_event(VoiceEvent::Listen));
    }
    {
        let session = session.clone();
        voice_btn.connect_clicked(move |_| session.voice_event(VoiceEvent::Toggle));
    }
    {
        let session = session.clone();
        theme_btn.connect_clicked(move |_| session.toggle_theme());
    }
    {
        let session = session.clone();
        sidebar.refresh_btn.connect_clicked(move |_| session.refresh_sidebar(true));
    }

    window.present();
    chat.entry.grab_focus();

    session.load_greeting();
    session.refresh_sidebar(false);
}
