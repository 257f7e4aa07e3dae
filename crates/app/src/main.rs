use eframe::egui;
use parking_lot::Mutex;
use shared::chat::{Language, Mode, Persona, Role};
use std::sync::Arc;

mod state;
pub use state::*;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 780.0])
            .with_min_inner_size([820.0, 600.0]),
        vsync: true,
        ..Default::default()
    };
    eframe::run_native(
        "GenieTalk",
        options,
        Box::new(|_cc| {
            Box::new(GenieTalkApp {
                state: Arc::new(Mutex::new(AppState::default())),
            })
        }),
    )
}

struct GenieTalkApp {
    state: Arc<Mutex<AppState>>,
}

impl eframe::App for GenieTalkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut s = self.state.lock();

        // Poll for a finished background request (non-blocking).
        s.poll_outcome();
        if s.is_thinking {
            ctx.request_repaint();
        }

        // Sidebar: key, mode, persona, language, documents, chat controls.
        egui::SidePanel::left("sidebar")
            .default_width(290.0)
            .min_width(250.0)
            .frame(
                egui::Frame::none()
                    .fill(egui::Color32::from_rgb(35, 35, 42))
                    .inner_margin(egui::Margin::same(14.0)),
            )
            .show(ctx, |ui| {
                ui.heading(
                    egui::RichText::new("GenieTalk")
                        .size(24.0)
                        .color(egui::Color32::from_rgb(220, 220, 230)),
                );
                ui.label(
                    egui::RichText::new("Persona chat with an agentic goal mode")
                        .size(11.0)
                        .weak(),
                );
                ui.add_space(10.0);
                ui.separator();
                ui.add_space(6.0);

                ui.label(egui::RichText::new("API Key").strong());
                ui.add(
                    egui::TextEdit::singleline(&mut s.api_key_input)
                        .password(true)
                        .hint_text("Gemini API key"),
                );
                ui.label(
                    egui::RichText::new("Stays in memory for this session only.")
                        .size(10.0)
                        .weak(),
                );
                ui.add_space(10.0);

                ui.label(egui::RichText::new("Mode").strong());
                ui.horizontal(|ui| {
                    for mode in [Mode::Chat, Mode::Agentic] {
                        ui.selectable_value(&mut s.settings.mode, mode, mode.display_name());
                    }
                });
                ui.add_space(10.0);

                ui.label(egui::RichText::new("Persona").strong());
                egui::ComboBox::from_id_source("persona_select")
                    .selected_text(s.settings.persona.display_name())
                    .show_ui(ui, |ui| {
                        for persona in Persona::ALL {
                            ui.selectable_value(
                                &mut s.settings.persona,
                                persona,
                                persona.display_name(),
                            )
                            .on_hover_text(agent::persona_template(persona).tagline);
                        }
                    });
                ui.add_space(10.0);

                ui.label(egui::RichText::new("Reply Language").strong());
                let showing_custom = s.settings.language.is_custom();
                egui::ComboBox::from_id_source("language_select")
                    .selected_text(if showing_custom {
                        "Other".to_string()
                    } else {
                        s.settings.language.name().to_string()
                    })
                    .show_ui(ui, |ui| {
                        for language in Language::PRESETS.iter() {
                            if ui
                                .selectable_label(
                                    s.settings.language == *language,
                                    language.name(),
                                )
                                .clicked()
                            {
                                s.settings.language = language.clone();
                            }
                        }
                        if ui.selectable_label(showing_custom, "Other…").clicked() {
                            s.settings.language =
                                Language::Custom(s.custom_language_input.clone());
                        }
                    });
                if s.settings.language.is_custom() {
                    if ui
                        .add(
                            egui::TextEdit::singleline(&mut s.custom_language_input)
                                .hint_text("Type target language name"),
                        )
                        .changed()
                    {
                        s.settings.language = Language::Custom(s.custom_language_input.clone());
                    }
                }
                ui.add_space(10.0);

                ui.label(egui::RichText::new("Documents").strong());
                if ui.button("Upload PDF/TXT…").clicked() {
                    if let Some(files) = rfd::FileDialog::new()
                        .add_filter("Documents", &["pdf", "txt"])
                        .set_title("Upload PDF/TXT documents")
                        .pick_files()
                    {
                        match documents::load_documents(&files) {
                            Ok(doc) => {
                                s.status = Some(format!("Loaded: {}", doc.summary()));
                                s.status_is_error = false;
                                s.session.set_document(doc);
                            }
                            Err(e) => {
                                s.status = Some(format!("Upload rejected: {e}"));
                                s.status_is_error = true;
                            }
                        }
                    }
                }
                let doc_info = s
                    .session
                    .document()
                    .map(|d| (d.summary(), d.text.chars().count()));
                match doc_info {
                    Some((summary, chars)) => {
                        ui.label(
                            egui::RichText::new(format!("{summary} ({chars} chars)"))
                                .size(10.0)
                                .weak(),
                        );
                        if ui.small_button("Remove").clicked() {
                            s.session.clear_document();
                            s.status = Some("Document context removed.".to_string());
                            s.status_is_error = false;
                        }
                    }
                    None => {
                        ui.label(
                            egui::RichText::new("No documents loaded.")
                                .size(10.0)
                                .weak(),
                        );
                    }
                }
                ui.add_space(10.0);

                ui.label(egui::RichText::new("Chat Controls").strong());
                ui.horizontal(|ui| {
                    if ui.button("Clear Chat").clicked() {
                        s.clear_chat();
                    }
                    if ui.button("Export Chat").clicked() {
                        let transcript = s.session.export_transcript();
                        if transcript.is_empty() {
                            s.status = Some("Nothing to export yet.".to_string());
                            s.status_is_error = true;
                        } else if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Text", &["txt"])
                            .set_file_name("genietalk_chatlog.txt")
                            .save_file()
                        {
                            match std::fs::write(&path, transcript) {
                                Ok(()) => {
                                    s.status =
                                        Some(format!("Saved transcript to {}", path.display()));
                                    s.status_is_error = false;
                                }
                                Err(e) => {
                                    s.status = Some(format!("Export failed: {e}"));
                                    s.status_is_error = true;
                                }
                            }
                        }
                    }
                });

                if let Some(status) = s.status.clone() {
                    ui.add_space(10.0);
                    let color = if s.status_is_error {
                        egui::Color32::from_rgb(220, 120, 100)
                    } else {
                        egui::Color32::from_rgb(140, 180, 140)
                    };
                    ui.label(egui::RichText::new(status).size(11.0).color(color));
                }
            });

        // Chat area.
        egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(egui::Color32::from_rgb(25, 25, 30))
                    .inner_margin(egui::Margin::same(16.0)),
            )
            .show(ctx, |ui| {
                let chat_height = ui.available_height() - 64.0;
                let messages = s.messages.clone();
                let is_thinking = s.is_thinking;
                let thinking_status = s.thinking_status.clone();

                egui::ScrollArea::vertical()
                    .max_height(chat_height)
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for msg in &messages {
                            ui.add_space(6.0);
                            render_message(ui, msg);
                            ui.add_space(6.0);
                        }

                        if is_thinking {
                            ui.add_space(6.0);
                            egui::Frame::none()
                                .fill(egui::Color32::from_rgb(50, 50, 58))
                                .rounding(egui::Rounding::same(12.0))
                                .inner_margin(egui::Margin::same(12.0))
                                .show(ui, |ui| {
                                    let time = ui.input(|i| i.time);
                                    let dots = match ((time * 2.0) as i32) % 4 {
                                        0 => "   ",
                                        1 => ".  ",
                                        2 => ".. ",
                                        _ => "...",
                                    };
                                    ui.label(
                                        egui::RichText::new(format!(
                                            "{}{}",
                                            thinking_status, dots
                                        ))
                                        .color(egui::Color32::from_rgb(160, 160, 180))
                                        .italics(),
                                    );
                                });
                            ctx.request_repaint();
                        }
                    });

                ui.add_space(8.0);

                // Input row.
                ui.horizontal(|ui| {
                    let hint = match s.settings.mode {
                        Mode::Chat => "Type your message...",
                        Mode::Agentic => "Describe a goal...",
                    };

                    let response = ui.add_sized(
                        [ui.available_width() - 80.0, 40.0],
                        egui::TextEdit::singleline(&mut s.input_text)
                            .hint_text(hint)
                            .font(egui::FontId::new(15.0, egui::FontFamily::Proportional)),
                    );
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        s.send_message();
                    }

                    let send = egui::Button::new("Send")
                        .fill(egui::Color32::from_rgb(70, 130, 180));
                    if ui
                        .add_enabled(!is_thinking, send)
                        .on_hover_text("Send the message (Enter works too)")
                        .clicked()
                    {
                        s.send_message();
                    }
                });
            });
    }
}

fn render_message(ui: &mut egui::Ui, msg: &UiMessage) {
    let is_user = msg.role == Role::User;

    if is_user {
        // User message - right aligned, blue
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
            ui.add_space(8.0);
            egui::Frame::none()
                .fill(egui::Color32::from_rgb(70, 130, 180))
                .rounding(egui::Rounding::same(12.0))
                .inner_margin(egui::Margin::same(12.0))
                .show(ui, |ui| {
                    ui.set_max_width(500.0);
                    ui.label(
                        egui::RichText::new(&msg.content)
                            .color(egui::Color32::WHITE)
                            .size(15.0),
                    );
                });
        });
    } else {
        // Assistant message - left aligned, gray, optional plan details
        egui::Frame::none()
            .fill(egui::Color32::from_rgb(50, 50, 58))
            .rounding(egui::Rounding::same(12.0))
            .inner_margin(egui::Margin::same(12.0))
            .show(ui, |ui| {
                ui.set_max_width(620.0);
                ui.label(
                    egui::RichText::new(&msg.content)
                        .color(egui::Color32::from_rgb(220, 220, 230))
                        .size(15.0),
                );

                if let Some(details) = &msg.details {
                    ui.add_space(6.0);
                    egui::CollapsingHeader::new("Plan")
                        .default_open(false)
                        .show(ui, |ui| {
                            ui.label(
                                egui::RichText::new(details)
                                    .monospace()
                                    .size(12.0)
                                    .color(egui::Color32::from_rgb(150, 150, 165)),
                            );
                        });
                }

                ui.add_space(4.0);
                ui.label(
                    egui::RichText::new(&msg.timestamp)
                        .size(10.0)
                        .weak(),
                );
            });
    }
}
