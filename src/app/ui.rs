use super::results::{ResultCard, ResultsView};
use super::state::Phase;
use super::ShortsUploader;
use crate::upload::{
    Bounds, Language, TaskId, WhisperModel, MAX_DURATION_BOUNDS, MIN_DURATION_BOUNDS,
    NUM_SHORTS_BOUNDS,
};
use crate::utils::format::format_size;
use eframe::egui::{self, Align, Color32, RichText, Stroke};

const ACCENT: Color32 = Color32::from_rgb(161, 89, 225);

/// User intents collected during a frame, applied once rendering is done.
enum UiAction {
    PickFile,
    Submit,
    Cancel,
    StartOver,
    DismissNotification,
    Play(ResultCard),
    Download(TaskId, ResultCard),
    OpenServer,
}

impl ShortsUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        let mut actions = Vec::new();

        egui::CentralPanel::default().show(ctx, |ui| {
            let footer_height = 30.0;
            let content_height = ui.available_height() - footer_height;

            egui::ScrollArea::vertical()
                .max_height(content_height)
                .show(ui, |ui| {
                    ui.add_space(20.0);
                    ui.vertical_centered(|ui| {
                        ui.heading("DShorts");
                        ui.add_space(5.0);
                        ui.label(
                            RichText::new("Turn a long video into short clips")
                                .color(ui.visuals().text_color().gamma_multiply(0.7)),
                        );
                    });
                    ui.add_space(15.0);

                    self.render_notification(ui, &mut actions);

                    match self.state.phase {
                        Phase::Idle => {
                            self.render_drop_zone(ui, &mut actions);
                            ui.add_space(15.0);
                            self.render_options(ui);
                            ui.add_space(20.0);
                            ui.vertical_centered(|ui| {
                                ui.add_enabled_ui(self.state.can_submit(), |ui| {
                                    let button = egui::Button::new("🚀 Generate shorts")
                                        .min_size(egui::vec2(200.0, 40.0));
                                    if ui.add(button).clicked() {
                                        actions.push(UiAction::Submit);
                                    }
                                });
                            });
                        }
                        Phase::Uploading { .. } | Phase::Polling { .. } => {
                            self.render_progress(ui, &mut actions);
                        }
                        Phase::Completed { .. } => {
                            self.render_results(ui, &mut actions);
                        }
                    }
                    ui.add_space(20.0);
                });

            ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
                ui.add_space(8.0);
                self.render_footer(ui, &mut actions);
            });
        });

        for action in actions {
            match action {
                UiAction::PickFile => self.pick_file(),
                UiAction::Submit => self.start_upload(ctx),
                UiAction::Cancel => self.cancel(),
                UiAction::StartOver => self.start_over(),
                UiAction::DismissNotification => self.state.dismiss_notification(),
                UiAction::Play(card) => self.play_short(&card),
                UiAction::Download(task_id, card) => {
                    self.download_short(ctx, &task_id, &card)
                }
                UiAction::OpenServer => self.open_server(),
            }
        }
    }

    fn render_notification(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let Some(notification) = &self.state.notification else {
            return;
        };
        let color = notification.kind.color();

        egui::Frame::none()
            .fill(color.gamma_multiply(0.15))
            .stroke(Stroke::new(1.0, color))
            .rounding(6.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.horizontal(|ui| {
                    ui.label(notification.kind.icon());
                    ui.colored_label(color, &notification.message);
                    ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                        if ui.small_button("✖").clicked() {
                            actions.push(UiAction::DismissNotification);
                        }
                    });
                });
            });
        ui.add_space(10.0);
    }

    fn render_drop_zone(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
        let border = if hovering {
            ACCENT
        } else {
            ui.visuals().widgets.inactive.bg_stroke.color
        };

        egui::Frame::none()
            .stroke(Stroke::new(2.0, border))
            .rounding(8.0)
            .inner_margin(20.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    match &self.state.selected_file {
                        Some(file) => {
                            ui.label(RichText::new(format!("🎬 {}", file.name)).strong());
                            ui.label(format_size(file.size));
                        }
                        None => {
                            ui.label(RichText::new("Drop a video here").size(16.0));
                            ui.label(
                                RichText::new("MP4, MOV, AVI or WebM, up to 500 MB")
                                    .color(ui.visuals().text_color().gamma_multiply(0.6)),
                            );
                        }
                    }
                    ui.add_space(8.0);
                    if ui.button("📁 Choose a video").clicked() {
                        actions.push(UiAction::PickFile);
                    }
                });
            });
    }

    fn render_options(&mut self, ui: &mut egui::Ui) {
        let options = &mut self.state.options;

        ui.group(|ui| {
            egui::Grid::new("upload_options")
                .num_columns(2)
                .spacing([16.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Number of shorts");
                    let mut value = options.num_shorts() as i64;
                    if bounded_drag(ui, &mut value, NUM_SHORTS_BOUNDS, "").changed() {
                        options.set_num_shorts(value);
                    }
                    ui.end_row();

                    ui.label("Minimum duration");
                    let mut value = options.min_duration() as i64;
                    if bounded_drag(ui, &mut value, MIN_DURATION_BOUNDS, " s").changed() {
                        options.set_min_duration(value);
                    }
                    ui.end_row();

                    ui.label("Maximum duration");
                    let mut value = options.max_duration() as i64;
                    if bounded_drag(ui, &mut value, MAX_DURATION_BOUNDS, " s").changed() {
                        options.set_max_duration(value);
                    }
                    ui.end_row();

                    ui.label("Transcription model");
                    egui::ComboBox::from_id_source("whisper_model")
                        .selected_text(options.whisper_model.label())
                        .show_ui(ui, |ui| {
                            for model in WhisperModel::ALL {
                                ui.selectable_value(
                                    &mut options.whisper_model,
                                    model,
                                    model.label(),
                                );
                            }
                        });
                    ui.end_row();

                    ui.label("Language");
                    egui::ComboBox::from_id_source("language")
                        .selected_text(options.language.to_string())
                        .show_ui(ui, |ui| {
                            for language in Language::ALL {
                                ui.selectable_value(
                                    &mut options.language,
                                    language,
                                    language.to_string(),
                                );
                            }
                        });
                    ui.end_row();
                });
        });
    }

    fn render_progress(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let uploading = matches!(self.state.phase, Phase::Uploading { .. });

        ui.group(|ui| {
            ui.set_min_width(ui.available_width());
            let title = if uploading {
                "📤 Uploading".to_string()
            } else {
                match &self.state.phase {
                    Phase::Polling {
                        snapshot: Some(snapshot),
                        ..
                    } => match &snapshot.original_name {
                        Some(name) => format!("⚙ Processing {}", name),
                        None => "⚙ Processing".to_string(),
                    },
                    _ => "⚙ Processing".to_string(),
                }
            };
            ui.label(RichText::new(title).strong());
            ui.add_space(6.0);

            let progress_bar = egui::ProgressBar::new(self.state.progress_fraction())
                .show_percentage()
                .animate(uploading)
                .fill(ACCENT);
            ui.add(progress_bar);
            ui.label(self.state.progress_message());

            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                if ui.button("✖ Cancel").clicked() {
                    actions.push(UiAction::Cancel);
                }
            });
        });
    }

    fn render_results(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let Phase::Completed { task_id, snapshot } = &self.state.phase else {
            return;
        };

        ui.horizontal(|ui| {
            ui.heading("Your shorts");
            if let Some(name) = &snapshot.original_name {
                ui.label(
                    RichText::new(format!("from {}", name))
                        .color(ui.visuals().text_color().gamma_multiply(0.7)),
                );
            }
        });
        ui.add_space(10.0);

        match ResultsView::build(&self.client, task_id, snapshot.shorts()) {
            ResultsView::Empty => {
                ui.label("No short could be generated from this video.");
            }
            ResultsView::Cards(cards) => {
                for card in cards {
                    self.render_card(ui, task_id, card, actions);
                    ui.add_space(8.0);
                }
            }
        }

        ui.add_space(10.0);
        ui.vertical_centered(|ui| {
            if ui.button("🔄 New video").clicked() {
                actions.push(UiAction::StartOver);
            }
        });
    }

    fn render_card(
        &self,
        ui: &mut egui::Ui,
        task_id: &TaskId,
        card: ResultCard,
        actions: &mut Vec<UiAction>,
    ) {
        egui::Frame::group(ui.style())
            .fill(ui.style().visuals.extreme_bg_color)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.label(
                    RichText::new(format!("Short #{}  {}", card.index, card.filename)).strong(),
                );
                ui.horizontal(|ui| {
                    ui.colored_label(ACCENT, format!("Score {}%", card.score_percent));
                    ui.label(format!("| {} s", card.duration_secs));
                    ui.label(format!("| {} → {}", card.start, card.end));
                });
                ui.horizontal(|ui| {
                    let play = ui.button("▶ Play").on_hover_text(&card.video_url);
                    let download = ui.button("⬇ Download").on_hover_text(&card.download_url);
                    if play.clicked() {
                        actions.push(UiAction::Play(card.clone()));
                    }
                    if download.clicked() {
                        actions.push(UiAction::Download(task_id.clone(), card.clone()));
                    }
                });
            });
    }

    fn render_footer(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        ui.horizontal(|ui| {
            ui.label(
                RichText::new("Server:").color(ui.visuals().text_color().gamma_multiply(0.6)),
            );
            let link = ui.add(
                egui::Label::new(RichText::new(&self.config.server_url).color(ACCENT))
                    .sense(egui::Sense::click()),
            );
            if link.clicked() {
                actions.push(UiAction::OpenServer);
            }
        });
    }
}

fn bounded_drag(
    ui: &mut egui::Ui,
    value: &mut i64,
    bounds: Bounds,
    suffix: &str,
) -> egui::Response {
    let drag = egui::DragValue::new(value)
        .speed(0.2)
        .clamp_range(bounds.min..=bounds.max)
        .suffix(suffix);
    ui.add(drag)
        .on_hover_text(format!("Between {} and {}", bounds.min, bounds.max))
}
