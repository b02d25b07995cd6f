use std::{sync::Arc, time::Duration};

use auth_client::AuthProvider;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::reducer::{FormField, PendingRequest, SessionController, SessionView};
use crate::ui::layout::{
    content_width, BUTTON_CORNER_RADIUS, BUTTON_SIZE, FIELD_CORNER_RADIUS, FIELD_HEIGHT,
    FIELD_TEXT_INSET, HEADER_FONT_SIZE, HEADER_HEIGHT, PADDING,
};

pub const APP_TITLE: &str = "Email Sign In";

const ACCENT_GREEN: egui::Color32 = egui::Color32::from_rgb(52, 199, 89);
const ERROR_RED: egui::Color32 = egui::Color32::from_rgb(200, 60, 60);

pub struct DesktopGuiApp {
    ui_rx: Receiver<UiEvent>,
    controller: SessionController,
}

impl DesktopGuiApp {
    pub fn bootstrap(
        provider: Arc<dyn AuthProvider>,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
    ) -> Self {
        let mut controller = SessionController::new(provider, cmd_tx);
        let initial = controller.refresh();
        tracing::info!(view = ?initial.view_state(), "initial session state");
        Self { ui_rx, controller }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.controller.handle_event(event);
        }
    }

    fn show_header(ui: &mut egui::Ui, text: &str) {
        ui.add_sized(
            [ui.available_width(), HEADER_HEIGHT],
            egui::Label::new(egui::RichText::new(text).size(HEADER_FONT_SIZE).strong()),
        );
    }

    fn action_button(label: &str) -> egui::Button<'static> {
        egui::Button::new(
            egui::RichText::new(label.to_string())
                .color(egui::Color32::WHITE)
                .size(16.0),
        )
        .min_size(egui::vec2(BUTTON_SIZE[0], BUTTON_SIZE[1]))
        .fill(ACCENT_GREEN)
        .stroke(egui::Stroke::new(2.0, egui::Color32::BLACK))
        .corner_radius(egui::CornerRadius::same(BUTTON_CORNER_RADIUS))
    }

    fn form_text_field(
        ui: &mut egui::Ui,
        id: &'static str,
        hint: &str,
        value: &mut String,
        masked: bool,
        enabled: bool,
        should_focus: bool,
    ) -> egui::Response {
        ui.scope(|ui| {
            let widgets = &mut ui.visuals_mut().widgets;
            for state in [
                &mut widgets.inactive,
                &mut widgets.hovered,
                &mut widgets.active,
            ] {
                state.corner_radius = egui::CornerRadius::same(FIELD_CORNER_RADIUS);
                state.bg_stroke = egui::Stroke::new(1.0, egui::Color32::BLACK);
            }

            let edit = egui::TextEdit::singleline(value)
                .id_salt(id)
                .hint_text(hint)
                .password(masked)
                .background_color(egui::Color32::WHITE)
                .text_color(egui::Color32::BLACK)
                .margin(egui::Margin::symmetric(FIELD_TEXT_INSET, 0))
                .vertical_align(egui::Align::Center);

            let response = ui.add_enabled_ui(enabled, |ui| {
                ui.add_sized([ui.available_width(), FIELD_HEIGHT], edit)
            });
            let response = response.inner;
            if should_focus {
                response.request_focus();
            }
            response
        })
        .inner
    }

    fn show_sign_in_screen(&mut self, ctx: &egui::Context) {
        let prompt_open = self.controller.account_prompt().is_some();
        let editable = !self.controller.is_busy() && !prompt_open;

        egui::CentralPanel::default().show(ctx, |ui| {
            let width = content_width(ui.available_width());
            ui.add_space(PADDING);
            ui.vertical_centered(|ui| {
                ui.set_width(width);
                Self::show_header(ui, APP_TITLE);
                ui.add_space(PADDING);

                let focus = self.controller.take_focus_request();
                let email_resp = Self::form_text_field(
                    ui,
                    "signin_email",
                    "Email Address",
                    &mut self.controller.email_input,
                    false,
                    editable,
                    focus == Some(FormField::Email),
                );
                ui.add_space(PADDING);
                let password_resp = Self::form_text_field(
                    ui,
                    "signin_password",
                    "Password",
                    &mut self.controller.password_input,
                    true,
                    editable,
                    focus == Some(FormField::Password),
                );

                if let Some(message) = self.controller.validation_message() {
                    ui.add_space(4.0);
                    ui.colored_label(ERROR_RED, message);
                }

                let enter_pressed = ui.input(|i| i.key_pressed(egui::Key::Enter));
                if editable
                    && enter_pressed
                    && (email_resp.lost_focus() || password_resp.lost_focus())
                {
                    self.controller.submit_sign_in();
                }

                ui.add_space(PADDING);
                if ui
                    .add_enabled(editable, Self::action_button("Sign In"))
                    .clicked()
                {
                    self.controller.submit_sign_in();
                }

                if let Some(pending) = self.controller.pending_request() {
                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(match pending {
                            PendingRequest::SignIn => "Signing in...",
                            PendingRequest::SignUp => "Creating account...",
                        });
                    });
                }

                ui.add_space(PADDING);
                ui.small(egui::RichText::new(self.controller.status()).weak());
            });
        });
    }

    fn show_signed_in_screen(&mut self, ctx: &egui::Context, display_email: &str) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let width = content_width(ui.available_width());
            ui.add_space(PADDING);
            ui.vertical_centered(|ui| {
                ui.set_width(width);
                Self::show_header(ui, display_email);
                ui.add_space(PADDING);
                if ui.add(Self::action_button("Sign Out")).clicked() {
                    self.controller.submit_sign_out();
                }
                ui.add_space(PADDING);
                ui.small(egui::RichText::new(self.controller.status()).weak());
            });
        });
    }

    fn show_account_creation_dialog(&mut self, ctx: &egui::Context) {
        let Some(prompt) = self.controller.account_prompt() else {
            return;
        };
        let email = prompt.email().to_string();
        let reason = prompt.reason().to_string();

        let mut confirmed = false;
        let mut cancelled = false;
        egui::Window::new("Create Account")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Would you like to create an account?");
                ui.small(egui::RichText::new(format!("{email} ({reason})")).weak());
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Continue").clicked() {
                        confirmed = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancelled = true;
                    }
                });
            });

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            cancelled = true;
        }
        if confirmed {
            self.controller.confirm_account_creation();
        } else if cancelled {
            self.controller.dismiss_account_creation();
        }
    }
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        match self.controller.refresh() {
            SessionView::SignedOut => self.show_sign_in_screen(ctx),
            SessionView::SignedIn { display_email } => {
                self.show_signed_in_screen(ctx, &display_email)
            }
        }
        self.show_account_creation_dialog(ctx);

        // Backend completions arrive over a channel; poll faster while one is due.
        if self.controller.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(50));
        } else {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}
