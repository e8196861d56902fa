use std::sync::Arc;

use eframe::egui::{self, Align, Context, Layout};
use log::info;
use openalex_graphs::openalex::OpenAlexClient;

use self::home::{HomeAction, HomePage};
use self::subfield::{SubfieldAction, SubfieldPage};

mod graph;
mod home;
mod loader;
mod radial;
mod render_utils;
mod search;
mod subfield;

pub struct OpenAlexApp {
    client: Arc<OpenAlexClient>,
    home: HomePage,
    page: Page,
    dark_mode: bool,
}

enum Page {
    Home,
    Subfield(Box<SubfieldPage>),
}

impl OpenAlexApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        client: OpenAlexClient,
        domain: Option<String>,
        subfield: Option<String>,
    ) -> Self {
        let dark_mode = cc.egui_ctx.style().visuals.dark_mode;
        let client = Arc::new(client);
        Self {
            home: HomePage::new(Arc::clone(&client), domain, subfield),
            client,
            page: Page::Home,
            dark_mode,
        }
    }

    fn open_subfield(&mut self, pick: radial::SubfieldPick) {
        self.leave_page();
        self.page = Page::Subfield(Box::new(SubfieldPage::new(Arc::clone(&self.client), pick)));
    }

    fn go_home(&mut self) {
        self.leave_page();
        self.page = Page::Home;
    }

    fn leave_page(&mut self) {
        if let Page::Subfield(page) = &mut self.page {
            info!("leaving subfield {}", page.subfield().name);
            page.leave();
        }
    }

    fn draw_top_bar(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("OpenAlex Graphs");
                    ui.separator();
                    match &self.page {
                        Page::Home => {
                            if let Some(domain) = self.home.selected_domain_name() {
                                ui.label(format!("domain: {domain}"));
                            }
                        }
                        Page::Subfield(page) => {
                            ui.label(format!("subfield: {}", page.subfield().name));
                        }
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let label = if self.dark_mode { "Light mode" } else { "Dark mode" };
                        if ui.button(label).clicked() {
                            self.dark_mode = !self.dark_mode;
                            let visuals = if self.dark_mode {
                                egui::Visuals::dark()
                            } else {
                                egui::Visuals::light()
                            };
                            ctx.set_visuals(visuals);
                        }
                    });
                });
            });
    }
}

impl eframe::App for OpenAlexApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.draw_top_bar(ctx);

        match &mut self.page {
            Page::Home => {
                if let Some(HomeAction::OpenSubfield(pick)) = self.home.show(ctx) {
                    self.open_subfield(pick);
                }
            }
            Page::Subfield(page) => {
                if let Some(SubfieldAction::GoHome) = page.show(ctx) {
                    self.go_home();
                }
            }
        }
    }
}
