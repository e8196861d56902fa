use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use eframe::egui::{self, Context, Ui};
use log::{info, warn};
use openalex_graphs::HierarchyNode;
use openalex_graphs::openalex::OpenAlexClient;
use openalex_graphs::util::extract_id;

use super::loader::{LoadState, Loader};
use super::radial::{RadialView, SubfieldPick};
use super::search::filter_ranked;

pub(super) enum HomeAction {
    OpenSubfield(SubfieldPick),
}

/// Domain overview: a domain picker above the radial tree of its fields and subfields.
pub(super) struct HomePage {
    client: Arc<OpenAlexClient>,
    hierarchy: Loader<HierarchyNode>,
    preferred_domain: Option<String>,
    pending_subfield: Option<String>,
    selected_domain: Option<String>,
    radial: Option<RadialView>,
}

impl HomePage {
    pub(super) fn new(
        client: Arc<OpenAlexClient>,
        preferred_domain: Option<String>,
        pending_subfield: Option<String>,
    ) -> Self {
        let mut page = Self {
            client,
            hierarchy: Loader::default(),
            preferred_domain,
            pending_subfield,
            selected_domain: None,
            radial: None,
        };
        page.reload();
        page
    }

    fn reload(&mut self) {
        let client = Arc::clone(&self.client);
        self.radial = None;
        self.hierarchy.start("hierarchy", move || {
            client
                .fetch_hierarchy()
                .context("failed to fetch the OpenAlex hierarchy")
        });
    }

    fn on_hierarchy_ready(&mut self) -> Option<HomeAction> {
        let root = self.hierarchy.ready()?;
        info!(
            "hierarchy ready: {} domains, {} nodes",
            root.children.len(),
            root.node_count()
        );

        let selected = self
            .selected_domain
            .as_deref()
            .and_then(|id| root.children.iter().find(|domain| domain.id == id))
            .or_else(|| resolve_domain(root, self.preferred_domain.as_deref()))
            .map(|domain| domain.id.clone());
        self.select_domain(selected);

        let id = self.pending_subfield.take()?;
        let root = self.hierarchy.ready()?;
        match subfield_pick(root, &id) {
            Some(pick) => Some(HomeAction::OpenSubfield(pick)),
            None => {
                warn!("subfield {id} is not part of the hierarchy");
                None
            }
        }
    }

    fn select_domain(&mut self, id: Option<String>) {
        let domain = id.as_deref().and_then(|id| {
            self.hierarchy
                .ready()
                .and_then(|root| root.children.iter().find(|domain| domain.id == id))
        });
        self.radial = domain.map(|domain| RadialView::new(domain.clone()));
        self.selected_domain = id;
    }

    pub(super) fn show(&mut self, ctx: &Context) -> Option<HomeAction> {
        let mut action = None;
        if self.hierarchy.poll() {
            action = self.on_hierarchy_ready();
            ctx.request_repaint();
        }
        if self.hierarchy.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("home_controls")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    self.draw_domain_picker(ui);
                    let reload = ui.add_enabled(
                        !self.hierarchy.is_loading(),
                        egui::Button::new("Reload hierarchy"),
                    );
                    if reload.clicked() {
                        self.reload();
                    }
                });
                ui.add_space(4.0);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let mut retry = false;
            match self.hierarchy.state() {
                LoadState::Idle | LoadState::Loading { .. } => {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading OpenAlex hierarchy...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                }
                LoadState::Error(message) => {
                    ui.heading("Failed to fetch the OpenAlex hierarchy");
                    ui.add_space(6.0);
                    ui.label(message.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                }
                LoadState::Ready(_) => match self.radial.as_mut() {
                    Some(radial) => {
                        if let Some(pick) = radial.draw(ui) {
                            action = Some(HomeAction::OpenSubfield(pick));
                        }
                    }
                    None => {
                        ui.label("No domains available");
                    }
                },
            }
            if retry {
                self.reload();
            }
        });

        action
    }

    fn draw_domain_picker(&mut self, ui: &mut Ui) {
        let Some(root) = self.hierarchy.ready() else {
            ui.label("Domain:");
            ui.spinner();
            return;
        };

        let current = self.selected_domain.clone();
        let mut chosen = current.clone();
        let selected_text = current
            .as_deref()
            .and_then(|id| root.children.iter().find(|domain| domain.id == id))
            .map_or("Select a domain", |domain| domain.display_name.as_str());

        ui.label("Domain:");
        egui::ComboBox::from_id_salt("domain")
            .selected_text(selected_text)
            .width(260.0)
            .show_ui(ui, |ui| {
                for domain in &root.children {
                    ui.selectable_value(&mut chosen, Some(domain.id.clone()), domain.display_name.as_str());
                }
            });

        if chosen != current {
            self.select_domain(chosen);
        }
    }

    pub(super) fn selected_domain_name(&self) -> Option<&str> {
        let id = self.radial.as_ref()?.root_id();
        let root = self.hierarchy.ready()?;
        root.children
            .iter()
            .find(|domain| domain.id == id)
            .map(|domain| domain.display_name.as_str())
    }
}

/// Domain named on the command line by id or by a fuzzy name match, else the first domain.
fn resolve_domain<'a>(root: &'a HierarchyNode, wanted: Option<&str>) -> Option<&'a HierarchyNode> {
    let domains = &root.children;
    let by_query = wanted.and_then(|wanted| {
        domains
            .iter()
            .find(|domain| extract_id(&domain.id) == extract_id(wanted))
            .or_else(|| {
                filter_ranked(domains, wanted, |domain| domain.display_name.as_str())
                    .first()
                    .map(|&index| &domains[index])
            })
    });
    if wanted.is_some() && by_query.is_none() {
        warn!("no domain matches {wanted:?}, showing the first one");
    }
    by_query.or_else(|| domains.first())
}

/// Builds the page target for a subfield id, naming its field and domain.
fn subfield_pick(root: &HierarchyNode, id: &str) -> Option<SubfieldPick> {
    let path = root.path_to(id)?;
    let [_, domain, field, subfield] = path.as_slice() else {
        return None;
    };
    Some(SubfieldPick {
        id: subfield.id.clone(),
        name: subfield.display_name.clone(),
        field: Some(field.display_name.clone()),
        domain: Some(domain.display_name.clone()),
    })
}
