use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use eframe::egui::{self, Context, Ui};
use log::info;
use openalex_graphs::chart::{Bar, ScatterPoint, author_points, institution_bars};
use openalex_graphs::openalex::{OpenAlexClient, Topic, WorkGraph};
use openalex_graphs::util::{extract_id, format_count};

use super::graph::WorksGraphView;
use super::loader::{LoadState, Loader};
use super::radial::SubfieldPick;
use super::search::filter_ranked;

mod charts;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Tab {
    #[default]
    Institutions,
    Authors,
    Works,
}

impl Tab {
    const ALL: [Self; 3] = [Self::Institutions, Self::Authors, Self::Works];

    fn label(self) -> &'static str {
        match self {
            Self::Institutions => "Institutions",
            Self::Authors => "Authors",
            Self::Works => "Works",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum SubfieldAction {
    GoHome,
}

/// A loader bound to the topic it was started for.
struct TopicSlot<T> {
    topic: Option<String>,
    loader: Loader<T>,
}

impl<T> Default for TopicSlot<T> {
    fn default() -> Self {
        Self {
            topic: None,
            loader: Loader::default(),
        }
    }
}

impl<T: Send + 'static> TopicSlot<T> {
    fn needs_load(&self, topic: &str) -> bool {
        self.topic.as_deref() != Some(topic)
    }

    fn load<F>(&mut self, topic: &str, label: &'static str, job: F)
    where
        F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    {
        self.topic = Some(topic.to_owned());
        self.loader.start(label, job);
    }

    fn reset(&mut self) {
        self.topic = None;
        self.loader.reset();
    }
}

pub(super) struct SubfieldPage {
    client: Arc<OpenAlexClient>,
    subfield: SubfieldPick,
    tab: Tab,
    topics: Loader<Vec<Topic>>,
    topic_search: String,
    selected_topic: Option<String>,
    works: TopicSlot<WorksGraphView>,
    authors: TopicSlot<Vec<ScatterPoint>>,
    institutions: TopicSlot<Vec<Bar>>,
    hovered_author: Option<usize>,
    hovered_bar: Option<usize>,
}

fn default_topic(topics: &[Topic]) -> Option<String> {
    topics.first().map(|topic| topic.id.clone())
}

impl SubfieldPage {
    pub(super) fn new(client: Arc<OpenAlexClient>, subfield: SubfieldPick) -> Self {
        info!("opening subfield {} ({})", subfield.name, subfield.id);
        let mut page = Self {
            client,
            subfield,
            tab: Tab::default(),
            topics: Loader::default(),
            topic_search: String::new(),
            selected_topic: None,
            works: TopicSlot::default(),
            authors: TopicSlot::default(),
            institutions: TopicSlot::default(),
            hovered_author: None,
            hovered_bar: None,
        };
        page.load_topics();
        page
    }

    pub(super) fn subfield(&self) -> &SubfieldPick {
        &self.subfield
    }

    fn subfield_id(&self) -> String {
        extract_id(&self.subfield.id).to_owned()
    }

    fn load_topics(&mut self) {
        let client = Arc::clone(&self.client);
        let subfield = self.subfield_id();
        self.topics.start("topics", move || {
            client
                .fetch_topics(&subfield)
                .with_context(|| format!("failed to fetch topics of subfield {subfield}"))
        });
    }

    fn select_topic(&mut self, topic: Option<String>) {
        if self.selected_topic == topic {
            return;
        }
        self.clear_topic_data();
        self.selected_topic = topic;
    }

    fn clear_topic_data(&mut self) {
        if let Some(view) = self.works.loader.ready_mut() {
            view.stop();
        }
        self.works.reset();
        self.authors.reset();
        self.institutions.reset();
        self.hovered_author = None;
        self.hovered_bar = None;
    }

    /// Stops the running simulation and drops in-flight loads.
    pub(super) fn leave(&mut self) {
        self.clear_topic_data();
        self.topics.reset();
    }

    fn load_current_tab(&mut self, force: bool) {
        let Some(topic) = self.selected_topic.clone() else {
            return;
        };
        let client = Arc::clone(&self.client);
        let subfield = self.subfield_id();

        match self.tab {
            Tab::Works if force || self.works.needs_load(&topic) => {
                if let Some(view) = self.works.loader.ready_mut() {
                    view.stop();
                }
                let id = topic.clone();
                self.works.load(&topic, "works", move || {
                    let works = client
                        .fetch_works(&subfield, &id)
                        .with_context(|| format!("failed to fetch works of topic {id}"))?;
                    Ok(WorksGraphView::new(WorkGraph::from_works(&works)))
                });
            }
            Tab::Authors if force || self.authors.needs_load(&topic) => {
                let id = topic.clone();
                self.authors.load(&topic, "authors", move || {
                    let authors = client
                        .fetch_authors(&id)
                        .with_context(|| format!("failed to fetch authors of topic {id}"))?;
                    Ok(author_points(&authors))
                });
            }
            Tab::Institutions if force || self.institutions.needs_load(&topic) => {
                let id = topic.clone();
                self.institutions.load(&topic, "institutions", move || {
                    let groups = client
                        .fetch_institutions(&subfield, &id)
                        .with_context(|| format!("failed to fetch institutions of topic {id}"))?;
                    Ok(institution_bars(&groups))
                });
            }
            _ => {}
        }
    }

    fn poll(&mut self) -> bool {
        let mut changed = self.topics.poll();
        if changed
            && self.selected_topic.is_none()
            && let Some(topics) = self.topics.ready()
        {
            self.selected_topic = default_topic(topics);
        }
        changed |= self.works.loader.poll();
        changed |= self.authors.loader.poll();
        changed |= self.institutions.loader.poll();
        changed
    }

    fn is_loading(&self) -> bool {
        self.topics.is_loading()
            || self.works.loader.is_loading()
            || self.authors.loader.is_loading()
            || self.institutions.loader.is_loading()
    }

    pub(super) fn show(&mut self, ctx: &Context) -> Option<SubfieldAction> {
        if self.poll() {
            ctx.request_repaint();
        }
        self.load_current_tab(false);
        if self.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        let mut action = None;
        egui::TopBottomPanel::top("subfield_header")
            .resizable(false)
            .show(ctx, |ui| {
                if self.draw_breadcrumbs(ui) {
                    action = Some(SubfieldAction::GoHome);
                }
                ui.horizontal(|ui| {
                    for tab in Tab::ALL {
                        ui.selectable_value(&mut self.tab, tab, tab.label());
                    }
                });
                ui.add_space(4.0);
            });

        egui::SidePanel::left("topics")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_topics(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_tab(ui));
        action
    }

    /// Returns true when the overview link was clicked.
    fn draw_breadcrumbs(&self, ui: &mut Ui) -> bool {
        ui.horizontal(|ui| {
            let home = ui.link("Domain Overview").clicked();
            let ancestors = [self.subfield.domain.as_deref(), self.subfield.field.as_deref()];
            for name in ancestors.into_iter().flatten() {
                ui.label("/");
                ui.label(name);
            }
            ui.label("/");
            ui.strong(self.subfield.name.as_str());
            home
        })
        .inner
    }

    fn draw_topics(&mut self, ui: &mut Ui) {
        ui.heading("Topics");
        ui.add(
            egui::TextEdit::singleline(&mut self.topic_search)
                .hint_text("Search topics")
                .desired_width(f32::INFINITY),
        );
        ui.add_space(6.0);

        let mut clicked = None;
        let mut retry = false;
        match self.topics.state() {
            LoadState::Idle => {}
            LoadState::Loading { .. } => {
                ui.spinner();
            }
            LoadState::Error(message) => {
                ui.label(message.as_str());
                retry = ui.button("Retry").clicked();
            }
            LoadState::Ready(topics) => {
                let matches = filter_ranked(topics, &self.topic_search, |topic| topic.label.as_str());
                if matches.is_empty() {
                    ui.label("No matching topics");
                }
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for index in matches {
                            let topic = &topics[index];
                            let selected = self.selected_topic.as_deref() == Some(topic.id.as_str());
                            let text = format!("{} ({})", topic.label, format_count(topic.works_count));
                            if ui.selectable_label(selected, text).clicked() {
                                clicked = Some(topic.id.clone());
                            }
                        }
                    });
            }
        }

        if retry {
            self.load_topics();
        }
        if clicked.is_some() {
            self.select_topic(clicked);
        }
    }

    fn draw_tab(&mut self, ui: &mut Ui) {
        if self.selected_topic.is_none() {
            if !self.topics.is_loading() {
                ui.label("Select a topic to explore");
            }
            return;
        }

        let retry = match self.tab {
            Tab::Institutions => {
                let hovered = &mut self.hovered_bar;
                show_load_state(ui, &mut self.institutions.loader, "institutions", |ui, bars| {
                    ui.heading(format!("Top {} Institutions", bars.len()));
                    charts::draw_institution_bars(ui, bars, hovered);
                })
            }
            Tab::Authors => {
                let hovered = &mut self.hovered_author;
                show_load_state(ui, &mut self.authors.loader, "authors", |ui, points| {
                    charts::draw_authors_scatter(ui, points, hovered);
                })
            }
            Tab::Works => show_load_state(ui, &mut self.works.loader, "works", |ui, view| {
                view.draw(ui);
            }),
        };

        if retry {
            self.load_current_tab(true);
        }
    }
}

/// Draws `body` for a finished load, a spinner or the error with a Retry button.
/// Returns true when Retry was clicked.
fn show_load_state<T>(
    ui: &mut Ui,
    loader: &mut Loader<T>,
    what: &str,
    body: impl FnOnce(&mut Ui, &mut T),
) -> bool {
    if let Some(value) = loader.ready_mut() {
        body(ui, value);
        return false;
    }

    match loader.state() {
        LoadState::Error(message) => {
            let mut retry = false;
            ui.vertical_centered(|ui| {
                ui.add_space(80.0);
                ui.heading(format!("Failed to load {what}"));
                ui.add_space(6.0);
                ui.label(message.as_str());
                ui.add_space(10.0);
                retry = ui.button("Retry").clicked();
            });
            retry
        }
        _ => {
            ui.vertical_centered(|ui| {
                ui.add_space(120.0);
                ui.heading(format!("Loading {what}..."));
                ui.add_space(8.0);
                ui.spinner();
            });
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(id: &str, works_count: u64) -> Topic {
        Topic {
            id: id.to_owned(),
            label: format!("Topic {id}"),
            works_count,
        }
    }

    #[test]
    fn tabs_keep_their_order() {
        let labels = Tab::ALL.map(Tab::label);
        assert_eq!(labels, ["Institutions", "Authors", "Works"]);
        assert_eq!(Tab::default(), Tab::Institutions);
    }

    #[test]
    fn first_topic_is_selected_by_default() {
        let topics = vec![topic("T2", 900), topic("T1", 100)];
        assert_eq!(default_topic(&topics), Some("T2".to_owned()));
        assert_eq!(default_topic(&[]), None);
    }

    #[test]
    fn slot_reloads_only_for_a_new_topic() {
        let mut slot = TopicSlot::<u32>::default();
        assert!(slot.needs_load("T1"));

        slot.load("T1", "count", || Ok(1));
        assert!(!slot.needs_load("T1"));
        assert!(slot.needs_load("T2"));

        slot.reset();
        assert!(slot.needs_load("T1"));
        assert!(matches!(slot.loader.state(), LoadState::Idle));
    }
}
