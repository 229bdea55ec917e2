use crate::config::{PipelineTimings, RosterConfig};
use crate::core::card::{spawn_card, CardHandle};
use crate::core::rating::add_match;
use crate::core::search::search_referees;
use crate::core::statistics::{compute_average, compute_histogram, compute_total_matches};
use crate::core::streams::{next_debounced, SwitchLatest, Ticket};
use crate::domain::model::{CardView, FilterState, RatingSubmission, Referee};
use crate::domain::ports::{RefereeGateway, RenderSink};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
struct PageState {
    /// Current radio selection.
    filter: FilterState,
    cards: BTreeMap<u64, CardHandle>,
}

/// Shared state of one roster page, handed to every pipeline and card.
pub struct RenderContext {
    gateway: Arc<dyn RefereeGateway>,
    sink: Arc<dyn RenderSink>,
    timings: PipelineTimings,
    preserve_filter: bool,
    state: Mutex<PageState>,
    epoch: watch::Sender<u64>,
}

impl RenderContext {
    pub fn new(
        gateway: Arc<dyn RefereeGateway>,
        sink: Arc<dyn RenderSink>,
        timings: PipelineTimings,
        preserve_filter: bool,
    ) -> Self {
        let (epoch, _) = watch::channel(0);
        Self {
            gateway,
            sink,
            timings,
            preserve_filter,
            state: Mutex::new(PageState::default()),
            epoch,
        }
    }

    pub fn timings(&self) -> PipelineTimings {
        self.timings
    }

    pub fn sink(&self) -> &dyn RenderSink {
        self.sink.as_ref()
    }

    pub async fn active_filter(&self) -> FilterState {
        self.state.lock().await.filter
    }

    /// Filter applied by refreshes that do not come from the radio group.
    async fn refresh_filter(&self) -> FilterState {
        if self.preserve_filter {
            self.active_filter().await
        } else {
            FilterState::All
        }
    }

    /// Replaces every card with `referees` under `filter`. A result whose
    /// ticket has been superseded is dropped; returns whether it rendered.
    pub async fn render_roster(
        self: &Arc<Self>,
        referees: Vec<Referee>,
        filter: FilterState,
        ticket: Option<&Ticket>,
    ) -> bool {
        let mut state = self.state.lock().await;
        if ticket.is_some_and(|t| !t.is_current()) {
            tracing::debug!("Discarding stale roster of {} referee(s)", referees.len());
            return false;
        }

        let cards: Vec<CardView> = referees
            .iter()
            .map(compute_average)
            .filter(|referee| filter.matches(referee))
            .map(|referee| CardView {
                histogram: compute_histogram(&referee),
                referee,
            })
            .collect();

        self.epoch.send_modify(|epoch| *epoch += 1);
        state.cards.clear();
        self.sink.render_cards(&cards, filter);

        for card in &cards {
            let handle = spawn_card(Arc::clone(self), &card.referee, self.epoch.subscribe());
            state.cards.insert(card.referee.id, handle);
        }

        tracing::debug!("Rendered {} card(s) with filter {}", cards.len(), filter);
        true
    }

    /// Full page refresh: reload everyone, update the banner, redraw.
    pub async fn refresh_page(self: &Arc<Self>) {
        let referees = self.gateway.fetch_all().await;
        self.sink.render_banner(compute_total_matches(&referees));
        let filter = self.refresh_filter().await;
        self.render_roster(referees, filter, None).await;
    }

    pub(crate) async fn submit_rating(self: Arc<Self>, submission: RatingSubmission) {
        match add_match(self.gateway.as_ref(), &submission).await {
            Ok(updated) => {
                tracing::info!(
                    "Rating added to referee {}, {} match(es) officiated",
                    updated.full_name(),
                    updated.matches_officiated
                );
                self.refresh_page().await;
            }
            Err(e) if e.is_not_found() => {
                tracing::error!("Rating discarded: {}", e);
            }
            Err(e) => {
                tracing::error!(
                    "Failed to add rating to referee {}: {}",
                    submission.referee_id,
                    e
                );
            }
        }
    }

    async fn card(&self, referee_id: u64) -> Option<CardHandle> {
        self.state.lock().await.cards.get(&referee_id).cloned()
    }

    async fn rendered_ids(&self) -> Vec<u64> {
        self.state.lock().await.cards.keys().copied().collect()
    }

    async fn clear(&self) {
        let mut state = self.state.lock().await;
        self.epoch.send_modify(|epoch| *epoch += 1);
        state.cards.clear();
    }
}

/// Page-level inputs: the search box and the filter radio group.
#[derive(Debug, Clone)]
pub struct PageHandle {
    search: UnboundedSender<String>,
    filter: UnboundedSender<FilterState>,
}

impl PageHandle {
    pub fn type_search(&self, text: impl Into<String>) {
        if self.search.send(text.into()).is_err() {
            tracing::debug!("Search pipeline stopped, input dropped");
        }
    }

    pub fn select_filter(&self, filter: FilterState) {
        if self.filter.send(filter).is_err() {
            tracing::debug!("Filter pipeline stopped, selection dropped");
        }
    }
}

pub struct RosterController {
    ctx: Arc<RenderContext>,
    tasks: Vec<JoinHandle<()>>,
}

impl RosterController {
    pub fn new(
        gateway: Arc<dyn RefereeGateway>,
        sink: Arc<dyn RenderSink>,
        timings: PipelineTimings,
        preserve_filter: bool,
    ) -> Self {
        Self {
            ctx: Arc::new(RenderContext::new(gateway, sink, timings, preserve_filter)),
            tasks: Vec::new(),
        }
    }

    pub fn from_config(
        gateway: Arc<dyn RefereeGateway>,
        sink: Arc<dyn RenderSink>,
        config: &RosterConfig,
    ) -> Self {
        Self::new(gateway, sink, config.timings(), config.preserve_filter())
    }

    pub fn context(&self) -> &Arc<RenderContext> {
        &self.ctx
    }

    /// Loads the page and starts the search and filter pipelines.
    pub async fn start(&mut self) -> PageHandle {
        self.ctx.refresh_page().await;

        let (search_tx, search_rx) = unbounded_channel();
        let (filter_tx, filter_rx) = unbounded_channel();

        self.tasks
            .push(tokio::spawn(run_search(Arc::clone(&self.ctx), search_rx)));
        self.tasks
            .push(tokio::spawn(run_filter(Arc::clone(&self.ctx), filter_rx)));

        PageHandle {
            search: search_tx,
            filter: filter_tx,
        }
    }

    pub async fn refresh(&self) {
        self.ctx.refresh_page().await;
    }

    pub async fn card(&self, referee_id: u64) -> Option<CardHandle> {
        self.ctx.card(referee_id).await
    }

    pub async fn rendered_ids(&self) -> Vec<u64> {
        self.ctx.rendered_ids().await
    }

    /// Stops the page pipelines and every card.
    pub async fn shutdown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        self.ctx.clear().await;
    }
}

/// Search-as-you-type. Renders everyone right away, then each settled
/// query; a keystroke invalidates whatever lookup is still running.
async fn run_search(ctx: Arc<RenderContext>, mut keystrokes: UnboundedReceiver<String>) {
    let mut switch = SwitchLatest::new();
    let guard = switch.guard();

    let (settle_tx, mut settle_rx) = unbounded_channel();
    let invalidator = tokio::spawn(async move {
        while let Some(text) = keystrokes.recv().await {
            guard.issue();
            if settle_tx.send(text).is_err() {
                break;
            }
        }
    });

    let mut query = Some(String::new());
    while let Some(text) = query {
        tracing::debug!("Search query settled: '{}'", text);
        let ctx_for_lookup = Arc::clone(&ctx);
        switch.switch(move |ticket| async move {
            let referees = search_referees(ctx_for_lookup.gateway.as_ref(), &text).await;
            let filter = ctx_for_lookup.refresh_filter().await;
            ctx_for_lookup
                .render_roster(referees, filter, Some(&ticket))
                .await;
        });
        query = next_debounced(&mut settle_rx, ctx.timings.search_debounce).await;
    }

    invalidator.abort();
}

/// Radio filter changes. Every settled selection reloads the full list.
async fn run_filter(ctx: Arc<RenderContext>, mut changes: UnboundedReceiver<FilterState>) {
    let mut switch = SwitchLatest::new();

    while let Some(filter) = next_debounced(&mut changes, ctx.timings.filter_debounce).await {
        tracing::debug!("Filter changed to {}", filter);
        ctx.state.lock().await.filter = filter;

        let ctx_for_reload = Arc::clone(&ctx);
        switch.switch(move |ticket| async move {
            let referees = ctx_for_reload.gateway.fetch_all().await;
            ctx_for_reload
                .render_roster(referees, filter, Some(&ticket))
                .await;
        });
    }
}
