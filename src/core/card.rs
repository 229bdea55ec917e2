use crate::core::availability::ScheduleState;
use crate::core::controller::RenderContext;
use crate::core::rating::{clamp_rating, FormField, RatingForm};
use crate::core::streams::spawn_debounced;
use crate::domain::model::Referee;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tokio::time::{sleep_until, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardEvent {
    Schedule,
    ToggleForm,
    Team1Input(String),
    Team2Input(String),
    RatingInput(String),
    CancelForm,
}

/// Input side of one rendered card. Events sent after the card has been
/// replaced by a newer render are dropped.
#[derive(Debug, Clone)]
pub struct CardHandle {
    referee_id: u64,
    events: UnboundedSender<CardEvent>,
}

impl CardHandle {
    pub fn referee_id(&self) -> u64 {
        self.referee_id
    }

    pub fn schedule(&self) {
        self.send(CardEvent::Schedule);
    }

    pub fn toggle_form(&self) {
        self.send(CardEvent::ToggleForm);
    }

    pub fn type_team1(&self, value: impl Into<String>) {
        self.send(CardEvent::Team1Input(value.into()));
    }

    pub fn type_team2(&self, value: impl Into<String>) {
        self.send(CardEvent::Team2Input(value.into()));
    }

    pub fn type_rating(&self, value: impl Into<String>) {
        self.send(CardEvent::RatingInput(value.into()));
    }

    pub fn cancel_form(&self) {
        self.send(CardEvent::CancelForm);
    }

    pub fn send(&self, event: CardEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("Card {} is no longer rendered, event dropped", self.referee_id);
        }
    }
}

#[derive(Debug, Default)]
struct CardState {
    schedule: ScheduleState,
    rate_enabled: bool,
    form_visible: bool,
}

struct FieldInputs {
    team1: UnboundedSender<String>,
    team2: UnboundedSender<String>,
    rating: UnboundedSender<String>,
}

struct CardActor {
    ctx: Arc<RenderContext>,
    referee_id: u64,
    referee_name: String,
    state: CardState,
    form: RatingForm,
    unlock_at: Option<Instant>,
    form_deadline: Option<Instant>,
}

pub(crate) fn spawn_card(
    ctx: Arc<RenderContext>,
    referee: &Referee,
    epoch_rx: watch::Receiver<u64>,
) -> CardHandle {
    let (events_tx, events_rx) = unbounded_channel();
    let actor = CardActor {
        ctx,
        referee_id: referee.id,
        referee_name: referee.full_name(),
        state: CardState::default(),
        form: RatingForm::new(referee.id),
        unlock_at: None,
        form_deadline: None,
    };
    tokio::spawn(actor.run(events_rx, epoch_rx));

    CardHandle {
        referee_id: referee.id,
        events: events_tx,
    }
}

impl CardActor {
    async fn run(
        mut self,
        mut events: UnboundedReceiver<CardEvent>,
        mut epoch_rx: watch::Receiver<u64>,
    ) {
        let timings = self.ctx.timings();
        let (form_tx, mut form_rx) = unbounded_channel();

        let (team1_tx, team1_rx) = unbounded_channel();
        spawn_debounced(team1_rx, timings.team_debounce, form_tx.clone(), FormField::Team1);
        let (team2_tx, team2_rx) = unbounded_channel();
        spawn_debounced(team2_rx, timings.team_debounce, form_tx.clone(), FormField::Team2);
        let (rating_tx, rating_rx) = unbounded_channel();
        spawn_debounced(rating_rx, timings.rating_debounce, form_tx, |raw: String| {
            FormField::Rating(clamp_rating(&raw))
        });

        let inputs = FieldInputs {
            team1: team1_tx,
            team2: team2_tx,
            rating: rating_tx,
        };

        loop {
            let unlock_at = self.unlock_at;
            let form_deadline = self.form_deadline;

            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event, &inputs),
                    None => break,
                },
                Some(field) = form_rx.recv() => self.handle_field(field),
                _ = sleep_until(unlock_at.unwrap_or_else(Instant::now)), if unlock_at.is_some() => {
                    self.unlock_at = None;
                    self.state.rate_enabled = true;
                    self.ctx.sink().set_rate_enabled(self.referee_id, true);
                }
                _ = sleep_until(form_deadline.unwrap_or_else(Instant::now)), if form_deadline.is_some() => {
                    self.form_deadline = None;
                    let dropped = self.form.cancel();
                    tracing::warn!(
                        "Rating form for referee {} timed out, {} unmatched value(s) discarded",
                        self.referee_id,
                        dropped
                    );
                }
                _ = epoch_rx.changed() => break,
            }
        }

        tracing::debug!("Card {} stopped", self.referee_id);
    }

    fn handle_event(&mut self, event: CardEvent, inputs: &FieldInputs) {
        match event {
            CardEvent::Schedule => {
                if !self.state.schedule.activate() {
                    tracing::debug!("Referee {} is already scheduled", self.referee_id);
                    return;
                }
                tracing::info!("Referee {} officiates a match!", self.referee_name);
                self.ctx.sink().set_availability(self.referee_id, false);
                self.unlock_at = Some(Instant::now() + self.ctx.timings().unlock_delay);
            }
            CardEvent::ToggleForm => {
                if !self.state.rate_enabled {
                    tracing::debug!("Rate control of referee {} is locked", self.referee_id);
                    return;
                }
                self.state.form_visible = !self.state.form_visible;
                self.ctx
                    .sink()
                    .set_form_visible(self.referee_id, self.state.form_visible);
            }
            CardEvent::Team1Input(value) => self.forward_input(&inputs.team1, value),
            CardEvent::Team2Input(value) => self.forward_input(&inputs.team2, value),
            CardEvent::RatingInput(value) => self.forward_input(&inputs.rating, value),
            CardEvent::CancelForm => {
                let dropped = self.form.cancel();
                self.form_deadline = None;
                tracing::debug!(
                    "Rating form for referee {} cancelled, {} value(s) discarded",
                    self.referee_id,
                    dropped
                );
            }
        }
    }

    fn forward_input(&self, input: &UnboundedSender<String>, value: String) {
        if !self.state.form_visible {
            tracing::debug!("Rating form of referee {} is hidden, input ignored", self.referee_id);
            return;
        }
        // The debouncers live as long as this actor.
        let _ = input.send(value);
    }

    fn handle_field(&mut self, field: FormField) {
        tracing::debug!("Referee {} form field settled: {:?}", self.referee_id, field);

        if let Some(submission) = self.form.push(field) {
            tracing::info!(
                "Submitting rating {} for referee {} ({} - {})",
                submission.rating,
                self.referee_id,
                submission.team1,
                submission.team2
            );
            tokio::spawn(Arc::clone(&self.ctx).submit_rating(submission));
        }

        self.form_deadline = match self.ctx.timings().form_timeout {
            Some(timeout) if self.form.is_pending() => Some(Instant::now() + timeout),
            _ => None,
        };
    }
}
