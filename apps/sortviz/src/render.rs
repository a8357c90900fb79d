use shared::{
    domain::{ElementState, Position},
    protocol::{MetricsSnapshot, Movement, ViewEvent},
};

fn marker(state: ElementState) -> &'static str {
    match state {
        ElementState::Neutral => "",
        ElementState::Comparing => "?",
        ElementState::Swapping => "*",
        ElementState::Moving => ">",
        ElementState::Settled => "=",
    }
}

/// One line per frame, e.g. `3* 5* 8 1=`. Positions touched by `movement`
/// are marked as moved; the rest show their visual state.
pub fn render_frame(values: &[i64], states: &[ElementState], movement: Option<&Movement>) -> String {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let position = Position(index);
            let moved = match movement {
                Some(Movement::Swap { a, b }) if *a == position || *b == position => Some("*"),
                Some(Movement::Shift { to, .. }) if *to == position => Some(">"),
                _ => None,
            };
            let state = states.get(index).copied().unwrap_or_default();
            format!("{value}{}", moved.unwrap_or_else(|| marker(state)))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_metrics(metrics: &MetricsSnapshot) -> String {
    let mut line = format!(
        "comparisons: {}  swaps: {}",
        metrics.comparisons, metrics.swaps
    );
    if let Some(elapsed_ms) = metrics.elapsed_ms {
        line.push_str(&format!("  elapsed: {:.1} s", elapsed_ms as f64 / 1000.0));
    }
    line
}

/// Mirrors the view state from the event stream and yields a frame for every
/// committed move.
#[derive(Debug, Default)]
pub struct FrameTracker {
    values: Vec<i64>,
    states: Vec<ElementState>,
}

impl FrameTracker {
    pub fn observe(&mut self, event: &ViewEvent) -> Option<String> {
        match event {
            ViewEvent::SequenceLoaded { values } => {
                self.values = values.clone();
                self.states = vec![ElementState::Neutral; values.len()];
                None
            }
            ViewEvent::StateChanged {
                position, state, ..
            } => {
                if let Some(slot) = self.states.get_mut(position.0) {
                    *slot = *state;
                }
                None
            }
            ViewEvent::ValuesCommitted {
                movement, values, ..
            } => {
                self.values = values.clone();
                Some(render_frame(&self.values, &self.states, Some(movement)))
            }
            ViewEvent::RunFinished { .. } => {
                Some(render_frame(&self.values, &self.states, None))
            }
            _ => None,
        }
    }
}
