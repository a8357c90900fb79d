use shared::{
    domain::{ElementState, Highlight, Position},
    error::EngineError,
    protocol::{Movement, ViewEvent},
};
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    value: i64,
    settled: bool,
    highlight: Option<Highlight>,
}

impl Slot {
    fn new(value: i64) -> Self {
        Self {
            value,
            settled: false,
            highlight: None,
        }
    }

    fn state(&self) -> ElementState {
        match (self.highlight, self.settled) {
            (Some(highlight), _) => highlight.into(),
            (None, true) => ElementState::Settled,
            (None, false) => ElementState::Neutral,
        }
    }
}

/// The `settled` flag only ever goes from false to true until the store is
/// restored; highlights sit on top of it and clearing one reveals whatever
/// was underneath.
pub struct SequenceStore {
    input: Vec<i64>,
    slots: Vec<Slot>,
    events: broadcast::Sender<ViewEvent>,
}

impl SequenceStore {
    pub fn new(events: broadcast::Sender<ViewEvent>) -> Self {
        Self {
            input: Vec::new(),
            slots: Vec::new(),
            events,
        }
    }

    pub fn load(&mut self, values: Vec<i64>) {
        self.input = values;
        self.restore();
    }

    pub fn restore(&mut self) {
        self.slots = self.input.iter().copied().map(Slot::new).collect();
        let _ = self.events.send(ViewEvent::SequenceLoaded {
            values: self.input.clone(),
        });
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn values(&self) -> Vec<i64> {
        self.slots.iter().map(|slot| slot.value).collect()
    }

    pub fn states(&self) -> Vec<ElementState> {
        self.slots.iter().map(Slot::state).collect()
    }

    pub fn check(&self, position: Position) -> Result<(), EngineError> {
        if position.0 < self.slots.len() {
            Ok(())
        } else {
            Err(EngineError::PositionOutOfBounds {
                position: position.0,
                len: self.slots.len(),
            })
        }
    }

    pub fn value(&self, position: Position) -> Result<i64, EngineError> {
        self.slot(position).map(|slot| slot.value)
    }

    pub fn highlight(&mut self, position: Position, highlight: Highlight) -> Result<(), EngineError> {
        self.update(position, |slot| slot.highlight = Some(highlight))
    }

    pub fn clear_highlight(&mut self, position: Position) -> Result<(), EngineError> {
        self.update(position, |slot| slot.highlight = None)
    }

    pub fn settle(&mut self, position: Position) -> Result<(), EngineError> {
        self.update(position, |slot| slot.settled = true)
    }

    pub fn apply(&mut self, movement: &Movement) -> Result<Vec<i64>, EngineError> {
        match *movement {
            Movement::Swap { a, b } => {
                self.check(a)?;
                self.check(b)?;
                let (left, right) = (self.slots[a.0].value, self.slots[b.0].value);
                self.slots[a.0].value = right;
                self.slots[b.0].value = left;
            }
            Movement::Shift { from, to } => {
                self.check(from)?;
                self.check(to)?;
                let mut values = self.values();
                if to <= from {
                    values[to.0..=from.0].rotate_right(1);
                } else {
                    values[from.0..=to.0].rotate_left(1);
                }
                for (slot, value) in self.slots.iter_mut().zip(values) {
                    slot.value = value;
                }
            }
        }
        Ok(self.values())
    }

    fn slot(&self, position: Position) -> Result<&Slot, EngineError> {
        self.check(position)?;
        Ok(&self.slots[position.0])
    }

    fn update(
        &mut self,
        position: Position,
        change: impl FnOnce(&mut Slot),
    ) -> Result<(), EngineError> {
        self.check(position)?;
        let slot = &mut self.slots[position.0];
        let before = *slot;
        change(slot);
        if *slot != before {
            let _ = self.events.send(ViewEvent::StateChanged {
                position,
                state: slot.state(),
                settled: slot.settled,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/sequence_tests.rs"]
mod tests;
