use tokio_util::sync::CancellationToken;

/// One logical request purpose ("chapter content", "chapter list", ...).
///
/// Starting a request cancels whatever the slot was still waiting on, and a
/// response is only applied if its ticket is still the current one.
#[derive(Debug, Default)]
pub struct FetchSlot {
    generation: u64,
    token: Option<CancellationToken>,
}

#[derive(Debug, Clone)]
pub struct SlotTicket {
    generation: u64,
    token: CancellationToken,
}

impl SlotTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl FetchSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> SlotTicket {
        self.cancel();
        self.generation += 1;
        let token = CancellationToken::new();
        self.token = Some(token.clone());
        SlotTicket {
            generation: self.generation,
            token,
        }
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation && self.token.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    /// Closes the slot if `generation` is current; returns whether the
    /// response should be applied.
    pub fn complete(&mut self, generation: u64) -> bool {
        if self.is_current(generation) {
            self.token = None;
            true
        } else {
            false
        }
    }
}
