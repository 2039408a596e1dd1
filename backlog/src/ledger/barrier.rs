use tokio::sync::watch;

/// Lifecycle of an [OffsetLedger](crate::OffsetLedger).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Recovery hasn't completed. Arrivals wait.
    Initializing,
    /// Recovered and accepting arrivals and reads.
    Ready,
    /// Torn down. Terminal.
    Stopped,
}

/// One-shot gate held closed until recovery completes. Only ever moves
/// forward: `Initializing -> Ready -> Stopped`, or straight to `Stopped`.
#[derive(Debug)]
pub(crate) struct Barrier {
    tx: watch::Sender<Phase>,
}

impl Default for Barrier {
    fn default() -> Self {
        let (tx, _) = watch::channel(Phase::Initializing);
        Self { tx }
    }
}

impl Barrier {
    pub fn phase(&self) -> Phase {
        *self.tx.borrow()
    }

    /// Open the gate. Returns whether this call was the one to open it.
    pub fn open(&self) -> bool {
        self.advance(|phase| phase == Phase::Initializing, Phase::Ready)
    }

    /// Move to [Phase::Stopped], waking anything waiting on the gate.
    /// Returns whether this call was the one to stop it.
    pub fn stop(&self) -> bool {
        self.advance(|phase| phase != Phase::Stopped, Phase::Stopped)
    }

    fn advance(&self, from: impl Fn(Phase) -> bool, to: Phase) -> bool {
        self.tx.send_if_modified(|phase| {
            if from(*phase) {
                *phase = to;
                true
            } else {
                false
            }
        })
    }

    /// Suspend until the gate has left [Phase::Initializing], returning the
    /// phase it moved to.
    pub async fn wait(&self) -> Phase {
        let mut rx = self.tx.subscribe();
        loop {
            let phase = *rx.borrow_and_update();
            if phase != Phase::Initializing {
                return phase;
            }
            if rx.changed().await.is_err() {
                return Phase::Stopped;
            }
        }
    }
}
