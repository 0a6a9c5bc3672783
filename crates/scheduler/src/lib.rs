//! Dispatch scheduler — the broadcast cycle engine.
//!
//! Drives the unbounded outer cycle: for each token in configured order,
//! resolve a session, post one randomly chosen catalog line to each channel
//! in configured order, and apply the configured waits between steps. A
//! failure anywhere in one token's work is caught at the token boundary and
//! never reaches the next token or the next cycle.
//!
//! Everything runs on a single logical task. Waits and network calls are the
//! only suspension points; no two tokens and no two channels are ever
//! processed concurrently. Sequential pacing is intentional — it keeps the
//! output readable and avoids burst rate-limiting.

use std::sync::Arc;
use std::time::Duration;

use drumbeat_core::catalog::MessageCatalog;
use drumbeat_core::channel::ChannelId;
use drumbeat_core::client::MessagingClient;
use drumbeat_core::error::{ClientError, Error};
use drumbeat_core::token::{Session, Token};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// The three pacing knobs of the dispatch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayConfig {
    /// Wait between channel posts (also after the last one).
    pub message_delay: Duration,
    /// Wait between tokens (also after a failed one).
    pub token_delay: Duration,
    /// Wait between full cycles.
    pub restart_delay: Duration,
}

impl DelayConfig {
    pub fn from_secs(message: u64, token: u64, restart: u64) -> Self {
        Self {
            message_delay: Duration::from_secs(message),
            token_delay: Duration::from_secs(token),
            restart_delay: Duration::from_secs(restart),
        }
    }
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self::from_secs(2, 5, 10)
    }
}

/// Outcome of one full pass over all tokens and channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// Messages successfully delivered this cycle.
    pub sent: usize,
    /// Tokens whose work was aborted by a caught failure.
    pub failed_tokens: usize,
}

/// Orchestrates the unbounded cycle of sends with deterministic ordering and
/// isolated failure domains.
pub struct DispatchScheduler {
    client: Arc<dyn MessagingClient>,
    tokens: Vec<Token>,
    channels: Vec<ChannelId>,
    catalog: MessageCatalog,
    delays: DelayConfig,
    rng: SmallRng,
}

impl DispatchScheduler {
    /// Build a scheduler over validated inputs.
    ///
    /// The token and channel sets must be non-empty; the catalog is non-empty
    /// by construction. These are startup preconditions — violations are
    /// configuration errors, not runtime events.
    pub fn new(
        client: Arc<dyn MessagingClient>,
        tokens: Vec<Token>,
        channels: Vec<ChannelId>,
        catalog: MessageCatalog,
        delays: DelayConfig,
    ) -> Result<Self, Error> {
        if tokens.is_empty() {
            return Err(Error::Config {
                message: "no token provided".into(),
            });
        }
        if channels.is_empty() {
            return Err(Error::Config {
                message: "no channel_id provided".into(),
            });
        }

        Ok(Self {
            client,
            tokens,
            channels,
            catalog,
            delays,
            rng: SmallRng::from_os_rng(),
        })
    }

    /// Replace the message-selection RNG with a seeded one. Selection becomes
    /// deterministic; ordering and pacing are unaffected.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// Run the dispatch loop forever.
    ///
    /// There is no termination condition: only a process-level signal or a
    /// panic escaping the token boundary ends it.
    pub async fn run(mut self) {
        info!(
            platform = self.client.name(),
            tokens = self.tokens.len(),
            channels = self.channels.len(),
            messages = self.catalog.len(),
            "Dispatch loop starting"
        );

        let mut cycle: u64 = 0;
        loop {
            cycle += 1;
            let stats = self.run_cycle().await;
            info!(
                cycle,
                sent = stats.sent,
                failed_tokens = stats.failed_tokens,
                seconds = self.delays.restart_delay.as_secs(),
                "Cycle complete, waiting before restarting"
            );
            sleep(self.delays.restart_delay).await;
        }
    }

    /// One full pass: every token in configured order, each isolated.
    ///
    /// The `match` here is the credential isolation boundary — errors from
    /// one token's work are converted to a log line and the loop moves on.
    /// The inter-token wait applies after failures too.
    pub async fn run_cycle(&mut self) -> CycleStats {
        let mut stats = CycleStats::default();

        for i in 0..self.tokens.len() {
            let token = self.tokens[i].clone();
            match self.process_token(&token).await {
                Ok(sent) => {
                    stats.sent += sent;
                    debug!(token = %token.fingerprint(), sent, "Token processed");
                }
                Err(e) => {
                    stats.failed_tokens += 1;
                    error!(
                        token = %token.fingerprint(),
                        error = %e,
                        "Skipping token due to error"
                    );
                }
            }

            info!(
                seconds = self.delays.token_delay.as_secs(),
                "Waiting before processing the next token"
            );
            sleep(self.delays.token_delay).await;
        }

        stats
    }

    /// Process one token: resolve a session, then post to every channel in
    /// configured order. Any failure short-circuits the remaining channels
    /// for this token via `?` — isolation is whole-token, not per-channel.
    async fn process_token(&mut self, token: &Token) -> Result<usize, ClientError> {
        let identity = self.client.identify(token).await?;
        let session = Session::new(token.clone(), identity);

        let mut sent = 0;
        for channel in &self.channels {
            let content = self.catalog.pick(&mut self.rng);
            let receipt = self.client.send(&session, channel, content).await?;
            sent += 1;
            info!(
                identity = %session.identity,
                channel = %channel,
                message = %content,
                message_id = %receipt.message_id,
                "Message sent"
            );

            // Unconditional, including after the last channel.
            info!(
                seconds = self.delays.message_delay.as_secs(),
                "Waiting before the next message"
            );
            sleep(self.delays.message_delay).await;
        }

        Ok(sent)
    }
}

impl std::fmt::Debug for DispatchScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchScheduler")
            .field("platform", &self.client.name())
            .field("tokens", &self.tokens.len())
            .field("channels", &self.channels.len())
            .field("messages", &self.catalog.len())
            .field("delays", &self.delays)
            .finish()
    }
}
