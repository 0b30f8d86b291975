//! Application state wiring all services together.
//!
//! The core services are generic over the store/provider/notifier traits;
//! AppState pins them to the concrete infra implementations and hands the
//! result to the HTTP handlers.

use std::sync::Arc;

use heritagebox_core::chat::assembler::ConversationAssembler;
use heritagebox_core::handoff::HandoffCoordinator;
use heritagebox_core::inbound::InboundRouter;
use heritagebox_core::poll::PollingResponder;
use heritagebox_core::pricing::PricingCache;
use heritagebox_core::session::InMemorySessionStore;
use heritagebox_infra::airtable::AirtableProductStore;
use heritagebox_infra::config::AppConfig;
use heritagebox_infra::llm::openai::OpenAiProvider;
use heritagebox_infra::slack::SlackNotifier;
use heritagebox_infra::stripe::StripeClient;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteAssembler =
    ConversationAssembler<InMemorySessionStore, OpenAiProvider, AirtableProductStore>;

pub type ConcreteHandoff = HandoffCoordinator<InMemorySessionStore, SlackNotifier>;

pub type ConcreteInboundRouter = InboundRouter<InMemorySessionStore>;

pub type ConcretePoller = PollingResponder<InMemorySessionStore>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub assembler: Arc<ConcreteAssembler>,
    pub handoff: Arc<ConcreteHandoff>,
    pub inbound: Arc<ConcreteInboundRouter>,
    pub poller: Arc<ConcretePoller>,
    pub payments: Arc<StripeClient>,
    /// Shared with every service above; the sweeper task reaps it directly.
    pub store: Arc<InMemorySessionStore>,
}

impl AppState {
    /// Wire the services against the environment configuration.
    pub fn init(config: &AppConfig) -> Self {
        let store = Arc::new(InMemorySessionStore::new());

        let provider = OpenAiProvider::new(config.openai_api_key.clone());
        let pricing = PricingCache::new(AirtableProductStore::new(
            config.airtable_api_key.clone(),
            config.airtable_base_id.clone(),
        ));
        let assembler = Arc::new(ConversationAssembler::new(
            store.clone(),
            provider,
            pricing,
            config.openai_model.clone(),
        ));

        let notifier = SlackNotifier::new(
            config.slack_bot_token.clone(),
            config.slack_channel.clone(),
        );
        let handoff = Arc::new(HandoffCoordinator::new(store.clone(), notifier));

        let inbound = Arc::new(InboundRouter::new(store.clone()));
        let poller = Arc::new(PollingResponder::new(store.clone()));

        let payments = Arc::new(StripeClient::new(
            config.stripe_secret_key.clone(),
            config.stripe_live_mode,
        ));

        Self {
            assembler,
            handoff,
            inbound,
            poller,
            payments,
            store,
        }
    }
}
