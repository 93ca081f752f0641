//! The conversational turn pipeline
//!
//! A plain ordered pipeline, one stage after another: append the user turn,
//! classify intent, detect language, retrieve supporting context, generate
//! a grounded reply, append the assistant turn. Each stage is a single call
//! into a remote service; any failure propagates to the webhook handler,
//! which answers with a fixed apology instead.

use std::sync::Arc;

use crate::intent::Intent;
use crate::language::{self, Translator};
use crate::llm::ChatModel;
use crate::prompt;
use crate::retrieval::Retriever;
use crate::store::{ConversationStore, Turn};
use crate::Result;

/// Per-turn working state, created fresh per inbound message
#[derive(Debug, Default)]
pub struct ChatState {
    /// The user's current query
    pub query: String,
    /// Snapshot of the sender's conversation history
    pub chat_history: Vec<Turn>,
    /// Retrieved knowledge snippets, best match first
    pub context: Vec<String>,
    /// The generated reply, once produced
    pub response: Option<String>,
}

/// Orchestrates one conversational turn end to end
pub struct Pipeline {
    chat: Arc<dyn ChatModel>,
    retriever: Arc<dyn Retriever>,
    translator: Option<Arc<dyn Translator>>,
    store: ConversationStore,
}

impl Pipeline {
    /// Create a new pipeline
    #[must_use]
    pub fn new(
        chat: Arc<dyn ChatModel>,
        retriever: Arc<dyn Retriever>,
        translator: Option<Arc<dyn Translator>>,
    ) -> Self {
        Self {
            chat,
            retriever,
            translator,
            store: ConversationStore::new(),
        }
    }

    /// The conversation store backing this pipeline
    #[must_use]
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Classify the query into the closed intent set
    ///
    /// The model's raw label is normalized; unrecognized output becomes
    /// [`Intent::Other`].
    async fn classify_intent(&self, query: &str) -> Result<Intent> {
        let raw = self
            .chat
            .complete(prompt::INTENT_SYSTEM_PROMPT, &prompt::intent_prompt(query))
            .await?;
        let intent = Intent::from_label(&raw);
        tracing::debug!(label = raw.trim(), intent = %intent, "classified intent");
        Ok(intent)
    }

    /// Bring a non-English query into English for retrieval
    ///
    /// The knowledge collections are English. Translation failure is
    /// non-fatal: the raw query is used instead.
    async fn query_for_retrieval(&self, query: &str) -> String {
        let lang = language::detect_lang(query);
        if lang == "en" {
            return query.to_string();
        }

        let Some(translator) = &self.translator else {
            return query.to_string();
        };

        match translator.translate(query, lang, "en").await {
            Ok(translated) => {
                tracing::debug!(lang, "translated query for retrieval");
                translated
            }
            Err(e) => {
                tracing::warn!(lang, error = %e, "translation failed, using raw query");
                query.to_string()
            }
        }
    }

    /// Run one full turn for a sender: returns the generated reply
    ///
    /// # Errors
    ///
    /// Returns error if classification, retrieval, or generation fails, or
    /// if the model's reply lacks the expected response tags. The user turn
    /// is already stored when that happens; no assistant turn is added.
    pub async fn handle_turn(&self, sender: &str, query: &str) -> Result<String> {
        self.store.append(sender, Turn::user(query));

        let mut state = ChatState {
            query: query.to_string(),
            chat_history: self.store.history(sender),
            context: Vec::new(),
            response: None,
        };

        let intent = self.classify_intent(&state.query).await?;
        let search_query = self.query_for_retrieval(&state.query).await;
        state.context = self.retriever.retrieve(intent, &search_query).await?;

        let user_prompt = prompt::response_prompt(&state.context, &state.chat_history, &state.query);
        let raw = self
            .chat
            .complete(prompt::response_system_prompt(), &user_prompt)
            .await?;
        let reply = prompt::extract_response(&raw)?;

        self.store.append(sender, Turn::assistant(reply.clone()));
        state.response = Some(reply.clone());

        tracing::info!(sender, intent = %intent, "generated reply");
        Ok(reply)
    }
}
