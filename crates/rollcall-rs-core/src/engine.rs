//! The intake engine: gate, step dispatch, persistence, acknowledgement.

use crate::error::CoreError;
use crate::flow::{FlowPlan, InputShape, StepInput, StepOutcome, StepSpec, advance};
use crate::gate::MembershipGate;
use crate::record::DraftRecord;
use crate::sessions::{SessionPhase, SessionStore};
use crate::texts;
use log::{debug, error, info, warn};
use rollcall_rs_config::{ReentryPolicy, RollcallConfig};
use rollcall_rs_protocol::{
    Button, ButtonMenu, ChatId, Keyboard, Transport, UserEvent, UserId,
};
use rollcall_rs_sink::RecordSink;
use std::sync::Arc;

/// Callback payload of the gate's "check again" button.
pub const CB_RECHECK: &str = "gate:recheck";
/// Callback payload of the persist-retry button.
pub const CB_RETRY_SAVE: &str = "save:retry";

/// Drives users through gate → steps → persist → terminal reply.
///
/// One event is handled at a time per user (the dispatch loop guarantees
/// single-flight), so session mutations never race.
pub struct IntakeEngine {
    transport: Arc<dyn Transport>,
    sink: Arc<dyn RecordSink>,
    gate: MembershipGate,
    plan: FlowPlan,
    sessions: SessionStore,
    reentry: ReentryPolicy,
}

impl IntakeEngine {
    /// Wire the engine from config and its collaborators.
    pub fn new(
        config: &RollcallConfig,
        transport: Arc<dyn Transport>,
        sink: Arc<dyn RecordSink>,
    ) -> Self {
        let gate = MembershipGate::new(transport.clone(), config.required_channels.clone());
        Self {
            transport,
            sink,
            gate,
            plan: FlowPlan::new(config.collect_phone),
            sessions: SessionStore::new(),
            reentry: config.reentry,
        }
    }

    /// Whether the user currently has an in-progress session.
    pub fn has_session(&self, user_id: UserId) -> bool {
        self.sessions.contains(user_id)
    }

    /// Handle one inbound user event to completion.
    pub async fn handle(&self, event: UserEvent) -> Result<(), CoreError> {
        match event {
            UserEvent::Start {
                user_id,
                chat_id,
                username,
            } => self.handle_start(user_id, chat_id, username).await,
            UserEvent::Text {
                user_id,
                chat_id,
                text,
            } => {
                self.handle_step_input(user_id, chat_id, StepInput::Text(&text))
                    .await
            }
            UserEvent::Contact {
                user_id,
                chat_id,
                contact,
            } => {
                self.handle_step_input(user_id, chat_id, StepInput::Contact(&contact))
                    .await
            }
            UserEvent::Callback {
                user_id,
                chat_id,
                username,
                press,
            } => {
                if let Err(err) = self.transport.answer_callback(&press.id).await {
                    warn!(
                        "failed to answer callback (user_id={}, error={})",
                        user_id, err
                    );
                }
                self.handle_callback(user_id, chat_id, username, &press.data)
                    .await
            }
        }
    }

    async fn handle_start(
        &self,
        user_id: UserId,
        chat_id: ChatId,
        username: Option<String>,
    ) -> Result<(), CoreError> {
        if self.reentry == ReentryPolicy::Resume
            && let Some(phase) = self.sessions.with_session(user_id, |session| session.phase)
        {
            debug!("resuming session on repeated start (user_id={})", user_id);
            return self.reprompt_phase(chat_id, phase).await;
        }

        self.sessions.remove(user_id);
        if self.gate.is_enabled() && !self.gate.check(user_id).await.passed() {
            return self.send_gate_menu(chat_id, texts::GATE_PROMPT).await;
        }
        self.begin_flow(user_id, chat_id, username, None).await
    }

    async fn handle_callback(
        &self,
        user_id: UserId,
        chat_id: ChatId,
        username: Option<String>,
        data: &str,
    ) -> Result<(), CoreError> {
        match data {
            CB_RECHECK => {
                if self.gate.is_enabled() && !self.gate.check(user_id).await.passed() {
                    return self.send_gate_menu(chat_id, texts::GATE_STILL_MISSING).await;
                }
                self.begin_flow(user_id, chat_id, username, Some(texts::GATE_CONFIRMED))
                    .await
            }
            CB_RETRY_SAVE => {
                match self.sessions.with_session(user_id, |session| session.phase) {
                    Some(SessionPhase::SaveFailed) => {
                        self.persist_and_ack(user_id, chat_id).await
                    }
                    _ => {
                        self.transport
                            .send(chat_id, texts::USE_START, Keyboard::None)
                            .await?;
                        Ok(())
                    }
                }
            }
            other => {
                debug!(
                    "ignoring unknown callback (user_id={}, data={})",
                    user_id, other
                );
                Ok(())
            }
        }
    }

    async fn handle_step_input(
        &self,
        user_id: UserId,
        chat_id: ChatId,
        input: StepInput<'_>,
    ) -> Result<(), CoreError> {
        let Some(phase) = self.sessions.with_session(user_id, |session| session.phase) else {
            self.transport
                .send(chat_id, texts::USE_START, Keyboard::None)
                .await?;
            return Ok(());
        };

        let cursor = match phase {
            SessionPhase::SaveFailed => return self.send_retry_menu(chat_id).await,
            SessionPhase::InStep(cursor) => cursor,
        };

        // The phase moves to SaveFailed as soon as the sequence completes; a
        // successful persist removes the session entirely.
        let outcome = self.sessions.with_session(user_id, |session| {
            let outcome = advance(&self.plan, cursor, input, &mut session.draft);
            match outcome {
                StepOutcome::Advance(next) => session.phase = SessionPhase::InStep(next),
                StepOutcome::Complete => session.phase = SessionPhase::SaveFailed,
                StepOutcome::Reprompt => {}
            }
            outcome
        });
        let Some(outcome) = outcome else {
            return Ok(());
        };

        match outcome {
            StepOutcome::Reprompt => {
                debug!(
                    "reprompting step (user_id={}, cursor={})",
                    user_id, cursor
                );
                if let Some(step) = self.plan.step(cursor) {
                    self.prompt_step(chat_id, step).await?;
                }
                Ok(())
            }
            StepOutcome::Advance(next) => {
                if let Some(step) = self.plan.step(next) {
                    self.prompt_step(chat_id, step).await?;
                }
                Ok(())
            }
            StepOutcome::Complete => self.persist_and_ack(user_id, chat_id).await,
        }
    }

    /// Hand the completed record to the sink and acknowledge the outcome.
    async fn persist_and_ack(&self, user_id: UserId, chat_id: ChatId) -> Result<(), CoreError> {
        let Some(draft) = self
            .sessions
            .with_session(user_id, |session| session.draft.clone())
        else {
            return Ok(());
        };
        let record = draft.finish(&self.plan)?;

        match self.sink.persist(&record).await {
            Ok(()) => {
                self.sessions.remove(user_id);
                info!(
                    "record persisted (sink={}, user_id={})",
                    self.sink.kind(),
                    user_id
                );
                self.transport
                    .send(chat_id, texts::SAVED, Keyboard::Remove)
                    .await?;
                Ok(())
            }
            Err(err) => {
                error!(
                    "persist failed (sink={}, user_id={}, error={})",
                    self.sink.kind(),
                    user_id,
                    err
                );
                self.send_retry_menu(chat_id).await
            }
        }
    }

    /// Start a fresh session and send the first prompt, optionally prefixed
    /// (the recheck confirmation leads straight into the first question).
    async fn begin_flow(
        &self,
        user_id: UserId,
        chat_id: ChatId,
        username: Option<String>,
        preamble: Option<&str>,
    ) -> Result<(), CoreError> {
        self.sessions
            .begin(user_id, chat_id, DraftRecord::new(user_id, username));
        info!(
            "intake started (user_id={}, steps={})",
            user_id,
            self.plan.len()
        );
        let Some(first) = self.plan.step(0) else {
            return Ok(());
        };
        let text = match preamble {
            Some(preamble) => format!("{preamble}\n\n{}", first.prompt),
            None => first.prompt.to_string(),
        };
        self.transport.send(chat_id, &text, Keyboard::Remove).await?;
        Ok(())
    }

    async fn prompt_step(&self, chat_id: ChatId, step: &StepSpec) -> Result<(), CoreError> {
        let keyboard = match step.expects {
            InputShape::Text => Keyboard::None,
            InputShape::Contact => Keyboard::Contact {
                button_label: texts::CONTACT_BUTTON.to_string(),
            },
        };
        self.transport.send(chat_id, step.prompt, keyboard).await?;
        Ok(())
    }

    async fn reprompt_phase(&self, chat_id: ChatId, phase: SessionPhase) -> Result<(), CoreError> {
        match phase {
            SessionPhase::InStep(cursor) => {
                if let Some(step) = self.plan.step(cursor) {
                    self.prompt_step(chat_id, step).await?;
                }
                Ok(())
            }
            SessionPhase::SaveFailed => self.send_retry_menu(chat_id).await,
        }
    }

    /// One join-URL button per required channel plus the recheck button.
    async fn send_gate_menu(&self, chat_id: ChatId, text: &str) -> Result<(), CoreError> {
        let mut buttons: Vec<Button> = self
            .gate
            .channels()
            .iter()
            .map(|channel| Button::url(format!("📢 Join {channel}"), join_url(channel)))
            .collect();
        buttons.push(Button::callback(texts::GATE_RECHECK_LABEL, CB_RECHECK));
        self.transport
            .send(
                chat_id,
                text,
                Keyboard::Menu(ButtonMenu::single_column(buttons)),
            )
            .await?;
        Ok(())
    }

    async fn send_retry_menu(&self, chat_id: ChatId) -> Result<(), CoreError> {
        let menu = ButtonMenu::single_column(vec![Button::callback(
            texts::RETRY_LABEL,
            CB_RETRY_SAVE,
        )]);
        self.transport
            .send(chat_id, texts::SAVE_FAILED, Keyboard::Menu(menu))
            .await?;
        Ok(())
    }
}

/// Public join link for an `@handle`.
fn join_url(channel: &str) -> String {
    format!("https://t.me/{}", channel.trim_start_matches('@'))
}

#[cfg(test)]
mod tests {
    use super::join_url;
    use pretty_assertions::assert_eq;

    #[test]
    fn join_url_strips_the_handle_prefix() {
        assert_eq!(join_url("@kh_journey"), "https://t.me/kh_journey");
        assert_eq!(join_url("kh_journey"), "https://t.me/kh_journey");
    }
}
