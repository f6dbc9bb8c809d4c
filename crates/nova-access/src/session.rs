//! Session controller: sign-in, onboarding, chat accounting, admin
//! elevation and dashboard operations over one device's state.
//!
//! Every mutation ends with an explicit write-through of the slots it
//! touched.

use chrono::Utc;
use nova_core::error::NovaResult;
use nova_core::models::audit::{AuditEventKind, AuditTrail};
use nova_core::models::chat::{
    ChatArchive, ChatLog, InteractionMode, Message, MessageRole, Source,
};
use nova_core::models::feedback::{FeedbackArchive, FeedbackLog, Rating};
use nova_core::models::mode::AppMode;
use nova_core::models::plan::Plan;
use nova_core::models::profile::{Role, UserProfile, UserType};
use nova_core::models::registry::UserRegistry;
use nova_core::models::security::SecuritySettings;
use nova_core::repository::StateRepository;
use tracing::{info, warn};

use crate::audit;
use crate::config::AccessConfig;
use crate::error::AccessError;
use crate::gate::{AccessGate, GateOutcome, GateStep};
use crate::ledger::{CreditLedger, PlanOutcome};
use crate::login;
use crate::onboarding::OnboardingStep;
use crate::password;
use crate::rotation::{self, KeyRotationForm};
use crate::words::count_words;

/// Which surface the shell should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Onboarding(OnboardingStep),
    Chat(InteractionMode),
    CreditsExhausted,
    AdminDashboard,
}

/// Session controller.
///
/// Generic over the repository implementation so that the access layer
/// has no dependency on the store crate.
pub struct Session<R: StateRepository> {
    repo: R,
    config: AccessConfig,
    profile: UserProfile,
    registry: UserRegistry,
    chats: ChatArchive,
    feedback: FeedbackArchive,
    audit: AuditTrail,
    mode: AppMode,
    security: SecuritySettings,
    onboarding: OnboardingStep,
    interaction: InteractionMode,
    conversation: Vec<Message>,
    gate: AccessGate,
    dashboard_open: bool,
}

impl<R: StateRepository> Session<R> {
    /// Load every slot once and restore the shell state.
    pub async fn open(repo: R, config: AccessConfig) -> NovaResult<Self> {
        let profile: UserProfile = repo.load().await?;
        let registry: UserRegistry = repo.load().await?;
        let chats: ChatArchive = repo.load().await?;
        let feedback: FeedbackArchive = repo.load().await?;
        let audit: AuditTrail = repo.load().await?;
        let mode: AppMode = repo.load().await?;
        let mut security: SecuritySettings = repo.load().await?;
        if password::provision(&mut security)? {
            repo.save(&security).await?;
        }

        let session = Self {
            onboarding: OnboardingStep::for_profile(&profile),
            repo,
            config,
            profile,
            registry,
            chats,
            feedback,
            audit,
            mode,
            security,
            interaction: InteractionMode::default(),
            conversation: Vec::new(),
            gate: AccessGate::new(),
            dashboard_open: false,
        };
        info!(
            authenticated = session.profile.is_authenticated,
            mode = %session.mode,
            "Session opened"
        );
        Ok(session)
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    pub fn interaction_mode(&self) -> InteractionMode {
        self.interaction
    }

    pub fn onboarding_step(&self) -> OnboardingStep {
        self.onboarding
    }

    /// Current text conversation, oldest first.
    pub fn conversation(&self) -> &[Message] {
        &self.conversation
    }

    pub fn gate_step(&self) -> Option<GateStep> {
        self.gate.step()
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Route between login, onboarding, chat and the admin dashboard.
    pub fn view(&self) -> View {
        if !self.profile.is_authenticated {
            View::Login
        } else if self.dashboard_open && self.profile.is_admin() {
            View::AdminDashboard
        } else if !self.onboarding.is_complete() {
            View::Onboarding(self.onboarding)
        } else if self.is_exhausted() {
            View::CreditsExhausted
        } else {
            View::Chat(self.interaction)
        }
    }

    // -----------------------------------------------------------------------
    // Sign-in and onboarding
    // -----------------------------------------------------------------------

    /// Sign in with an email on the permitted domain.
    ///
    /// A known email restores its registry snapshot and skips
    /// onboarding; a new one starts a fresh free-tier profile.
    pub async fn login(&mut self, email: &str) -> NovaResult<()> {
        let email = match login::normalize_email(email, &self.config.allowed_email_domain) {
            Ok(email) => email,
            Err(e) => {
                self.record_audit(
                    AuditEventKind::LoginFailed,
                    format!("Rejected sign-in for: {}", email.trim()),
                )
                .await?;
                return Err(e.into());
            }
        };

        self.profile = match self.registry.get(&email) {
            Some(existing) => UserProfile {
                is_authenticated: true,
                ..existing.clone()
            },
            None => UserProfile::new(email.clone()),
        };
        self.onboarding = OnboardingStep::for_profile(&self.profile);
        self.dashboard_open = false;
        self.gate.close();
        self.conversation.clear();

        self.record_audit(
            AuditEventKind::LoginSuccess,
            format!("Authenticated via Gmail: {email}"),
        )
        .await?;
        self.persist_profile().await
    }

    pub async fn logout(&mut self) -> NovaResult<()> {
        info!(email = %self.profile.email, "Signed out");
        self.profile.is_authenticated = false;
        self.dashboard_open = false;
        self.gate.close();
        self.conversation.clear();
        self.persist_profile().await
    }

    pub fn begin_onboarding(&mut self) -> NovaResult<()> {
        self.onboarding = self.onboarding.start()?;
        Ok(())
    }

    pub async fn choose_user_type(&mut self, user_type: UserType) -> NovaResult<()> {
        self.onboarding = self.onboarding.choose_type(&mut self.profile, user_type)?;
        self.persist_profile().await
    }

    pub async fn submit_name(&mut self, name: &str) -> NovaResult<()> {
        self.onboarding = self.onboarding.submit_name(&mut self.profile, name)?;
        info!(email = %self.profile.email, "Onboarding complete");
        self.persist_profile().await
    }

    pub fn onboarding_back(&mut self) {
        self.onboarding = self.onboarding.back();
    }

    pub fn toggle_interaction_mode(&mut self) -> InteractionMode {
        self.interaction = self.interaction.toggled();
        self.interaction
    }

    // -----------------------------------------------------------------------
    // Credits
    // -----------------------------------------------------------------------

    pub fn is_exhausted(&self) -> bool {
        CreditLedger::is_exhausted(&self.profile, self.mode)
    }

    /// Charge `words` against the balance and persist.
    pub async fn deduct(&mut self, words: u64) -> NovaResult<()> {
        if CreditLedger::deduct(&mut self.profile, self.mode, words) {
            self.persist_profile().await?;
        }
        Ok(())
    }

    /// Activate a plan after `confirm` accepts it. Only possible in
    /// `test` mode.
    pub async fn apply_plan(
        &mut self,
        plan_id: &str,
        confirm: impl FnOnce(&Plan) -> bool,
    ) -> NovaResult<PlanOutcome> {
        let outcome = CreditLedger::apply_plan(&mut self.profile, self.mode, plan_id, confirm)
            .inspect_err(|e| warn!(plan = plan_id, error = %e, "Plan rejected"))?;
        if let PlanOutcome::Applied { .. } = outcome {
            self.persist_profile().await?;
        }
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Chat accounting
    // -----------------------------------------------------------------------

    /// Account for one text exchange: the outbound text and the reply
    /// are charged separately, then the transcript is archived.
    /// `sources` are the web citations attached to the reply.
    pub async fn record_text_exchange(
        &mut self,
        user_text: &str,
        reply_text: &str,
        sources: Vec<Source>,
        summary: Option<String>,
    ) -> NovaResult<()> {
        self.require_chat_allowed()?;
        self.deduct(count_words(user_text)).await?;
        self.conversation
            .push(Message::new(MessageRole::User, user_text));

        self.deduct(count_words(reply_text)).await?;
        self.conversation
            .push(Message::new(MessageRole::Assistant, reply_text).with_sources(sources));

        if self.profile.is_admin() {
            return Ok(());
        }
        self.chats.prepend(
            ChatLog {
                user_name: self.profile.name.clone(),
                messages: self.conversation.clone(),
                timestamp: Utc::now(),
                summary,
            },
            self.config.chat_retention,
        );
        self.repo.save(&self.chats).await
    }

    /// Account for one completed voice turn.
    pub async fn record_voice_turn(
        &mut self,
        input_transcript: &str,
        output_transcript: &str,
    ) -> NovaResult<()> {
        self.require_chat_allowed()?;
        let words = count_words(input_transcript) + count_words(output_transcript);
        self.deduct(words).await
    }

    pub async fn record_feedback(&mut self, rating: Rating) -> NovaResult<()> {
        self.require_authenticated()?;
        self.feedback.prepend(
            FeedbackLog {
                user_name: self.profile.name.clone(),
                user_type: self.profile.user_type,
                rating,
                timestamp: Utc::now(),
            },
            self.config.feedback_retention,
        );
        self.repo.save(&self.feedback).await
    }

    // -----------------------------------------------------------------------
    // Access gate
    // -----------------------------------------------------------------------

    /// Open the gate at `Confirm`.
    pub fn open_admin_gate(&mut self) -> NovaResult<()> {
        self.require_authenticated()?;
        self.gate.open(Utc::now())?;
        Ok(())
    }

    pub fn close_admin_gate(&mut self) {
        self.gate.close();
    }

    /// Type into the gate's challenge field.
    pub fn set_gate_input(&mut self, value: impl Into<String>) {
        self.gate.set_input(value);
    }

    pub async fn confirm_admin(&mut self, accepted: bool) -> NovaResult<GateOutcome> {
        let outcome = self.gate.confirm(accepted)?;
        self.apply_gate_outcome(&outcome).await?;
        Ok(outcome)
    }

    pub async fn submit_admin_key(&mut self) -> NovaResult<GateOutcome> {
        let outcome = self
            .gate
            .submit_password(&self.security, &self.config, Utc::now())?;
        self.apply_gate_outcome(&outcome).await?;
        Ok(outcome)
    }

    pub async fn submit_security_pin(&mut self) -> NovaResult<GateOutcome> {
        let outcome = self
            .gate
            .submit_pin(&self.security, &self.config, Utc::now())?;
        self.apply_gate_outcome(&outcome).await?;
        Ok(outcome)
    }

    pub fn request_recovery(&mut self) -> NovaResult<GateOutcome> {
        Ok(self.gate.request_recovery(&self.security)?)
    }

    pub async fn submit_recovery_answer(&mut self) -> NovaResult<GateOutcome> {
        let outcome = self
            .gate
            .submit_recovery(&self.security, &self.config, Utc::now())?;
        self.apply_gate_outcome(&outcome).await?;
        Ok(outcome)
    }

    async fn apply_gate_outcome(&mut self, outcome: &GateOutcome) -> NovaResult<()> {
        match outcome {
            GateOutcome::Advanced(_) => Ok(()),
            GateOutcome::Denied { kind, details } => self.record_audit(*kind, *details).await,
            GateOutcome::Granted { via_recovery } => self.grant_admin(*via_recovery).await,
        }
    }

    async fn grant_admin(&mut self, via_recovery: bool) -> NovaResult<()> {
        if via_recovery {
            self.record_audit(
                AuditEventKind::PasswordReset,
                "PIN challenge satisfied via recovery question.",
            )
            .await?;
        }
        self.record_audit(
            AuditEventKind::Success,
            "Full administrative clearance granted.",
        )
        .await?;

        self.profile.role = Role::Admin;
        self.profile.credits = self.config.admin_credit_allowance;
        self.profile.name = self.config.admin_display_name.clone();
        self.dashboard_open = true;
        info!(email = %self.profile.email, "Administrative access granted");
        self.persist_profile().await
    }

    // -----------------------------------------------------------------------
    // Admin dashboard
    // -----------------------------------------------------------------------

    pub fn open_dashboard(&mut self) -> NovaResult<()> {
        self.require_admin()?;
        self.dashboard_open = true;
        Ok(())
    }

    pub fn leave_dashboard(&mut self) {
        self.dashboard_open = false;
    }

    pub fn users(&self) -> NovaResult<impl Iterator<Item = &UserProfile>> {
        self.require_admin()?;
        Ok(self.registry.iter())
    }

    pub fn chat_logs(&self) -> NovaResult<&ChatArchive> {
        self.require_admin()?;
        Ok(&self.chats)
    }

    pub fn feedback_logs(&self) -> NovaResult<&FeedbackArchive> {
        self.require_admin()?;
        Ok(&self.feedback)
    }

    pub fn audit_log(&self) -> NovaResult<&AuditTrail> {
        self.require_admin()?;
        Ok(&self.audit)
    }

    pub fn security(&self) -> NovaResult<&SecuritySettings> {
        self.require_admin()?;
        Ok(&self.security)
    }

    /// Switch between `test` and `paid`.
    pub async fn toggle_app_mode(&mut self) -> NovaResult<AppMode> {
        self.require_admin()?;
        self.mode = self.mode.toggled();
        info!(mode = %self.mode, "App mode changed");
        self.repo.save(&self.mode).await?;
        Ok(self.mode)
    }

    /// Replace the admin key from the rotation form.
    pub async fn rotate_admin_key(&mut self, form: &mut KeyRotationForm) -> NovaResult<()> {
        self.require_admin()?;
        rotation::rotate_key(&mut self.security, form, Utc::now())
            .inspect_err(|e| warn!(error = %e, "Key rotation rejected"))?;
        self.repo.save(&self.security).await?;
        self.record_audit(AuditEventKind::KeyRotation, "Key rotated.")
            .await
    }

    pub async fn toggle_mfa(&mut self) -> NovaResult<bool> {
        self.require_admin()?;
        let kind = rotation::toggle_mfa(&mut self.security);
        self.repo.save(&self.security).await?;
        let details = if self.security.is_mfa_enabled {
            "Secondary PIN verification enabled."
        } else {
            "Secondary PIN verification disabled."
        };
        self.record_audit(kind, details).await?;
        Ok(self.security.is_mfa_enabled)
    }

    /// Set or clear the answer to the recovery question.
    pub async fn set_recovery_answer(&mut self, answer: Option<String>) -> NovaResult<()> {
        self.require_admin()?;
        self.security.recovery_answer_hash = match answer.filter(|a| !a.trim().is_empty()) {
            Some(answer) => Some(password::hash_recovery_answer(&answer)?),
            None => None,
        };
        info!(enabled = self.security.has_recovery(), "Recovery answer updated");
        self.repo.save(&self.security).await
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn require_authenticated(&self) -> Result<(), AccessError> {
        if self.profile.is_authenticated {
            Ok(())
        } else {
            Err(AccessError::NotAuthenticated)
        }
    }

    /// Chat turns need a signed-in user with credits left.
    fn require_chat_allowed(&self) -> Result<(), AccessError> {
        self.require_authenticated()?;
        if self.is_exhausted() {
            warn!(email = %self.profile.email, "Chat refused: credits exhausted");
            return Err(AccessError::CreditsExhausted);
        }
        Ok(())
    }

    fn require_admin(&self) -> Result<(), AccessError> {
        self.require_authenticated()?;
        if self.profile.is_admin() {
            Ok(())
        } else {
            Err(AccessError::AdminRequired)
        }
    }

    async fn record_audit(
        &mut self,
        kind: AuditEventKind,
        details: impl Into<String>,
    ) -> NovaResult<()> {
        let actor = if self.profile.is_authenticated {
            self.profile.email.as_str()
        } else {
            ""
        };
        audit::record(
            &mut self.audit,
            kind,
            actor,
            details,
            self.config.audit_retention,
            Utc::now(),
        );
        self.repo.save(&self.audit).await
    }

    /// Save the profile and mirror it into the registry.
    async fn persist_profile(&mut self) -> NovaResult<()> {
        self.repo.save(&self.profile).await?;
        if self.registry.upsert(&self.profile) {
            self.repo.save(&self.registry).await?;
        }
        Ok(())
    }
}
