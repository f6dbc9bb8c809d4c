//! Read-eval-print loop over a [`Session`].

use std::io::Write;

use nova_access::{GateOutcome, GateStep, KeyRotationForm, PlanOutcome, Session, View};
use nova_core::error::NovaError;
use nova_core::models::chat::Source;
use nova_core::models::plan::{self, PLANS};
use nova_core::repository::StateRepository;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::debug;

use crate::command::{self, Command, HELP};
use crate::error::ConsoleError;

enum Flow {
    Continue,
    Quit,
}

pub struct Shell<R: StateRepository, W: Write> {
    session: Session<R>,
    out: W,
}

impl<R: StateRepository, W: Write> Shell<R, W> {
    pub fn new(session: Session<R>, out: W) -> Self {
        Self { session, out }
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session<R> {
        &self.session
    }

    /// Run until `quit` or end of input.
    pub async fn run<I>(&mut self, input: I) -> Result<(), ConsoleError>
    where
        I: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        writeln!(self.out, "Nova school assistant. Type `help` for commands.")?;
        self.show_view()?;

        while let Some(line) = lines.next_line().await? {
            let command = match command::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    writeln!(self.out, "{e}")?;
                    continue;
                }
            };
            debug!(?command, "Console command");

            match self.execute(command, &mut lines).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(ConsoleError::Nova(e)) => writeln!(self.out, "error: {e}")?,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    async fn execute<I>(
        &mut self,
        command: Command,
        lines: &mut Lines<I>,
    ) -> Result<Flow, ConsoleError>
    where
        I: AsyncBufRead + Unpin,
    {
        let s = &mut self.session;
        match command {
            Command::Empty => return Ok(Flow::Continue),
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::View => {}

            Command::Login(email) => s.login(&email).await?,
            Command::Logout => s.logout().await?,
            Command::Start => s.begin_onboarding()?,
            Command::Type(user_type) => s.choose_user_type(user_type).await?,
            Command::Name(name) => s.submit_name(&name).await?,
            Command::Back => s.onboarding_back(),

            Command::ToggleInteraction => {
                let mode = s.toggle_interaction_mode();
                writeln!(self.out, "interaction mode: {mode:?}")?;
            }
            Command::Chat { user, reply, sources } => {
                let cited = sources.iter().map(|uri| Source::new(uri.as_str(), uri.as_str())).collect();
                s.record_text_exchange(&user, &reply, cited, None).await?;
                writeln!(self.out, "nova: {reply}")?;
                for uri in &sources {
                    writeln!(self.out, "  source: {uri}")?;
                }
            }
            Command::Voice { input, output } => s.record_voice_turn(&input, &output).await?,
            Command::Feedback(rating) => {
                s.record_feedback(rating).await?;
                writeln!(self.out, "thanks for the feedback")?;
            }
            Command::Credits => {
                let p = s.profile();
                writeln!(
                    self.out,
                    "{} words left ({}, mode {})",
                    p.credits,
                    p.plan.as_deref().unwrap_or("no plan"),
                    s.mode()
                )?;
            }

            Command::Plans => {
                for plan in PLANS.iter() {
                    writeln!(
                        self.out,
                        "{:<8} {:<20} NGN {:>6}  {:>7} words / {:?}",
                        plan.id, plan.name, plan.price, plan.word_limit, plan.period
                    )?;
                }
            }
            Command::Buy(id) => {
                let Some(plan) = plan::find_plan(&id) else {
                    return Err(NovaError::NotFound {
                        entity: "plan".into(),
                        id,
                    }
                    .into());
                };
                write!(
                    self.out,
                    "Activate {} (+{} words)? [y/N] ",
                    plan.name, plan.word_limit
                )?;
                self.out.flush()?;
                let answer = lines.next_line().await?.unwrap_or_default();
                let accepted = matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes");
                match self.session.apply_plan(&id, |_| accepted).await? {
                    PlanOutcome::Applied { plan, credits } => {
                        writeln!(self.out, "{} active, {credits} words left", plan.name)?
                    }
                    PlanOutcome::Cancelled => writeln!(self.out, "cancelled")?,
                }
            }

            Command::Admin => {
                s.open_admin_gate()?;
                writeln!(self.out, "Request full administrative clearance? (proceed/cancel)")?;
            }
            Command::Proceed => {
                let outcome = s.confirm_admin(true).await?;
                self.report_gate(&outcome)?;
            }
            Command::Cancel => {
                if s.gate_step() == Some(GateStep::Confirm) {
                    let outcome = s.confirm_admin(false).await?;
                    self.report_gate(&outcome)?;
                } else {
                    s.close_admin_gate();
                }
            }
            Command::Key(key) => {
                s.set_gate_input(key);
                let outcome = s.submit_admin_key().await?;
                self.report_gate(&outcome)?;
            }
            Command::Pin(pin) => {
                s.set_gate_input(pin);
                let outcome = s.submit_security_pin().await?;
                self.report_gate(&outcome)?;
            }
            Command::Recover => {
                let outcome = s.request_recovery()?;
                self.report_gate(&outcome)?;
            }
            Command::Answer(answer) => {
                s.set_gate_input(answer);
                let outcome = s.submit_recovery_answer().await?;
                self.report_gate(&outcome)?;
            }
            Command::Close => s.close_admin_gate(),

            Command::Dashboard => s.open_dashboard()?,
            Command::Leave => s.leave_dashboard(),
            Command::Users => {
                for user in s.users()? {
                    writeln!(
                        self.out,
                        "{:<28} {:<20} {:<8} {:>7} {:?}",
                        user.email,
                        user.name,
                        user.user_type.map(|t| t.to_string()).unwrap_or_default(),
                        user.credits,
                        user.subscription_status
                    )?;
                }
            }
            Command::Chats => {
                for log in s.chat_logs()? {
                    writeln!(
                        self.out,
                        "{} {:<20} {} messages  {}",
                        log.timestamp.format("%Y-%m-%d %H:%M"),
                        log.user_name,
                        log.messages.len(),
                        log.summary.as_deref().unwrap_or("-")
                    )?;
                }
            }
            Command::Feedbacks => {
                for log in s.feedback_logs()? {
                    writeln!(
                        self.out,
                        "{} {:<20} {:?}",
                        log.timestamp.format("%Y-%m-%d %H:%M"),
                        log.user_name,
                        log.rating
                    )?;
                }
            }
            Command::Audit => {
                for entry in s.audit_log()? {
                    writeln!(
                        self.out,
                        "{} {:<20} {:<28} {}",
                        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                        entry.kind.as_str(),
                        entry.user_name,
                        entry.details
                    )?;
                }
            }
            Command::ToggleAppMode => {
                let mode = s.toggle_app_mode().await?;
                writeln!(self.out, "app mode: {mode}")?;
            }
            Command::Rotate {
                new_key,
                confirm_key,
            } => {
                let mut form = KeyRotationForm::new(new_key, confirm_key);
                s.rotate_admin_key(&mut form).await?;
                writeln!(self.out, "admin key rotated")?;
            }
            Command::Mfa => {
                let enabled = s.toggle_mfa().await?;
                writeln!(
                    self.out,
                    "PIN verification {}",
                    if enabled { "enabled" } else { "disabled" }
                )?;
            }
            Command::RecoveryAnswer(answer) => {
                let cleared = answer.is_none();
                s.set_recovery_answer(answer).await?;
                writeln!(
                    self.out,
                    "recovery answer {}",
                    if cleared { "cleared" } else { "saved" }
                )?;
            }
        }

        self.show_view()?;
        Ok(Flow::Continue)
    }

    fn report_gate(&mut self, outcome: &GateOutcome) -> Result<(), ConsoleError> {
        match outcome {
            GateOutcome::Advanced(GateStep::Password) => writeln!(self.out, "enter the admin key: key <value>")?,
            GateOutcome::Advanced(GateStep::Mfa) => {
                writeln!(self.out, "enter the security PIN: pin <value> (or `recover`)")?
            }
            GateOutcome::Advanced(GateStep::Recovery) => {
                writeln!(self.out, "answer the recovery question: answer <text>")?
            }
            GateOutcome::Advanced(step) => writeln!(self.out, "gate at {step:?}")?,
            GateOutcome::Denied { details, .. } => writeln!(self.out, "ACCESS DENIED: {details}")?,
            GateOutcome::Granted { .. } => writeln!(self.out, "clearance granted")?,
        }
        Ok(())
    }

    fn show_view(&mut self) -> Result<(), ConsoleError> {
        let label = match self.session.view() {
            View::Login => "login".to_string(),
            View::Onboarding(step) => format!("onboarding: {step:?}"),
            View::Chat(mode) => format!("chat ({mode:?}), {} words left", self.session.profile().credits),
            View::CreditsExhausted => "out of credits: `plans` then `buy <plan>`".to_string(),
            View::AdminDashboard => "admin dashboard".to_string(),
        };
        writeln!(self.out, "[{label}]")?;
        Ok(())
    }
}
