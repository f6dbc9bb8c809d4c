//! Nova Access: credit ledger, admin access gate, audit recording,
//! key rotation and the session controller.

pub mod audit;
pub mod config;
pub mod error;
pub mod gate;
pub mod ledger;
pub mod login;
pub mod onboarding;
pub mod password;
pub mod rotation;
pub mod session;
pub mod words;

pub use config::AccessConfig;
pub use error::{AccessError, RotationRejection};
pub use gate::{AccessGate, GateOutcome, GateStep};
pub use ledger::{CreditLedger, PlanOutcome};
pub use onboarding::OnboardingStep;
pub use rotation::KeyRotationForm;
pub use session::{Session, View};
pub use words::count_words;
