pub mod engagement;
pub mod feedback;
pub mod progress;
pub mod settings;
pub mod usage;
pub mod utils;

pub use engagement::InMemoryEngagementRepository;
pub use feedback::InMemoryFeedbackRepository;
pub use progress::InMemoryProgressRepository;
pub use settings::InMemorySettingsRepository;
pub use usage::InMemoryUsageRepository;
