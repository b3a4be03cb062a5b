pub mod analytics;
pub mod common;
pub mod engagement;
pub mod feedback;
pub mod learning;
pub mod models;
pub mod progress;
pub mod usage;

pub use analytics::AnalyticsServiceImpl;
pub use engagement::EngagementServiceImpl;
pub use feedback::FeedbackServiceImpl;
pub use learning::LearningServiceImpl;
pub use models::ModelRegistry;
pub use progress::ProgressServiceImpl;
pub use usage::UsageServiceImpl;

#[cfg(test)]
mod test_utils;
