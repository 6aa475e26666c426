pub mod analytics;
pub mod blocks;
pub mod classify;
pub mod hooks;
pub mod runtime;

// Re-export key types for easier usage
pub use analytics::{AnalyticsEvent, AnalyticsSink, DataLayer, NullSink};
pub use blocks::DecorateError;
pub use classify::{ScreenSize, Variant, is_eyebrow};
pub use hooks::{
    ClickAction, Decoration, EventBinding, ObserverOptions, VisibilityAction, VisibilityTrigger,
};
pub use runtime::BlockRuntime;
