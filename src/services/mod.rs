pub mod engine;
pub mod long_term;
pub mod mid_term;
pub mod ranker;
pub mod session_window;
pub mod short_term;
pub mod weights;

pub use engine::RecommendationEngine;
pub use long_term::{ExposureLedger, LongTermModel};
pub use mid_term::MidTermModel;
pub use ranker::Ranker;
pub use session_window::SignalWindow;
pub use short_term::ShortTermModel;
pub use weights::WeightController;
