pub mod idea;

pub use idea::IdeaService;
