pub mod organizer;
pub mod players;

pub use organizer::OrganizerService;
pub use players::PlayerService;
