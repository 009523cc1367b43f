pub mod conflict;
pub mod notifier;
pub mod slots;
pub mod timefmt;
