mod catalogue;
mod profile;

pub use catalogue::Catalogue;
pub use profile::ExerciseProfile;
