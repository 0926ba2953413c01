use crate::publication::AuthorProfile;

pub mod scholar;

/// Somewhere an author's citation profile can be fetched from.
pub trait ProfileSource {
    /// Fetch the profile basics, indices and full publication list for `profile_id`.
    fn fetch(&self, profile_id: &str) -> anyhow::Result<AuthorProfile>;
}
